//! Round logging dialog.
//!
//! The dialog is fully controlled by the app: it keeps the form fields and
//! the in-flight flag, nothing else. The in-flight flag is the only guard
//! against logging the same round twice; the backend has no idempotency key.

use chrono::NaiveDate;
use golf_core::{
  course::Course,
  round::{NewRound, validate_round},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogField {
  Date,
  #[default]
  Score,
}

#[derive(Debug, Default)]
pub struct LogRoundDialog {
  open:       bool,
  course:     Option<Course>,
  pub date:   String,
  pub score:  String,
  pub focus:  DialogField,
  pub error:  Option<String>,
  submitting: bool,
}

impl LogRoundDialog {
  pub fn new() -> Self { Self::default() }

  /// Open for `course`. Fields are reset on every closed → open transition so
  /// nothing typed for a previous course survives.
  pub fn open(&mut self, course: Course, today: NaiveDate) {
    if self.open {
      return;
    }
    *self = Self {
      open: true,
      course: Some(course),
      date: today.format("%Y-%m-%d").to_string(),
      ..Self::default()
    };
  }

  /// Close without submitting. Not allowed while a submission is in flight.
  pub fn cancel(&mut self) -> bool {
    if self.submitting {
      return false;
    }
    self.open = false;
    true
  }

  pub fn input(&mut self, c: char) {
    if self.submitting {
      return;
    }
    match self.focus {
      DialogField::Date => self.date.push(c),
      DialogField::Score => self.score.push(c),
    }
  }

  pub fn backspace(&mut self) {
    if self.submitting {
      return;
    }
    match self.focus {
      DialogField::Date => self.date.pop(),
      DialogField::Score => self.score.pop(),
    };
  }

  pub fn toggle_focus(&mut self) {
    self.focus = match self.focus {
      DialogField::Date => DialogField::Score,
      DialogField::Score => DialogField::Date,
    };
  }

  /// Validate and, if valid, mark the submission in flight and return the
  /// request body. Returns `None` when closed, already submitting, or
  /// invalid (the validation message is left in `error`).
  pub fn submit(&mut self, today: NaiveDate) -> Option<NewRound> {
    if !self.open || self.submitting {
      return None;
    }
    let course = self.course.as_ref()?;
    match validate_round(course, &self.date, &self.score, today) {
      Ok(round) => {
        self.submitting = true;
        self.error = None;
        Some(round)
      }
      Err(e) => {
        self.error = Some(e.to_string());
        None
      }
    }
  }

  /// The server stored the round; close.
  pub fn succeed(&mut self) {
    self.submitting = false;
    self.open = false;
  }

  /// The submission failed; re-enable the form and keep the values for a
  /// retry.
  pub fn fail(&mut self, reason: &str) {
    self.submitting = false;
    self.error = Some(format!("Failed to save round ({reason}). Press Enter to retry."));
  }

  pub fn is_open(&self) -> bool { self.open }

  pub fn is_submitting(&self) -> bool { self.submitting }

  pub fn course(&self) -> Option<&Course> { self.course.as_ref().filter(|_| self.open) }

  pub fn reset(&mut self) { *self = Self::new(); }
}
