//! Course catalog cache: all courses plus the viewer's round mirror.

use std::collections::HashMap;

use golf_core::{
  course::{Course, CourseId},
  fetch::{FetchGuard, Ticket},
  played::{CourseActivity, MarkerVariant, PlayedSet, course_activity},
  round::Round,
};
use tracing::warn;

#[derive(Debug, Default)]
pub struct CourseCatalog {
  courses:           Vec<Course>,
  rounds:            Vec<Round>,
  played:            PlayedSet,
  activity:          HashMap<CourseId, CourseActivity>,
  courses_guard:     FetchGuard,
  rounds_guard:      FetchGuard,
  courses_loaded:    bool,
  pub courses_error: Option<String>,
  pub rounds_error:  Option<String>,
}

impl CourseCatalog {
  pub fn new() -> Self { Self::default() }

  // ── Loading ───────────────────────────────────────────────────────────────

  pub fn begin_courses(&mut self) -> Ticket { self.courses_guard.begin() }

  pub fn apply_courses(
    &mut self,
    ticket: Ticket,
    result: golf_core::Result<Vec<Course>>,
  ) -> bool {
    if !self.courses_guard.accept(ticket) {
      warn!("discarding stale course list");
      return false;
    }
    match result {
      Ok(courses) => {
        self.courses = courses;
        self.courses_loaded = true;
        self.courses_error = None;
      }
      Err(e) => self.courses_error = Some(e.to_string()),
    }
    true
  }

  pub fn begin_rounds(&mut self) -> Ticket { self.rounds_guard.begin() }

  /// Replace the round mirror. On failure the last known played set stays in
  /// place.
  pub fn apply_rounds(
    &mut self,
    ticket: Ticket,
    result: golf_core::Result<Vec<Round>>,
  ) -> bool {
    if !self.rounds_guard.accept(ticket) {
      warn!("discarding stale round list");
      return false;
    }
    match result {
      Ok(rounds) => {
        self.rounds = rounds;
        self.rounds_error = None;
        self.rederive();
      }
      Err(e) => self.rounds_error = Some(e.to_string()),
    }
    true
  }

  /// Insert the round exactly as the server returned it. A round list fetched
  /// before the round existed would drop it again, so any outstanding fetch is
  /// discarded; the caller refetches.
  pub fn record_created(&mut self, round: Round) {
    self.rounds_guard.invalidate();
    match self.rounds.iter_mut().find(|r| r.id == round.id) {
      Some(existing) => *existing = round,
      None => self.rounds.push(round),
    }
    self.rederive();
  }

  /// Forget everything and discard anything still in flight.
  pub fn reset(&mut self) {
    self.courses_guard.invalidate();
    self.rounds_guard.invalidate();
    self.courses.clear();
    self.rounds.clear();
    self.courses_loaded = false;
    self.courses_error = None;
    self.rounds_error = None;
    self.rederive();
  }

  fn rederive(&mut self) {
    self.played = PlayedSet::from_rounds(&self.rounds);
    self.activity = course_activity(&self.rounds);
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn courses(&self) -> &[Course] { &self.courses }

  pub fn course(&self, id: CourseId) -> Option<&Course> {
    self.courses.iter().find(|c| c.id == id)
  }

  pub fn rounds(&self) -> &[Round] { &self.rounds }

  pub fn played(&self) -> &PlayedSet { &self.played }

  pub fn variant(&self, id: CourseId) -> MarkerVariant { self.played.variant(id) }

  pub fn activity(&self, id: CourseId) -> Option<CourseActivity> {
    self.activity.get(&id).copied()
  }

  pub fn is_loaded(&self) -> bool { self.courses_loaded }

  pub fn is_loading(&self) -> bool {
    self.courses_guard.is_loading() || self.rounds_guard.is_loading()
  }
}
