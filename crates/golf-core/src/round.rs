//! Played rounds and client-side validation of new ones.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::course::{Course, CourseId};

pub type RoundId = i64;

/// A played round as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
  pub id:          RoundId,
  pub course_id:   CourseId,
  #[serde(default)]
  pub course_name: Option<String>,
  pub date:        NaiveDate,
  pub score:       i32,
}

/// Body of `POST /api/rounds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRound {
  pub course_id:          CourseId,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub course_external_id: Option<String>,
  pub date:               NaiveDate,
  pub score:              i32,
}

/// Rounds dated before this day are rejected.
pub fn earliest_round_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Why the logging form refused to submit. The `Display` text is shown to the
/// user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundFormError {
  #[error("Enter a score.")]
  MissingScore,
  #[error("Score must be a positive whole number.")]
  InvalidScore,
  #[error("Enter the date you played.")]
  MissingDate,
  #[error("Date must be written as YYYY-MM-DD.")]
  InvalidDate,
  #[error("Date cannot be in the future.")]
  FutureDate,
  #[error("Date cannot be before 2000-01-01.")]
  TooEarly,
}

/// Validate raw form input for `course` and build the request body.
///
/// `today` is passed in rather than read from the clock so the rule is
/// deterministic.
pub fn validate_round(
  course: &Course,
  date: &str,
  score: &str,
  today: NaiveDate,
) -> Result<NewRound, RoundFormError> {
  let score = score.trim();
  if score.is_empty() {
    return Err(RoundFormError::MissingScore);
  }
  let score: i32 = score.parse().map_err(|_| RoundFormError::InvalidScore)?;
  if score <= 0 {
    return Err(RoundFormError::InvalidScore);
  }

  let date = date.trim();
  if date.is_empty() {
    return Err(RoundFormError::MissingDate);
  }
  let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
    .map_err(|_| RoundFormError::InvalidDate)?;
  if date > today {
    return Err(RoundFormError::FutureDate);
  }
  if date < earliest_round_date() {
    return Err(RoundFormError::TooEarly);
  }

  Ok(NewRound {
    course_id: course.id,
    course_external_id: course.external_id.clone(),
    date,
    score,
  })
}
