//! Golf courses, read-only from the client's point of view.

use serde::{Deserialize, Serialize};

pub type CourseId = i64;

/// A golf course location as listed by `GET /api/courses`.
///
/// The backend also sends a `played` flag; it is ignored here because played
/// state is always derived from the round mirror
/// (see [`PlayedSet`](crate::played::PlayedSet)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
  pub id:          CourseId,
  #[serde(default)]
  pub external_id: Option<String>,
  pub name:        String,
  #[serde(default)]
  pub latitude:    Option<f64>,
  #[serde(default)]
  pub longitude:   Option<f64>,
}

impl Course {
  /// `(latitude, longitude)`, if the course has been geocoded.
  pub fn position(&self) -> Option<(f64, f64)> {
    Some((self.latitude?, self.longitude?))
  }
}
