//! The aggregate overview snapshot served by `GET /api/overview`.
//!
//! The snapshot is opaque: the client never patches it field by field, it
//! replaces it wholesale on every fetch.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{course::CourseId, round::RoundId};

/// A course as listed inside a region breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCourse {
  pub id:          CourseId,
  pub name:        String,
  #[serde(default)]
  pub latitude:    Option<f64>,
  #[serde(default)]
  pub longitude:   Option<f64>,
  #[serde(default)]
  pub external_id: Option<String>,
  #[serde(default)]
  pub played:      bool,
}

/// Per-region aggregate. Accepts both the `playedCount`/`totalCount` and
/// the `played`/`total` spellings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStat {
  #[serde(alias = "played")]
  pub played_count: u64,
  #[serde(alias = "total")]
  pub total_count:  u64,
  #[serde(default)]
  pub percentage:   Option<f64>,
  #[serde(default)]
  pub courses:      Vec<RegionCourse>,
}

impl RegionStat {
  /// Percentage of the region played, 0 for an empty region.
  pub fn percent(&self) -> f64 {
    self.percentage.unwrap_or_else(|| {
      if self.total_count == 0 {
        0.0
      } else {
        self.played_count as f64 / self.total_count as f64 * 100.0
      }
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRound {
  pub id:          RoundId,
  pub course_name: String,
  pub date:        NaiveDate,
  pub score:       i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
  #[serde(default)]
  pub display_name:        Option<String>,
  #[serde(default)]
  pub email:               Option<String>,
  #[serde(default)]
  pub avatar:              Option<String>,
  pub total_played:        u64,
  pub total_courses:       u64,
  pub percentage_complete: f64,
  #[serde(default)]
  pub region_stats:        BTreeMap<String, RegionStat>,
  #[serde(default)]
  pub recent_rounds:       Vec<RecentRound>,
}

impl Overview {
  /// Regions ordered by played count (descending), then by name.
  pub fn regions_by_progress(&self) -> Vec<(&str, &RegionStat)> {
    let mut regions: Vec<_> = self
      .region_stats
      .iter()
      .map(|(name, stat)| (name.as_str(), stat))
      .collect();
    regions.sort_by(|a, b| {
      b.1
        .played_count
        .cmp(&a.1.played_count)
        .then_with(|| a.0.cmp(b.0))
    });
    regions
  }
}
