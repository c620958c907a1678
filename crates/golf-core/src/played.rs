//! The derived set of played courses.
//!
//! `PlayedSet` is never edited directly: it is always rebuilt from the round
//! mirror, so re-deriving after any mutation yields exactly the distinct
//! course ids that appear in the current rounds.

use std::collections::{HashMap, HashSet};

use crate::{course::CourseId, round::Round};

/// Which of the two marker styles a course is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerVariant {
  Unplayed,
  Played,
}

/// Per-course activity derived from the round mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseActivity {
  pub rounds:     usize,
  /// Lowest score logged at the course.
  pub best_score: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayedSet {
  ids: HashSet<CourseId>,
}

impl PlayedSet {
  /// Derive the set from a round mirror.
  pub fn from_rounds<'a>(rounds: impl IntoIterator<Item = &'a Round>) -> Self {
    Self {
      ids: rounds.into_iter().map(|r| r.course_id).collect(),
    }
  }

  pub fn contains(&self, id: CourseId) -> bool { self.ids.contains(&id) }

  pub fn len(&self) -> usize { self.ids.len() }

  pub fn is_empty(&self) -> bool { self.ids.is_empty() }

  pub fn variant(&self, id: CourseId) -> MarkerVariant {
    if self.contains(id) {
      MarkerVariant::Played
    } else {
      MarkerVariant::Unplayed
    }
  }
}

/// Round count and best score per course.
pub fn course_activity<'a>(
  rounds: impl IntoIterator<Item = &'a Round>,
) -> HashMap<CourseId, CourseActivity> {
  let mut out: HashMap<CourseId, CourseActivity> = HashMap::new();
  for r in rounds {
    out
      .entry(r.course_id)
      .and_modify(|a| {
        a.rounds += 1;
        a.best_score = a.best_score.min(r.score);
      })
      .or_insert(CourseActivity {
        rounds:     1,
        best_score: r.score,
      });
  }
  out
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn round(id: i64, course_id: i64, score: i32) -> Round {
    Round {
      id,
      course_id,
      course_name: None,
      date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
      score,
    }
  }

  #[test]
  fn derives_distinct_course_ids() {
    let rounds = vec![round(1, 10, 90), round(2, 10, 85), round(3, 20, 88)];
    let set = PlayedSet::from_rounds(&rounds);
    assert_eq!(set.len(), 2);
    assert!(set.contains(10));
    assert!(set.contains(20));
    assert_eq!(set.variant(30), MarkerVariant::Unplayed);
    assert_eq!(set.variant(10), MarkerVariant::Played);
  }

  #[test]
  fn rederiving_after_removal_is_exact() {
    let mut rounds = vec![round(1, 10, 90), round(2, 10, 85), round(3, 20, 88)];
    let before = PlayedSet::from_rounds(&rounds);
    assert_eq!(before, PlayedSet::from_rounds(&rounds));

    rounds.retain(|r| r.id != 3);
    let after = PlayedSet::from_rounds(&rounds);
    assert!(!after.contains(20));
    assert!(after.contains(10));

    rounds.retain(|r| r.id != 1);
    assert!(PlayedSet::from_rounds(&rounds).contains(10));
  }

  #[test]
  fn empty_mirror_means_nothing_played() {
    let set = PlayedSet::from_rounds(&[]);
    assert!(set.is_empty());
    assert_eq!(set.variant(1), MarkerVariant::Unplayed);
  }

  #[test]
  fn activity_tracks_count_and_best() {
    let rounds = vec![round(1, 10, 90), round(2, 10, 85), round(3, 20, 101)];
    let act = course_activity(&rounds);
    assert_eq!(act[&10], CourseActivity { rounds: 2, best_score: 85 });
    assert_eq!(act[&20].rounds, 1);
  }
}
