//! Overview / stats screen: aggregate snapshot, region drill-down and the
//! two-step round deletion.

use golf_core::{
  fetch::{FetchGuard, Ticket},
  overview::{Overview, RegionCourse, RegionStat},
  round::RoundId,
};
use tracing::warn;

use super::{map::FocusRequest, step_cursor};

/// Zoom used when jumping from a region listing to a course on the map.
pub const COURSE_ZOOM: f64 = 13.0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegionSelection {
  #[default]
  All,
  Region(String),
}

/// Which list keyboard navigation applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverviewFocus {
  #[default]
  Regions,
  Recent,
}

/// Projection of one region out of the snapshot.
#[derive(Debug, PartialEq)]
pub struct RegionDetail<'a> {
  pub name:    &'a str,
  pub stat:    &'a RegionStat,
  pub played:  Vec<&'a RegionCourse>,
  pub missing: Vec<&'a RegionCourse>,
}

impl<'a> RegionDetail<'a> {
  /// Played courses first, then the ones still missing.
  pub fn courses(&self) -> impl Iterator<Item = &'a RegionCourse> + '_ {
    self.played.iter().chain(self.missing.iter()).copied()
  }
}

#[derive(Debug, Default)]
pub struct OverviewView {
  snapshot:          Option<Overview>,
  guard:             FetchGuard,
  pub error:         Option<String>,
  pub selection:     RegionSelection,
  pub focus:         OverviewFocus,
  pub region_cursor: usize,
  pub course_cursor: usize,
  pub round_cursor:  usize,
  staged_delete:     Option<RoundId>,
  deleting:          bool,
}

impl OverviewView {
  pub fn new() -> Self { Self::default() }

  // ── Loading ───────────────────────────────────────────────────────────────

  pub fn begin_load(&mut self) -> Ticket { self.guard.begin() }

  /// Replace the snapshot wholesale. A failed load keeps the previous
  /// snapshot (if any) and records the error.
  pub fn apply_load(&mut self, ticket: Ticket, result: golf_core::Result<Overview>) -> bool {
    if !self.guard.accept(ticket) {
      warn!("discarding stale overview");
      return false;
    }
    match result {
      Ok(snapshot) => {
        self.snapshot = Some(snapshot);
        self.error = None;
        self.clamp_cursors();
      }
      Err(e) => self.error = Some(e.to_string()),
    }
    true
  }

  pub fn is_loading(&self) -> bool { self.guard.is_loading() }

  pub fn snapshot(&self) -> Option<&Overview> { self.snapshot.as_ref() }

  fn clamp_cursors(&mut self) {
    let regions = self.regions().len();
    let rounds = self.snapshot.as_ref().map_or(0, |s| s.recent_rounds.len());
    let courses = self.region_detail().map_or(0, |d| d.courses().count());
    self.region_cursor = step_cursor(self.region_cursor, 0, regions);
    self.round_cursor = step_cursor(self.round_cursor, 0, rounds);
    self.course_cursor = step_cursor(self.course_cursor, 0, courses);
  }

  // ── Regions ───────────────────────────────────────────────────────────────

  pub fn regions(&self) -> Vec<(&str, &RegionStat)> {
    self
      .snapshot
      .as_ref()
      .map(Overview::regions_by_progress)
      .unwrap_or_default()
  }

  pub fn select_region(&mut self, name: &str) {
    self.selection = RegionSelection::Region(name.to_string());
    self.course_cursor = 0;
  }

  pub fn select_all(&mut self) {
    self.selection = RegionSelection::All;
    self.course_cursor = 0;
  }

  /// Drill into the region under the cursor.
  pub fn select_cursor_region(&mut self) {
    let name = self
      .regions()
      .get(self.region_cursor)
      .map(|(name, _)| name.to_string());
    if let Some(name) = name {
      self.select_region(&name);
    }
  }

  /// The selected region split into played and missing courses. A pure
  /// function of the snapshot and the selection.
  pub fn region_detail(&self) -> Option<RegionDetail<'_>> {
    let RegionSelection::Region(selected) = &self.selection else {
      return None;
    };
    let (name, stat) = self.snapshot.as_ref()?.region_stats.get_key_value(selected)?;
    let (played, missing) = stat.courses.iter().partition(|c| c.played);
    Some(RegionDetail {
      name: name.as_str(),
      stat,
      played,
      missing,
    })
  }

  pub fn cursor_course(&self) -> Option<&RegionCourse> {
    self.region_detail()?.courses().nth(self.course_cursor)
  }

  /// Focus request for the course under the cursor in the region detail.
  pub fn cursor_course_focus(&self) -> Option<FocusRequest> {
    let course = self.cursor_course()?;
    Some(FocusRequest {
      latitude:  course.latitude?,
      longitude: course.longitude?,
      zoom:      COURSE_ZOOM,
    })
  }

  pub fn move_cursor(&mut self, delta: isize) {
    match (self.focus, &self.selection) {
      (OverviewFocus::Recent, _) => {
        let len = self.snapshot.as_ref().map_or(0, |s| s.recent_rounds.len());
        self.round_cursor = step_cursor(self.round_cursor, delta, len);
      }
      (OverviewFocus::Regions, RegionSelection::All) => {
        self.region_cursor = step_cursor(self.region_cursor, delta, self.regions().len());
      }
      (OverviewFocus::Regions, RegionSelection::Region(_)) => {
        let len = self.region_detail().map_or(0, |d| d.courses().count());
        self.course_cursor = step_cursor(self.course_cursor, delta, len);
      }
    }
  }

  pub fn toggle_focus(&mut self) {
    self.focus = match self.focus {
      OverviewFocus::Regions => OverviewFocus::Recent,
      OverviewFocus::Recent => OverviewFocus::Regions,
    };
  }

  // ── Delete ────────────────────────────────────────────────────────────────

  /// First step: remember the candidate. No request is made.
  pub fn stage_delete(&mut self, id: RoundId) {
    if !self.deleting {
      self.staged_delete = Some(id);
    }
  }

  pub fn stage_cursor_round(&mut self) {
    let id = self
      .snapshot
      .as_ref()
      .and_then(|s| s.recent_rounds.get(self.round_cursor))
      .map(|r| r.id);
    if let Some(id) = id {
      self.stage_delete(id);
    }
  }

  pub fn cancel_delete(&mut self) {
    if !self.deleting {
      self.staged_delete = None;
    }
  }

  /// Second step: the id to delete, once. Further confirms are ignored until
  /// the outcome arrives.
  pub fn confirm_delete(&mut self) -> Option<RoundId> {
    if self.deleting {
      return None;
    }
    let id = self.staged_delete?;
    self.deleting = true;
    Some(id)
  }

  pub fn delete_succeeded(&mut self) {
    self.deleting = false;
    self.staged_delete = None;
  }

  /// Leave the confirmation up so the user can retry or cancel.
  pub fn delete_failed(&mut self) { self.deleting = false; }

  pub fn staged_delete(&self) -> Option<RoundId> { self.staged_delete }

  pub fn is_deleting(&self) -> bool { self.deleting }

  pub fn reset(&mut self) {
    self.guard.invalidate();
    let guard = std::mem::take(&mut self.guard);
    *self = Self {
      guard,
      ..Self::new()
    };
  }
}
