//! Map surface: viewport, course cursor, marker popup and fly-to navigation.

use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use golf_core::course::{Course, CourseId};

use super::{catalog::CourseCatalog, step_cursor};

/// Frames an animated recenter takes.
pub const FLIGHT_FRAMES: u16 = 8;

pub const MIN_ZOOM: f64 = 2.0;
pub const MAX_ZOOM: f64 = 16.0;

/// One-shot instruction to recenter the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusRequest {
  pub latitude:  f64,
  pub longitude: f64,
  pub zoom:      f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
  pub latitude:  f64,
  pub longitude: f64,
  pub zoom:      f64,
}

impl Default for Viewport {
  /// Southern Norway.
  fn default() -> Self {
    Self {
      latitude:  60.472,
      longitude: 8.4689,
      zoom:      6.0,
    }
  }
}

impl Viewport {
  /// Degrees of longitude visible at this zoom, halved for latitude.
  pub fn span(&self) -> (f64, f64) {
    let lon = 360.0 / 2f64.powf(self.zoom);
    (lon, lon / 2.0)
  }

  /// `(x_bounds, y_bounds)` for a canvas: longitude on x, latitude on y.
  pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
    let (lon, lat) = self.span();
    (
      [self.longitude - lon / 2.0, self.longitude + lon / 2.0],
      [self.latitude - lat / 2.0, self.latitude + lat / 2.0],
    )
  }

  fn lerp(&self, to: &Self, t: f64) -> Self {
    Self {
      latitude:  self.latitude + (to.latitude - self.latitude) * t,
      longitude: self.longitude + (to.longitude - self.longitude) * t,
      zoom:      self.zoom + (to.zoom - self.zoom) * t,
    }
  }
}

#[derive(Debug, Clone, Copy)]
struct Flight {
  from:  Viewport,
  to:    Viewport,
  frame: u16,
}

#[derive(Debug, Default)]
pub struct MapSurface {
  pub viewport:       Viewport,
  flight:             Option<Flight>,
  /// Fuzzy filter over course names (only edited while `filter_active`).
  pub filter:         String,
  pub filter_active:  bool,
  /// Cursor within the filtered course list.
  pub cursor:         usize,
  /// Course whose popup is open.
  pub popup:          Option<CourseId>,
  seen_close_trigger: u64,
}

impl MapSurface {
  pub fn new() -> Self { Self::default() }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Consume a pending focus request, if any, and start flying to it. The
  /// request is cleared so the same coordinates can be requested again.
  pub fn take_focus(&mut self, request: &mut Option<FocusRequest>) -> bool {
    let Some(req) = request.take() else {
      return false;
    };
    let to = Viewport {
      latitude:  req.latitude,
      longitude: req.longitude,
      zoom:      req.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
    };
    self.flight = Some(Flight {
      from: self.viewport,
      to,
      frame: 0,
    });
    true
  }

  /// Advance an in-progress recenter by one frame.
  pub fn tick(&mut self) {
    let Some(flight) = &mut self.flight else {
      return;
    };
    flight.frame += 1;
    let t = f64::from(flight.frame) / f64::from(FLIGHT_FRAMES);
    self.viewport = flight.from.lerp(&flight.to, t.min(1.0));
    if flight.frame >= FLIGHT_FRAMES {
      self.viewport = flight.to;
      self.flight = None;
    }
  }

  pub fn is_flying(&self) -> bool { self.flight.is_some() }

  pub fn zoom_by(&mut self, delta: f64) {
    self.flight = None;
    self.viewport.zoom = (self.viewport.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
  }

  // ── Popup ─────────────────────────────────────────────────────────────────

  pub fn open_popup(&mut self, id: CourseId) { self.popup = Some(id); }

  pub fn close_popup(&mut self) { self.popup = None; }

  /// Close the popup whenever the trigger has moved past the last value seen.
  pub fn observe_close_trigger(&mut self, trigger: u64) {
    if trigger > self.seen_close_trigger {
      self.seen_close_trigger = trigger;
      self.popup = None;
    }
  }

  // ── Course list ───────────────────────────────────────────────────────────

  /// Courses matching the current filter, in catalog order.
  pub fn visible_courses<'a>(&self, catalog: &'a CourseCatalog) -> Vec<&'a Course> {
    if self.filter.is_empty() {
      return catalog.courses().iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    catalog
      .courses()
      .iter()
      .filter(|c| matcher.fuzzy_match(&c.name, &self.filter).is_some())
      .collect()
  }

  pub fn cursor_course<'a>(&self, catalog: &'a CourseCatalog) -> Option<&'a Course> {
    self.visible_courses(catalog).get(self.cursor).copied()
  }

  pub fn move_cursor(&mut self, delta: isize, catalog: &CourseCatalog) {
    let len = self.visible_courses(catalog).len();
    self.cursor = step_cursor(self.cursor, delta, len);
  }

  /// Put the cursor on `id` if it is visible under the current filter.
  pub fn point_at(&mut self, id: CourseId, catalog: &CourseCatalog) {
    if let Some(i) = self
      .visible_courses(catalog)
      .iter()
      .position(|c| c.id == id)
    {
      self.cursor = i;
    }
  }

  pub fn reset(&mut self) { *self = Self::new(); }
}
