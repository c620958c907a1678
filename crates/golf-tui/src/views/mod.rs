//! View state, one module per screen or overlay.
//!
//! Views hold only local state. They never perform I/O: a view hands out a
//! [`Ticket`](golf_core::fetch::Ticket) or a request value, the
//! [`App`](crate::app::App) runs the call, and the outcome is applied back to
//! the view when it arrives.

pub mod catalog;
pub mod log_round;
pub mod map;
pub mod overview;
pub mod session;
pub mod social;

/// Move a list cursor by `delta`, clamped to `0..len`.
pub(crate) fn step_cursor(cursor: usize, delta: isize, len: usize) -> usize {
  if len == 0 {
    return 0;
  }
  cursor.saturating_add_signed(delta).min(len - 1)
}
