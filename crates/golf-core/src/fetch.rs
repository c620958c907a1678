//! Generation tickets for discarding stale responses.
//!
//! Requests are fire-and-forget; a response may arrive after the view has
//! issued a newer fetch or the session has changed. Each fetched slice owns a
//! [`FetchGuard`]; only the response carrying the latest [`Ticket`] is
//! applied.

/// Generation stamp attached to one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct FetchGuard {
  current:   u64,
  in_flight: bool,
}

impl FetchGuard {
  pub fn new() -> Self { Self::default() }

  /// Start a new fetch, superseding any outstanding one.
  pub fn begin(&mut self) -> Ticket {
    self.current += 1;
    self.in_flight = true;
    Ticket(self.current)
  }

  /// Returns `true` if `ticket` belongs to the latest fetch. Accepting a
  /// ticket completes the fetch; a ticket is accepted at most once.
  pub fn accept(&mut self, ticket: Ticket) -> bool {
    if self.in_flight && ticket.0 == self.current {
      self.in_flight = false;
      true
    } else {
      false
    }
  }

  /// Discard whatever is outstanding without starting anything new.
  pub fn invalidate(&mut self) {
    self.current += 1;
    self.in_flight = false;
  }

  pub fn is_loading(&self) -> bool { self.in_flight }
}
