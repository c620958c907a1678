//! Friends screen: leaderboard, incoming requests and user search.
//!
//! Statuses are only ever copied from server rows. The one local edit is the
//! `NONE → SENT` flip after the server accepted a sent request, which is what
//! the next search would report anyway.

use std::collections::HashSet;

use golf_core::{
  fetch::{FetchGuard, Ticket},
  friend::{FriendStatus, FriendshipId, Golfer, Response},
  session::UserId,
};
use tracing::warn;

use super::step_cursor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SocialTab {
  #[default]
  Leaderboard,
  Search,
}

/// Rank label for the 0-based leaderboard position `index`.
pub fn rank_label(index: usize) -> String {
  match index {
    0..=2 => format!("{}.", index + 1),
    n => format!("#{}", n + 1),
  }
}

/// One slice of server rows with its own fetch generation.
#[derive(Debug, Default)]
pub struct Listing {
  pub rows:  Vec<Golfer>,
  pub error: Option<String>,
  guard:     FetchGuard,
}

impl Listing {
  fn begin(&mut self) -> Ticket { self.guard.begin() }

  /// Replace the rows wholesale. Returns `false` for a stale response.
  fn apply(&mut self, ticket: Ticket, result: golf_core::Result<Vec<Golfer>>) -> bool {
    if !self.guard.accept(ticket) {
      return false;
    }
    match result {
      Ok(rows) => {
        self.rows = rows;
        self.error = None;
      }
      Err(e) => self.error = Some(e.to_string()),
    }
    true
  }

  pub fn is_loading(&self) -> bool { self.guard.is_loading() }

  fn reset(&mut self) {
    self.guard.invalidate();
    self.rows.clear();
    self.error = None;
  }
}

#[derive(Debug, Default)]
pub struct SocialView {
  pub tab:            SocialTab,
  pub friends:        Listing,
  pub requests:       Listing,
  pub results:        Listing,
  pub query:          String,
  pub editing:        bool,
  pub request_cursor: usize,
  pub result_cursor:  usize,
  /// Users a friend request is being sent to.
  sending:            HashSet<UserId>,
  /// Friendships being accepted or rejected.
  answering:          HashSet<FriendshipId>,
  /// Last failed write, shown until the next one succeeds.
  pub error:          Option<String>,
}

impl SocialView {
  pub fn new() -> Self { Self::default() }

  pub fn toggle_tab(&mut self) {
    self.tab = match self.tab {
      SocialTab::Leaderboard => SocialTab::Search,
      SocialTab::Search => SocialTab::Leaderboard,
    };
    self.editing = false;
  }

  // ── Leaderboard + requests ────────────────────────────────────────────────

  pub fn begin_friends(&mut self) -> Ticket { self.friends.begin() }

  pub fn apply_friends(&mut self, ticket: Ticket, result: golf_core::Result<Vec<Golfer>>) {
    if !self.friends.apply(ticket, result) {
      warn!("discarding stale friends list");
    }
  }

  pub fn begin_requests(&mut self) -> Ticket { self.requests.begin() }

  pub fn apply_requests(&mut self, ticket: Ticket, result: golf_core::Result<Vec<Golfer>>) {
    if !self.requests.apply(ticket, result) {
      warn!("discarding stale request list");
      return;
    }
    self.request_cursor = step_cursor(self.request_cursor, 0, self.requests.rows.len());
  }

  /// Answer the request under the cursor. Returns the friendship to call with,
  /// or `None` when there is nothing to answer or it is already in flight.
  pub fn respond(&mut self) -> Option<FriendshipId> {
    let row = self.requests.rows.get(self.request_cursor)?;
    let id = row.friendship_id?;
    self.answering.insert(id).then_some(id)
  }

  /// Outcome of an accept/reject. The caller refetches both lists on success.
  pub fn responded(
    &mut self,
    friendship: FriendshipId,
    response: Response,
    result: &golf_core::Result<()>,
  ) {
    self.answering.remove(&friendship);
    match result {
      Ok(()) => self.error = None,
      Err(e) => {
        self.error = Some(format!("Could not {} request: {e}", response_verb(response)));
      }
    }
  }

  pub fn is_answering(&self, friendship: FriendshipId) -> bool {
    self.answering.contains(&friendship)
  }

  // ── Search ────────────────────────────────────────────────────────────────

  /// Start a search for the current query. An empty or all-whitespace query
  /// issues nothing.
  pub fn begin_search(&mut self) -> Option<(Ticket, String)> {
    let query = self.query.trim();
    if query.is_empty() {
      return None;
    }
    let query = query.to_string();
    self.editing = false;
    Some((self.results.begin(), query))
  }

  pub fn apply_search(&mut self, ticket: Ticket, result: golf_core::Result<Vec<Golfer>>) {
    if !self.results.apply(ticket, result) {
      warn!("discarding stale search results");
      return;
    }
    self.result_cursor = 0;
  }

  /// Send a request to the result under the cursor. Only offered for users
  /// with no relation, and only once at a time.
  pub fn send_request(&mut self) -> Option<UserId> {
    let row = self.results.rows.get(self.result_cursor)?;
    if !row.status.can_send_request() {
      return None;
    }
    let id = row.id;
    self.sending.insert(id).then_some(id)
  }

  pub fn request_sent(&mut self, user: UserId, result: &golf_core::Result<()>) {
    self.sending.remove(&user);
    match result {
      Ok(()) => {
        self.error = None;
        for row in self.results.rows.iter_mut().filter(|r| r.id == user) {
          row.status = FriendStatus::Sent;
        }
      }
      Err(e) => self.error = Some(format!("Could not send friend request: {e}")),
    }
  }

  pub fn is_sending(&self, user: UserId) -> bool { self.sending.contains(&user) }

  pub fn move_cursor(&mut self, delta: isize) {
    match self.tab {
      SocialTab::Leaderboard => {
        self.request_cursor =
          step_cursor(self.request_cursor, delta, self.requests.rows.len());
      }
      SocialTab::Search => {
        self.result_cursor = step_cursor(self.result_cursor, delta, self.results.rows.len());
      }
    }
  }

  pub fn reset(&mut self) {
    self.friends.reset();
    self.requests.reset();
    self.results.reset();
    self.query.clear();
    self.editing = false;
    self.request_cursor = 0;
    self.result_cursor = 0;
    self.sending.clear();
    self.answering.clear();
    self.error = None;
    self.tab = SocialTab::default();
  }
}

fn response_verb(response: Response) -> &'static str {
  match response {
    Response::Accept => "accept",
    Response::Reject => "reject",
  }
}

#[cfg(test)]
mod tests {
  use golf_core::Error;

  use super::*;

  fn golfer(id: i64, status: FriendStatus) -> Golfer {
    Golfer {
      id,
      display_name: format!("Golfer {id}"),
      status,
      friendship_id: matches!(status, FriendStatus::Received).then_some(id * 10),
      total_courses: 0,
      total_rounds: 0,
      avatar: None,
    }
  }

  fn with_results(rows: Vec<Golfer>) -> SocialView {
    let mut v = SocialView::new();
    v.query = "kari".into();
    let (t, _) = v.begin_search().unwrap();
    v.apply_search(t, Ok(rows));
    v
  }

  #[test]
  fn ranks() {
    assert_eq!(rank_label(0), "1.");
    assert_eq!(rank_label(2), "3.");
    assert_eq!(rank_label(3), "#4");
  }

  #[test]
  fn blank_query_issues_nothing() {
    let mut v = SocialView::new();
    assert!(v.begin_search().is_none());
    v.query = "   ".into();
    assert!(v.begin_search().is_none());
    assert!(!v.results.is_loading());
  }

  #[test]
  fn query_is_trimmed() {
    let mut v = SocialView::new();
    v.query = "  kari ".into();
    let (_, q) = v.begin_search().unwrap();
    assert_eq!(q, "kari");
  }

  #[test]
  fn results_are_replaced_not_merged() {
    let mut v = with_results(vec![golfer(1, FriendStatus::None)]);
    let (t, _) = v.begin_search().unwrap();
    v.apply_search(t, Ok(vec![golfer(2, FriendStatus::None)]));
    let ids: Vec<_> = v.results.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, [2]);
  }

  #[test]
  fn stale_search_is_dropped() {
    let mut v = SocialView::new();
    v.query = "a".into();
    let (old, _) = v.begin_search().unwrap();
    v.query = "ab".into();
    let (new, _) = v.begin_search().unwrap();
    v.apply_search(new, Ok(vec![golfer(2, FriendStatus::None)]));
    v.apply_search(old, Ok(vec![golfer(1, FriendStatus::None)]));
    assert_eq!(v.results.rows[0].id, 2);
  }

  #[test]
  fn send_only_offered_for_none() {
    for status in [
      FriendStatus::Sent,
      FriendStatus::Received,
      FriendStatus::Friends,
      FriendStatus::Me,
    ] {
      let mut v = with_results(vec![golfer(5, status)]);
      assert_eq!(v.send_request(), None, "{status:?}");
    }
  }

  #[test]
  fn sent_request_reads_sent() {
    let mut v = with_results(vec![golfer(5, FriendStatus::None)]);
    assert_eq!(v.send_request(), Some(5));
    // In flight: no second request.
    assert_eq!(v.send_request(), None);
    v.request_sent(5, &Ok(()));
    assert_eq!(v.results.rows[0].status, FriendStatus::Sent);
    assert_eq!(v.send_request(), None);
  }

  #[test]
  fn failed_send_leaves_status() {
    let mut v = with_results(vec![golfer(5, FriendStatus::None)]);
    v.send_request();
    v.request_sent(5, &Err(Error::Invalid("nope".into())));
    assert_eq!(v.results.rows[0].status, FriendStatus::None);
    assert!(v.error.is_some());
    assert_eq!(v.send_request(), Some(5));
  }

  #[test]
  fn respond_uses_friendship_id_once() {
    let mut v = SocialView::new();
    let t = v.begin_requests();
    v.apply_requests(t, Ok(vec![golfer(3, FriendStatus::Received)]));
    assert_eq!(v.respond(), Some(30));
    assert_eq!(v.respond(), None);
    assert!(v.is_answering(30));
    v.responded(30, Response::Accept, &Ok(()));
    assert!(!v.is_answering(30));
    // The row is still there until the refetch replaces it.
    assert_eq!(v.requests.rows.len(), 1);
  }

  #[test]
  fn reset_discards_in_flight_lists() {
    let mut v = SocialView::new();
    let t = v.begin_friends();
    v.reset();
    v.apply_friends(t, Ok(vec![golfer(1, FriendStatus::Me)]));
    assert!(v.friends.rows.is_empty());
  }
}
