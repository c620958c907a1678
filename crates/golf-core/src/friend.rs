//! Friends, friend requests and user search results.
//!
//! All three endpoints return the same row shape; which fields are filled in
//! depends on the endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::UserId;

pub type FriendshipId = i64;

/// Relation between the viewer and another user, as reported by the server.
///
/// The client never computes a new status itself; it only mirrors what the
/// last response said.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendStatus {
  None,
  /// The viewer has sent a request that is still pending.
  Sent,
  /// The other user has sent the viewer a request.
  #[serde(alias = "PENDING_ACTION")]
  Received,
  #[serde(alias = "ACCEPTED")]
  Friends,
  /// The row is the viewer's own account.
  Me,
}

impl FriendStatus {
  /// Only users with no relation at all can be sent a request.
  pub fn can_send_request(self) -> bool { matches!(self, Self::None) }
}

/// One row of the friends list, the request list or a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Golfer {
  pub id:            UserId,
  pub display_name:  String,
  pub status:        FriendStatus,
  #[serde(default)]
  pub friendship_id: Option<FriendshipId>,
  #[serde(default)]
  pub total_courses: u32,
  #[serde(default)]
  pub total_rounds:  u32,
  #[serde(default)]
  pub avatar:        Option<String>,
}

/// Answer to an incoming friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
  Accept,
  Reject,
}

impl Response {
  /// Value of the `action` query parameter.
  pub fn as_param(self) -> &'static str {
    match self {
      Self::Accept => "ACCEPT",
      Self::Reject => "REJECT",
    }
  }
}

impl fmt::Display for Response {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_param())
  }
}
