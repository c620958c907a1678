//! The `GolfApi` trait: every backend call the client can make.
//!
//! Implemented over HTTP by `golf-client`. `golf-tui` only talks to this
//! trait.

use std::future::Future;

use crate::{
  Result,
  course::Course,
  friend::{FriendshipId, Golfer, Response},
  overview::Overview,
  round::{NewRound, Round, RoundId},
  session::{Credentials, UserId, UserProfile},
};

/// All methods return `Send` futures so calls can be spawned onto a
/// multi-threaded runtime and their results delivered back to the UI loop.
pub trait GolfApi: Send + Sync {
  // ── Session ───────────────────────────────────────────────────────────

  /// `GET /api/auth/me`. Fails with [`Error::Unauthorized`] when there is no
  /// session.
  ///
  /// [`Error::Unauthorized`]: crate::Error::Unauthorized
  fn current_user(&self) -> impl Future<Output = Result<UserProfile>> + Send + '_;

  /// Submit credentials; on success the result has the same shape as
  /// [`current_user`](Self::current_user).
  fn login<'a>(
    &'a self,
    credentials: &'a Credentials,
  ) -> impl Future<Output = Result<UserProfile>> + Send + 'a;

  /// End the session.
  fn logout(&self) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Courses ───────────────────────────────────────────────────────────

  /// `GET /api/courses`
  fn list_courses(&self) -> impl Future<Output = Result<Vec<Course>>> + Send + '_;

  /// `GET /api/users/{id}/played-courses`
  fn played_courses(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<Vec<Course>>> + Send + '_;

  /// `POST /api/users/{id}/mark-played`: legacy marking without a round.
  fn mark_played<'a>(
    &'a self,
    user: UserId,
    course_external_id: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  // ── Rounds ────────────────────────────────────────────────────────────

  /// `GET /api/rounds`
  fn list_rounds(&self) -> impl Future<Output = Result<Vec<Round>>> + Send + '_;

  /// `POST /api/rounds`. Returns the round as the server stored it.
  fn create_round<'a>(
    &'a self,
    round: &'a NewRound,
  ) -> impl Future<Output = Result<Round>> + Send + 'a;

  /// `DELETE /api/rounds/{id}`
  fn delete_round(&self, id: RoundId) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Overview ──────────────────────────────────────────────────────────

  /// `GET /api/overview`
  fn overview(&self) -> impl Future<Output = Result<Overview>> + Send + '_;

  // ── Friends ───────────────────────────────────────────────────────────

  /// `GET /api/friends`: the leaderboard, including the viewer (`ME`).
  fn friends(&self) -> impl Future<Output = Result<Vec<Golfer>>> + Send + '_;

  /// `GET /api/friends/requests`: incoming pending requests.
  fn friend_requests(&self) -> impl Future<Output = Result<Vec<Golfer>>> + Send + '_;

  /// `GET /api/friends/search?query=<q>`
  fn search_users<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<Golfer>>> + Send + 'a;

  /// `POST /api/friends/request/{userId}`
  fn send_friend_request(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// `POST /api/friends/respond/{friendshipId}?action=ACCEPT|REJECT`
  fn respond_to_request(
    &self,
    friendship: FriendshipId,
    response: Response,
  ) -> impl Future<Output = Result<()>> + Send + '_;
}
