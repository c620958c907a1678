//! Error types for `golf-core`.

use thiserror::Error;

/// An error returned by any [`GolfApi`](crate::api::GolfApi) call.
#[derive(Debug, Error)]
pub enum Error {
  /// The backend rejected the session (HTTP 401).
  #[error("not authenticated")]
  Unauthorized,

  /// Any other non-success status.
  #[error("{method} {path} → {status}")]
  Status {
    method: &'static str,
    path:   String,
    status: u16,
  },

  #[error("transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("could not decode response: {0}")]
  Decode(String),

  /// A value rejected before any request was made.
  #[error("invalid input: {0}")]
  Invalid(String),
}

impl Error {
  /// Whether this error means the user has to log in again.
  pub fn is_unauthorized(&self) -> bool { matches!(self, Self::Unauthorized) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
