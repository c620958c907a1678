//! Connection settings for the golf backend.

use serde::Deserialize;

/// How credentials are submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMode {
  /// `POST /api/auth/login` with a JSON body; the response is the profile.
  #[default]
  Json,
  /// `POST /login` form-encoded; the profile is fetched afterwards.
  Form,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  /// Origin every relative API path is joined onto.
  pub base_url:     String,
  /// Name of the readable cookie carrying the CSRF token.
  pub csrf_cookie:  String,
  /// Header the token is echoed in on mutating requests.
  pub csrf_header:  String,
  pub login_mode:   LoginMode,
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url:     "http://localhost:8080".to_string(),
      csrf_cookie:  "XSRF-TOKEN".to_string(),
      csrf_header:  "X-XSRF-TOKEN".to_string(),
      login_mode:   LoginMode::Json,
      timeout_secs: 30,
    }
  }
}
