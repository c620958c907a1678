//! The authenticated visitor and the credentials used to become one.

use std::fmt;

use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// The profile returned by `GET /api/auth/me` and by a successful login.
///
/// Both paths deserialise into this one shape so downstream views never need
/// to know whether the session was resumed or freshly created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  #[serde(alias = "id")]
  pub user_id:  UserId,
  #[serde(default)]
  pub name:     Option<String>,
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub email:    Option<String>,
  #[serde(default, alias = "avatar")]
  pub photo:    Option<String>,
}

impl UserProfile {
  /// Name shown in the profile bar: full name, then username, then email.
  pub fn display_name(&self) -> &str {
    [&self.name, &self.username, &self.email]
      .into_iter()
      .flatten()
      .map(String::as_str)
      .find(|s| !s.trim().is_empty())
      .unwrap_or("golfer")
  }
}

/// Username and password as typed into the login form.
#[derive(Clone, Serialize)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("username", &self.username)
      .field("password", &"<redacted>")
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn profile_accepts_id_alias() {
    let p: UserProfile =
      serde_json::from_str(r#"{"id":7,"name":"Kari"}"#).unwrap();
    assert_eq!(p.user_id, 7);
    assert_eq!(p.display_name(), "Kari");
  }

  #[test]
  fn display_name_falls_back_to_username() {
    let p: UserProfile = serde_json::from_str(
      r#"{"userId":3,"name":"","username":"testuser","photo":null}"#,
    )
    .unwrap();
    assert_eq!(p.display_name(), "testuser");
  }

  #[test]
  fn credentials_debug_hides_password() {
    let c = Credentials {
      username: "kari".into(),
      password: "hunter2".into(),
    };
    let shown = format!("{c:?}");
    assert!(shown.contains("kari"));
    assert!(!shown.contains("hunter2"));
  }
}
