//! Session gate and login form.

use golf_core::{
  fetch::{FetchGuard, Ticket},
  session::{Credentials, UserProfile},
};

/// Shown for every rejected login. Deliberately says nothing about which
/// field was wrong.
pub const LOGIN_FAILED: &str = "Invalid username or password";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
  #[default]
  Username,
  Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
  pub username:   String,
  pub password:   String,
  pub focus:      LoginField,
  pub error:      Option<String>,
  pub submitting: bool,
}

impl LoginForm {
  pub fn input(&mut self, c: char) {
    match self.focus {
      LoginField::Username => self.username.push(c),
      LoginField::Password => self.password.push(c),
    }
  }

  pub fn backspace(&mut self) {
    match self.focus {
      LoginField::Username => self.username.pop(),
      LoginField::Password => self.password.pop(),
    };
  }

  pub fn toggle_focus(&mut self) {
    self.focus = match self.focus {
      LoginField::Username => LoginField::Password,
      LoginField::Password => LoginField::Username,
    };
  }

  /// Credentials to submit, or `None` if a login is already in flight or a
  /// field is empty.
  pub fn submit(&mut self) -> Option<Credentials> {
    if self.submitting {
      return None;
    }
    if self.username.trim().is_empty() || self.password.is_empty() {
      self.error = Some("Enter username and password".into());
      return None;
    }
    self.submitting = true;
    self.error = None;
    Some(Credentials {
      username: self.username.trim().to_string(),
      password: self.password.clone(),
    })
  }

  /// Keep the username, drop the password.
  fn fail(&mut self) {
    self.submitting = false;
    self.password.clear();
    self.focus = LoginField::Password;
    self.error = Some(LOGIN_FAILED.into());
  }
}

#[derive(Debug)]
pub enum Gate {
  /// Identity check in flight.
  Checking,
  Anonymous(LoginForm),
  Authenticated(UserProfile),
}

#[derive(Debug)]
pub struct SessionGate {
  pub state: Gate,
  guard:     FetchGuard,
}

impl Default for SessionGate {
  fn default() -> Self { Self::new() }
}

impl SessionGate {
  pub fn new() -> Self {
    Self {
      state: Gate::Checking,
      guard: FetchGuard::new(),
    }
  }

  pub fn begin_check(&mut self) -> Ticket {
    self.state = Gate::Checking;
    self.guard.begin()
  }

  /// Apply the identity check. Any failure (network or status) falls back to
  /// the login form. Returns the profile when the visitor is authenticated.
  pub fn apply_check(
    &mut self,
    ticket: Ticket,
    result: golf_core::Result<UserProfile>,
  ) -> Option<&UserProfile> {
    if !self.guard.accept(ticket) {
      return None;
    }
    match result {
      Ok(profile) => {
        self.state = Gate::Authenticated(profile);
        self.profile()
      }
      Err(e) => {
        tracing::debug!("identity check failed: {e}");
        self.state = Gate::Anonymous(LoginForm::default());
        None
      }
    }
  }

  /// Apply a login outcome. Ignored unless a login is actually pending.
  pub fn apply_login(
    &mut self,
    result: golf_core::Result<UserProfile>,
  ) -> Option<&UserProfile> {
    let Gate::Anonymous(form) = &mut self.state else {
      return None;
    };
    if !form.submitting {
      return None;
    }
    match result {
      Ok(profile) => {
        self.state = Gate::Authenticated(profile);
        self.profile()
      }
      Err(e) => {
        tracing::warn!(user = %form.username, "login failed: {e}");
        form.fail();
        None
      }
    }
  }

  /// Drop the session and show an empty login form.
  pub fn sign_out(&mut self) {
    self.guard.invalidate();
    self.state = Gate::Anonymous(LoginForm::default());
  }

  pub fn profile(&self) -> Option<&UserProfile> {
    match &self.state {
      Gate::Authenticated(p) => Some(p),
      _ => None,
    }
  }

  pub fn form_mut(&mut self) -> Option<&mut LoginForm> {
    match &mut self.state {
      Gate::Anonymous(form) => Some(form),
      _ => None,
    }
  }
}
