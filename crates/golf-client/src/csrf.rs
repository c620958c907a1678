//! The single accessor for the double-submit CSRF cookie.

use std::sync::Arc;

use reqwest::{
  Url,
  cookie::{CookieStore, Jar},
};

/// Reads the CSRF token out of the client's cookie jar.
#[derive(Clone)]
pub struct CsrfCookie {
  jar:    Arc<Jar>,
  origin: Url,
  name:   String,
}

impl CsrfCookie {
  pub fn new(jar: Arc<Jar>, origin: Url, name: impl Into<String>) -> Self {
    Self {
      jar,
      origin,
      name: name.into(),
    }
  }

  /// The current token, if the backend has set the cookie.
  pub fn token(&self) -> Option<String> {
    let header = self.jar.cookies(&self.origin)?;
    let header = header.to_str().ok()?;
    cookie_value(header, &self.name)
  }
}

/// Look up `name` in a `Cookie:` header value (`a=1; b=2`).
fn cookie_value(header: &str, name: &str) -> Option<String> {
  header.split(';').find_map(|pair| {
    let (key, value) = pair.trim().split_once('=')?;
    (key == name && !value.is_empty()).then(|| value.to_string())
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn finds_named_cookie() {
    let h = "JSESSIONID=abc; XSRF-TOKEN=7f3c-11; theme=dark";
    assert_eq!(cookie_value(h, "XSRF-TOKEN").as_deref(), Some("7f3c-11"));
    assert_eq!(cookie_value(h, "JSESSIONID").as_deref(), Some("abc"));
    assert_eq!(cookie_value(h, "missing"), None);
  }

  #[test]
  fn empty_value_counts_as_absent() {
    assert_eq!(cookie_value("XSRF-TOKEN=", "XSRF-TOKEN"), None);
  }

  #[test]
  fn reads_token_from_jar() {
    let jar = Arc::new(Jar::default());
    let origin: Url = "http://golf.test".parse().unwrap();
    let csrf = CsrfCookie::new(jar.clone(), origin.clone(), "XSRF-TOKEN");
    assert_eq!(csrf.token(), None);

    jar.add_cookie_str("XSRF-TOKEN=tok-1; Path=/", &origin);
    assert_eq!(csrf.token().as_deref(), Some("tok-1"));
  }
}
