//! Async HTTP client wrapping the golf JSON API.

use std::{sync::Arc, time::Duration};

use golf_core::{
  Error, Result,
  api::GolfApi,
  course::Course,
  friend::{FriendshipId, Golfer, Response},
  overview::Overview,
  round::{NewRound, Round, RoundId},
  session::{Credentials, UserId, UserProfile},
};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url, cookie::Jar, header, redirect};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::{
  config::{ClientConfig, LoginMode},
  csrf::CsrfCookie,
};

/// One logged-in session against the golf backend.
///
/// The session and XSRF cookies live in a jar shared by every clone, so a
/// login through any clone authenticates them all. Writes echo the XSRF
/// cookie back as a header.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  csrf:   CsrfCookie,
  config: Arc<ClientConfig>,
}

impl ApiClient {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let origin: Url = config
      .base_url
      .parse()
      .map_err(|e| Error::Invalid(format!("base url {:?}: {e}", config.base_url)))?;

    let jar = Arc::new(Jar::default());
    let client = Client::builder()
      .cookie_provider(jar.clone())
      // Redirects are how the backend signals login outcomes; inspect them.
      .redirect(redirect::Policy::none())
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(transport)?;

    let csrf = CsrfCookie::new(jar, origin, config.csrf_cookie.clone());
    Ok(Self {
      client,
      csrf,
      config: Arc::new(config),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    debug!(%method, path, "request");
    let req = self.client.request(method.clone(), self.url(path));
    if method == Method::GET {
      return req;
    }
    match self.csrf.token() {
      Some(token) => req.header(self.config.csrf_header.as_str(), token),
      None => req,
    }
  }

  async fn send(
    &self,
    method: Method,
    path: &str,
    req: RequestBuilder,
  ) -> Result<reqwest::Response> {
    let resp = req.send().await.map_err(transport)?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    if status == StatusCode::UNAUTHORIZED || redirects_to_login(&resp) {
      debug!(%method, path, %status, "not authenticated");
      return Err(Error::Unauthorized);
    }
    warn!(%method, path, %status, "request failed");
    Err(Error::Status {
      method: method_name(&method),
      path:   path.to_string(),
      status: status.as_u16(),
    })
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let resp = self
      .send(Method::GET, path, self.request(Method::GET, path))
      .await?;
    resp.json().await.map_err(decode)
  }

  async fn post_empty(&self, path: &str) -> Result<()> {
    self
      .send(Method::POST, path, self.request(Method::POST, path))
      .await?;
    Ok(())
  }

  async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
  where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    let req = self.request(Method::POST, path).json(body);
    let resp = self.send(Method::POST, path, req).await?;
    resp.json().await.map_err(decode)
  }

  async fn login_json(&self, credentials: &Credentials) -> Result<UserProfile> {
    self.post_json("/api/auth/login", credentials).await
  }

  /// Form login answers with a redirect; an `error` in the target means the
  /// credentials were rejected.
  async fn login_form(&self, credentials: &Credentials) -> Result<UserProfile> {
    let req = self.request(Method::POST, "/login").form(&[
      ("username", credentials.username.as_str()),
      ("password", credentials.password.as_str()),
    ]);
    let resp = req.send().await.map_err(transport)?;
    let status = resp.status();
    let rejected = status == StatusCode::UNAUTHORIZED
      || (status.is_redirection()
        && location(&resp).is_some_and(|loc| loc.contains("error")));
    if rejected {
      return Err(Error::Unauthorized);
    }
    if !status.is_success() && !status.is_redirection() {
      return Err(Error::Status {
        method: "POST",
        path:   "/login".to_string(),
        status: status.as_u16(),
      });
    }
    self.current_user().await
  }
}

impl GolfApi for ApiClient {
  // ── Session ───────────────────────────────────────────────────────────────

  async fn current_user(&self) -> Result<UserProfile> {
    self.get_json("/api/auth/me").await
  }

  async fn login(&self, credentials: &Credentials) -> Result<UserProfile> {
    let profile = match self.config.login_mode {
      LoginMode::Json => self.login_json(credentials).await?,
      LoginMode::Form => self.login_form(credentials).await?,
    };
    info!(user_id = profile.user_id, "logged in");
    Ok(profile)
  }

  /// The backend expires the session and CSRF cookies in its response, which
  /// clears them from the jar.
  async fn logout(&self) -> Result<()> {
    let resp = self
      .request(Method::POST, "/logout")
      .send()
      .await
      .map_err(transport)?;
    let status = resp.status();
    if status.is_success() || status.is_redirection() {
      info!("logged out");
      Ok(())
    } else if status == StatusCode::UNAUTHORIZED {
      debug!("logout without a session");
      Err(Error::Unauthorized)
    } else {
      Err(Error::Status {
        method: "POST",
        path:   "/logout".to_string(),
        status: status.as_u16(),
      })
    }
  }

  // ── Courses ───────────────────────────────────────────────────────────────

  async fn list_courses(&self) -> Result<Vec<Course>> {
    self.get_json("/api/courses").await
  }

  async fn played_courses(&self, user: UserId) -> Result<Vec<Course>> {
    self
      .get_json(&format!("/api/users/{user}/played-courses"))
      .await
  }

  async fn mark_played(&self, user: UserId, course_external_id: &str) -> Result<()> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Body<'a> {
      course_external_id: &'a str,
    }
    let path = format!("/api/users/{user}/mark-played");
    let req = self
      .request(Method::POST, &path)
      .json(&Body { course_external_id });
    self.send(Method::POST, &path, req).await?;
    Ok(())
  }

  // ── Rounds ────────────────────────────────────────────────────────────────

  async fn list_rounds(&self) -> Result<Vec<Round>> {
    self.get_json("/api/rounds").await
  }

  async fn create_round(&self, round: &NewRound) -> Result<Round> {
    let created: Round = self.post_json("/api/rounds", round).await?;
    info!(round_id = created.id, course_id = created.course_id, "round created");
    Ok(created)
  }

  async fn delete_round(&self, id: RoundId) -> Result<()> {
    let path = format!("/api/rounds/{id}");
    self
      .send(Method::DELETE, &path, self.request(Method::DELETE, &path))
      .await?;
    info!(round_id = id, "round deleted");
    Ok(())
  }

  // ── Overview ──────────────────────────────────────────────────────────────

  async fn overview(&self) -> Result<Overview> {
    self.get_json("/api/overview").await
  }

  // ── Friends ───────────────────────────────────────────────────────────────

  async fn friends(&self) -> Result<Vec<Golfer>> {
    self.get_json("/api/friends").await
  }

  async fn friend_requests(&self) -> Result<Vec<Golfer>> {
    self.get_json("/api/friends/requests").await
  }

  async fn search_users(&self, query: &str) -> Result<Vec<Golfer>> {
    let path = "/api/friends/search";
    let req = self.request(Method::GET, path).query(&[("query", query)]);
    let resp = self.send(Method::GET, path, req).await?;
    resp.json().await.map_err(decode)
  }

  async fn send_friend_request(&self, user: UserId) -> Result<()> {
    self
      .post_empty(&format!("/api/friends/request/{user}"))
      .await
  }

  async fn respond_to_request(
    &self,
    friendship: FriendshipId,
    response: Response,
  ) -> Result<()> {
    let path = format!("/api/friends/respond/{friendship}");
    let req = self
      .request(Method::POST, &path)
      .query(&[("action", response.as_param())]);
    self.send(Method::POST, &path, req).await?;
    Ok(())
  }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn transport(e: reqwest::Error) -> Error { Error::Transport(Box::new(e)) }

fn decode(e: reqwest::Error) -> Error { Error::Decode(e.to_string()) }

fn location(resp: &reqwest::Response) -> Option<&str> {
  resp.headers().get(header::LOCATION)?.to_str().ok()
}

/// An unauthenticated API call is answered with a redirect to the login page.
fn redirects_to_login(resp: &reqwest::Response) -> bool {
  resp.status().is_redirection() && location(resp).is_some_and(|l| l.contains("login"))
}

fn method_name(method: &Method) -> &'static str {
  match *method {
    Method::GET => "GET",
    Method::POST => "POST",
    Method::DELETE => "DELETE",
    Method::PUT => "PUT",
    _ => "HTTP",
  }
}
