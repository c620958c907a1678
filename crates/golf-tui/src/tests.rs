//! App-level flows against an in-memory backend.

use std::{
  collections::BTreeMap,
  sync::{Arc, Mutex},
};

use chrono::{Days, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use golf_core::{
  Error, Result,
  api::GolfApi,
  course::Course,
  friend::{FriendStatus, FriendshipId, Golfer, Response},
  overview::{Overview, RecentRound, RegionCourse, RegionStat},
  round::{NewRound, Round, RoundId},
  session::{Credentials, UserId, UserProfile},
};
use ratatui::{Terminal, backend::TestBackend};
use tokio::sync::Notify;

use crate::{
  app::{App, Screen},
  views::session::{Gate, LOGIN_FAILED},
};

// ─── Fake backend ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Backend {
  session:     Option<UserProfile>,
  courses:     Vec<Course>,
  rounds:      Vec<Round>,
  next_round:  RoundId,
  last_round:  Option<NewRound>,
  friends:     Vec<Golfer>,
  requests:    Vec<Golfer>,
  users:       Vec<Golfer>,
  fail_create: bool,
  expired:     bool,
  /// Parks the next `list_rounds` answer until notified.
  hold_rounds: Option<Arc<Notify>>,
}

/// Records every call by name and answers from `Backend`.
#[derive(Clone, Default)]
struct FakeApi {
  backend: Arc<Mutex<Backend>>,
  calls:   Arc<Mutex<Vec<String>>>,
}

fn kari() -> UserProfile {
  UserProfile {
    user_id:  7,
    name:     Some("Kari".into()),
    username: Some("kari".into()),
    email:    Some("kari@golf.no".into()),
    photo:    None,
  }
}

fn course(id: i64, name: &str) -> Course {
  Course {
    id,
    external_id: Some(format!("ext-{id}")),
    name: name.into(),
    latitude: Some(59.9 + id as f64 / 100.0),
    longitude: Some(10.7),
  }
}

fn golfer(id: UserId, name: &str, status: FriendStatus) -> Golfer {
  Golfer {
    id,
    display_name: name.into(),
    status,
    friendship_id: matches!(status, FriendStatus::Received).then_some(id * 100),
    total_courses: id as u32,
    total_rounds: 2 * id as u32,
    avatar: None,
  }
}

fn day(s: &str) -> NaiveDate { s.parse().unwrap() }

impl FakeApi {
  fn new(signed_in: bool) -> Self {
    let fake = Self::default();
    {
      let mut b = fake.backend.lock().unwrap();
      b.session = signed_in.then(kari);
      b.courses = vec![course(1, "Bogstad"), course(2, "Grini")];
      b.rounds = vec![Round {
        id:          41,
        course_id:   2,
        course_name: Some("Grini".into()),
        date:        day("2024-05-02"),
        score:       88,
      }];
      b.next_round = 100;
      b.friends = vec![golfer(7, "Kari", FriendStatus::Me), golfer(3, "Ola", FriendStatus::Friends)];
      b.requests = vec![golfer(5, "Per", FriendStatus::Received)];
      b.users = vec![golfer(9, "Kari Nordmann", FriendStatus::None)];
    }
    fake
  }

  fn record(&self, call: impl Into<String>) -> Result<()> {
    self.calls.lock().unwrap().push(call.into());
    let b = self.backend.lock().unwrap();
    if b.expired || b.session.is_none() {
      return Err(Error::Unauthorized);
    }
    Ok(())
  }

  fn count(&self, call: &str) -> usize {
    self
      .calls
      .lock()
      .unwrap()
      .iter()
      .filter(|c| c.as_str() == call || c.starts_with(&format!("{call} ")))
      .count()
  }

  fn with<T>(&self, f: impl FnOnce(&mut Backend) -> T) -> T { f(&mut self.backend.lock().unwrap()) }
}

impl GolfApi for FakeApi {
  async fn current_user(&self) -> Result<UserProfile> {
    self.record("current_user")?;
    self.with(|b| b.session.clone().ok_or(Error::Unauthorized))
  }

  async fn login(&self, credentials: &Credentials) -> Result<UserProfile> {
    self.calls.lock().unwrap().push("login".into());
    if credentials.username == "kari" && credentials.password == "secret" {
      self.with(|b| {
        b.session = Some(kari());
        b.expired = false;
      });
      Ok(kari())
    } else {
      Err(Error::Unauthorized)
    }
  }

  async fn logout(&self) -> Result<()> {
    self.record("logout")?;
    self.with(|b| b.session = None);
    Ok(())
  }

  async fn list_courses(&self) -> Result<Vec<Course>> {
    self.record("list_courses")?;
    Ok(self.with(|b| b.courses.clone()))
  }

  async fn played_courses(&self, user: UserId) -> Result<Vec<Course>> {
    self.record(format!("played_courses {user}"))?;
    Ok(self.with(|b| {
      b.courses
        .iter()
        .filter(|c| b.rounds.iter().any(|r| r.course_id == c.id))
        .cloned()
        .collect()
    }))
  }

  async fn mark_played(&self, user: UserId, course_external_id: &str) -> Result<()> {
    self.record(format!("mark_played {user} {course_external_id}"))
  }

  async fn list_rounds(&self) -> Result<Vec<Round>> {
    self.record("list_rounds")?;
    let (rounds, hold) = self.with(|b| (b.rounds.clone(), b.hold_rounds.take()));
    if let Some(hold) = hold {
      hold.notified().await;
    }
    Ok(rounds)
  }

  async fn create_round(&self, round: &NewRound) -> Result<Round> {
    self.record("create_round")?;
    self.with(|b| {
      b.last_round = Some(round.clone());
      if b.fail_create {
        return Err(Error::Status {
          method: "POST",
          path:   "/api/rounds".into(),
          status: 503,
        });
      }
      b.next_round += 1;
      let created = Round {
        id:          b.next_round,
        course_id:   round.course_id,
        course_name: None,
        date:        round.date,
        score:       round.score,
      };
      b.rounds.push(created.clone());
      Ok(created)
    })
  }

  async fn delete_round(&self, id: RoundId) -> Result<()> {
    self.record(format!("delete_round {id}"))?;
    self.with(|b| b.rounds.retain(|r| r.id != id));
    Ok(())
  }

  async fn overview(&self) -> Result<Overview> {
    self.record("overview")?;
    Ok(self.with(|b| {
      let played = |id| b.rounds.iter().any(|r| r.course_id == id);
      let courses: Vec<_> = b
        .courses
        .iter()
        .map(|c| RegionCourse {
          id:          c.id,
          name:        c.name.clone(),
          latitude:    c.latitude,
          longitude:   c.longitude,
          external_id: c.external_id.clone(),
          played:      played(c.id),
        })
        .collect();
      let played_count = courses.iter().filter(|c| c.played).count() as u64;
      let total = courses.len() as u64;
      Overview {
        display_name:        Some("Kari".into()),
        email:               Some("kari@golf.no".into()),
        avatar:              None,
        total_played:        played_count,
        total_courses:       total,
        percentage_complete: 100.0 * played_count as f64 / total as f64,
        region_stats:        BTreeMap::from([("Oslo".to_string(), RegionStat {
          played_count,
          total_count: total,
          percentage: None,
          courses,
        })]),
        recent_rounds:       b
          .rounds
          .iter()
          .map(|r| RecentRound {
            id:          r.id,
            course_name: r.course_name.clone().unwrap_or_default(),
            date:        r.date,
            score:       r.score,
          })
          .collect(),
      }
    }))
  }

  async fn friends(&self) -> Result<Vec<Golfer>> {
    self.record("friends")?;
    Ok(self.with(|b| b.friends.clone()))
  }

  async fn friend_requests(&self) -> Result<Vec<Golfer>> {
    self.record("friend_requests")?;
    Ok(self.with(|b| b.requests.clone()))
  }

  async fn search_users(&self, query: &str) -> Result<Vec<Golfer>> {
    self.record(format!("search_users {query}"))?;
    let query = query.to_lowercase();
    Ok(self.with(|b| {
      b.users
        .iter()
        .filter(|u| u.display_name.to_lowercase().contains(&query))
        .cloned()
        .collect()
    }))
  }

  async fn send_friend_request(&self, user: UserId) -> Result<()> {
    self.record(format!("send_friend_request {user}"))?;
    self.with(|b| {
      for u in b.users.iter_mut().filter(|u| u.id == user) {
        u.status = FriendStatus::Sent;
      }
    });
    Ok(())
  }

  async fn respond_to_request(&self, friendship: FriendshipId, response: Response) -> Result<()> {
    self.record(format!("respond_to_request {friendship} {response}"))?;
    self.with(|b| {
      let Some(pos) = b.requests.iter().position(|r| r.friendship_id == Some(friendship)) else {
        return;
      };
      let mut row = b.requests.remove(pos);
      if response == Response::Accept {
        row.status = FriendStatus::Friends;
        row.friendship_id = None;
        b.friends.push(row);
      }
    });
    Ok(())
  }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

fn press(app: &mut App<FakeApi>, code: KeyCode) -> bool { app.handle_key(key(code)) }

fn type_text(app: &mut App<FakeApi>, text: &str) {
  for c in text.chars() {
    press(app, KeyCode::Char(c));
  }
}

fn today() -> NaiveDate { Local::now().date_naive() }

async fn signed_in() -> (App<FakeApi>, FakeApi) {
  let fake = FakeApi::new(true);
  let mut app = App::new(fake.clone());
  app.start();
  app.settle().await;
  assert!(app.gate.profile().is_some());
  (app, fake)
}

/// Open the log dialog for the first course in the list.
fn open_dialog(app: &mut App<FakeApi>) {
  press(app, KeyCode::Enter); // popup
  press(app, KeyCode::Enter); // dialog
  assert!(app.dialog.is_open());
}

fn render(app: &App<FakeApi>) -> String {
  let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
  terminal.draw(|f| crate::ui::draw(f, app)).unwrap();
  terminal
    .backend()
    .buffer()
    .content
    .iter()
    .map(|cell| cell.symbol())
    .collect()
}

// ─── Session ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_flow_reaches_map_and_loads_courses() {
  let fake = FakeApi::new(false);
  let mut app = App::new(fake.clone());
  app.start();
  app.settle().await;
  assert!(matches!(app.gate.state, Gate::Anonymous(_)));
  assert_eq!(fake.count("list_courses"), 0);

  type_text(&mut app, "kari");
  press(&mut app, KeyCode::Tab);
  type_text(&mut app, "secret");
  press(&mut app, KeyCode::Enter);
  app.settle().await;

  assert_eq!(app.gate.profile().map(|p| p.display_name()), Some("Kari"));
  assert_eq!(app.screen, Screen::Map);
  assert_eq!(fake.count("list_courses"), 1);
  assert_eq!(fake.count("list_rounds"), 1);
  assert!(render(&app).contains("Kari"));
}

#[tokio::test]
async fn wrong_password_shows_generic_message() {
  let fake = FakeApi::new(false);
  let mut app = App::new(fake.clone());
  app.start();
  app.settle().await;

  type_text(&mut app, "kari");
  press(&mut app, KeyCode::Tab);
  type_text(&mut app, "nope");
  press(&mut app, KeyCode::Enter);
  app.settle().await;

  let form = app.gate.form_mut().unwrap();
  assert_eq!(form.error.as_deref(), Some(LOGIN_FAILED));
  assert_eq!(form.username, "kari");
  assert!(form.password.is_empty());
  assert!(render(&app).contains(LOGIN_FAILED));
}

#[tokio::test]
async fn expired_session_returns_to_login() {
  let (mut app, fake) = signed_in().await;
  fake.with(|b| b.expired = true);
  press(&mut app, KeyCode::Char('2'));
  app.settle().await;

  assert!(matches!(app.gate.state, Gate::Anonymous(_)));
  assert!(app.overview.snapshot().is_none());
  assert!(app.catalog.courses().is_empty());
}

#[tokio::test]
async fn logout_discards_everything_in_flight() {
  let (mut app, fake) = signed_in().await;
  press(&mut app, KeyCode::Char('2'));
  press(&mut app, KeyCode::Char('L'));
  app.settle().await;

  assert_eq!(fake.count("logout"), 1);
  assert!(matches!(app.gate.state, Gate::Anonymous(_)));
  assert!(app.overview.snapshot().is_none());
  assert!(app.catalog.rounds().is_empty());
}

#[tokio::test]
async fn logout_after_session_expiry_signs_out_quietly() {
  let (mut app, fake) = signed_in().await;
  fake.with(|b| b.expired = true);
  press(&mut app, KeyCode::Char('L'));
  app.settle().await;

  assert_eq!(fake.count("logout"), 1);
  assert!(app.alert.is_none());
  assert!(matches!(app.gate.state, Gate::Anonymous(_)));
}

// ─── Round logging ────────────────────────────────────────────────────────────

#[tokio::test]
async fn invalid_rounds_never_reach_the_backend() {
  let (mut app, fake) = signed_in().await;
  open_dialog(&mut app);

  for (date, score) in [
    (today(), "0"),
    (today(), "-5"),
    (today().checked_add_days(Days::new(1)).unwrap(), "82"),
    (day("1999-12-31"), "82"),
  ] {
    app.dialog.date = date.format("%Y-%m-%d").to_string();
    app.dialog.score = score.into();
    press(&mut app, KeyCode::Enter);
    app.settle().await;
    assert!(app.dialog.error.is_some(), "{date} {score}");
  }
  assert_eq!(fake.count("create_round"), 0);

  app.dialog.date = today().format("%Y-%m-%d").to_string();
  app.dialog.score = "82".into();
  press(&mut app, KeyCode::Enter);
  app.settle().await;
  assert_eq!(fake.count("create_round"), 1);

  let sent = fake.with(|b| b.last_round.clone()).unwrap();
  assert_eq!(sent.course_id, 1);
  assert_eq!(sent.course_external_id.as_deref(), Some("ext-1"));
  assert_eq!(sent.score, 82);
  assert_eq!(sent.date, today());
}

#[tokio::test]
async fn double_submit_sends_one_request() {
  let (mut app, fake) = signed_in().await;
  open_dialog(&mut app);
  type_text(&mut app, "82");
  press(&mut app, KeyCode::Enter);
  press(&mut app, KeyCode::Enter);
  app.settle().await;
  assert_eq!(fake.count("create_round"), 1);
}

#[tokio::test]
async fn saved_round_marks_course_played_and_closes_popup() {
  let (mut app, _fake) = signed_in().await;
  assert!(!app.catalog.played().contains(1));
  open_dialog(&mut app);
  type_text(&mut app, "82");
  press(&mut app, KeyCode::Enter);
  app.settle().await;
  app.tick();

  assert!(!app.dialog.is_open());
  assert!(app.catalog.played().contains(1));
  assert_eq!(app.catalog.activity(1).map(|a| a.best_score), Some(82));
  assert_eq!(app.map.popup, None);
}

#[tokio::test]
async fn round_list_from_before_save_does_not_unmark_course() {
  let (mut app, fake) = signed_in().await;
  let hold = Arc::new(Notify::new());
  fake.with(|b| b.hold_rounds = Some(hold.clone()));

  // Remount the map; its round fetch answers from before the save.
  press(&mut app, KeyCode::Char('2'));
  press(&mut app, KeyCode::Char('1'));
  assert_eq!(app.screen, Screen::Map);
  open_dialog(&mut app);
  type_text(&mut app, "82");
  press(&mut app, KeyCode::Enter);
  while app.dialog.is_open() {
    tokio::task::yield_now().await;
    app.drain();
  }
  assert!(app.catalog.played().contains(1));

  hold.notify_one();
  app.settle().await;
  assert!(app.catalog.played().contains(1));
  assert_eq!(app.catalog.activity(1).map(|a| a.best_score), Some(82));
  assert_eq!(fake.count("list_rounds"), 3);
}

#[tokio::test]
async fn failed_save_alerts_and_allows_retry() {
  let (mut app, fake) = signed_in().await;
  fake.with(|b| b.fail_create = true);
  open_dialog(&mut app);
  type_text(&mut app, "82");
  press(&mut app, KeyCode::Enter);
  app.settle().await;

  assert!(app.alert.is_some());
  assert!(app.dialog.is_open());
  assert!(!app.dialog.is_submitting());
  assert!(!app.catalog.played().contains(1));

  // First key only dismisses the alert.
  press(&mut app, KeyCode::Enter);
  assert!(app.alert.is_none());
  assert_eq!(fake.count("create_round"), 1);

  fake.with(|b| b.fail_create = false);
  press(&mut app, KeyCode::Enter);
  app.settle().await;
  assert_eq!(fake.count("create_round"), 2);
  assert!(!app.dialog.is_open());
}

// ─── Overview ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_needs_confirmation_and_refetches_once() {
  let (mut app, fake) = signed_in().await;
  press(&mut app, KeyCode::Char('2'));
  app.settle().await;
  assert_eq!(fake.count("overview"), 1);
  let rounds_before = fake.count("list_rounds");

  press(&mut app, KeyCode::Tab);
  press(&mut app, KeyCode::Char('d'));
  app.settle().await;
  assert_eq!(fake.count("delete_round"), 0);
  assert_eq!(app.overview.staged_delete(), Some(41));

  press(&mut app, KeyCode::Char('y'));
  app.settle().await;
  assert_eq!(fake.count("delete_round 41"), 1);
  assert_eq!(fake.count("overview"), 2);
  assert_eq!(fake.count("list_rounds"), rounds_before + 1);
  assert!(app.overview.snapshot().unwrap().recent_rounds.is_empty());
  assert!(!app.catalog.played().contains(2));
}

#[tokio::test]
async fn cancelled_delete_makes_no_call() {
  let (mut app, fake) = signed_in().await;
  press(&mut app, KeyCode::Char('2'));
  app.settle().await;
  press(&mut app, KeyCode::Tab);
  press(&mut app, KeyCode::Char('d'));
  press(&mut app, KeyCode::Char('n'));
  app.settle().await;
  assert_eq!(fake.count("delete_round"), 0);
  assert_eq!(app.overview.staged_delete(), None);
}

#[tokio::test]
async fn region_course_opens_on_map() {
  let (mut app, _fake) = signed_in().await;
  press(&mut app, KeyCode::Char('2'));
  app.settle().await;

  press(&mut app, KeyCode::Enter); // into "Oslo"
  let first = render(&app);
  press(&mut app, KeyCode::Esc);
  press(&mut app, KeyCode::Enter);
  assert_eq!(render(&app), first);

  press(&mut app, KeyCode::Down);
  press(&mut app, KeyCode::Enter);
  assert_eq!(app.screen, Screen::Map);
  assert!(app.pending_focus.is_some());
  app.settle().await;

  app.tick();
  assert!(app.pending_focus.is_none());
  assert!(app.map.is_flying());
  let id = app.map.cursor_course(&app.catalog).map(|c| c.id);
  assert_eq!(id, app.overview.cursor_course().map(|c| c.id));
}

// ─── Friends ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn friend_request_round_trip() {
  let (mut app, fake) = signed_in().await;
  press(&mut app, KeyCode::Char('3'));
  app.settle().await;
  assert_eq!(app.social.requests.rows.len(), 1);

  press(&mut app, KeyCode::Tab);
  press(&mut app, KeyCode::Char('/'));
  type_text(&mut app, "kari");
  press(&mut app, KeyCode::Enter);
  app.settle().await;
  assert_eq!(app.social.results.rows[0].status, FriendStatus::None);

  press(&mut app, KeyCode::Char('s'));
  app.settle().await;
  assert_eq!(fake.count("send_friend_request 9"), 1);
  assert_eq!(app.social.results.rows[0].status, FriendStatus::Sent);

  // The next search agrees with the server.
  press(&mut app, KeyCode::Enter);
  app.settle().await;
  assert_eq!(app.social.results.rows[0].status, FriendStatus::Sent);
  press(&mut app, KeyCode::Char('s'));
  app.settle().await;
  assert_eq!(fake.count("send_friend_request"), 1);
}

#[tokio::test]
async fn accepting_refetches_both_lists() {
  let (mut app, fake) = signed_in().await;
  press(&mut app, KeyCode::Char('3'));
  app.settle().await;

  press(&mut app, KeyCode::Char('a'));
  app.settle().await;
  assert_eq!(fake.count("respond_to_request 500 ACCEPT"), 1);
  assert_eq!(fake.count("friends"), 2);
  assert_eq!(fake.count("friend_requests"), 2);
  assert!(app.social.requests.rows.is_empty());
  assert!(app.social.friends.rows.iter().any(|g| g.id == 5 && g.status == FriendStatus::Friends));
}

#[tokio::test]
async fn blank_search_is_not_sent() {
  let (mut app, fake) = signed_in().await;
  press(&mut app, KeyCode::Char('3'));
  app.settle().await;
  press(&mut app, KeyCode::Tab);
  press(&mut app, KeyCode::Char('/'));
  type_text(&mut app, "   ");
  press(&mut app, KeyCode::Enter);
  app.settle().await;
  assert_eq!(fake.count("search_users"), 0);
}

#[tokio::test]
async fn quit_keys() {
  let (mut app, _fake) = signed_in().await;
  assert!(!app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
  assert!(!press(&mut app, KeyCode::Char('q')));
}
