//! Application state machine and event dispatcher.
//!
//! The [`App`] owns every view. Network calls never run inline: each one is
//! spawned onto the runtime and its outcome comes back as a [`Message`], which
//! the event loop applies between frames. Anything that depends on an earlier
//! call is spawned from the handler of that call's message.

use std::{future::Future, sync::Arc};

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use golf_core::{
  Error, Result,
  api::GolfApi,
  course::Course,
  fetch::Ticket,
  friend::{FriendshipId, Golfer, Response},
  overview::Overview,
  round::{Round, RoundId},
  session::{UserId, UserProfile},
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{info, warn};

use crate::views::{
  catalog::CourseCatalog,
  log_round::LogRoundDialog,
  map::{FocusRequest, MapSurface},
  overview::{COURSE_ZOOM, OverviewFocus, OverviewView, RegionSelection},
  session::{Gate, SessionGate},
  social::{SocialTab, SocialView},
};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
  #[default]
  Map,
  Overview,
  Social,
}

// ─── Messages ─────────────────────────────────────────────────────────────────

/// Outcome of one spawned call.
#[derive(Debug)]
pub enum Message {
  SessionChecked(Ticket, Result<UserProfile>),
  LoggedIn(Result<UserProfile>),
  LoggedOut(Result<()>),
  CoursesLoaded(Ticket, Result<Vec<Course>>),
  RoundsLoaded(Ticket, Result<Vec<Round>>),
  RoundCreated(Result<Round>),
  OverviewLoaded(Ticket, Result<Overview>),
  RoundDeleted(RoundId, Result<()>),
  FriendsLoaded(Ticket, Result<Vec<Golfer>>),
  RequestsLoaded(Ticket, Result<Vec<Golfer>>),
  SearchResults(Ticket, Result<Vec<Golfer>>),
  FriendRequestSent(UserId, Result<()>),
  RequestAnswered(FriendshipId, Response, Result<()>),
}

/// A message tagged with the session epoch it was spawned under.
type Envelope = (u64, Message);

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<A> {
  api: Arc<A>,
  tx:  UnboundedSender<Envelope>,
  rx:  UnboundedReceiver<Envelope>,

  /// Spawned calls whose message has not been applied yet.
  in_flight: usize,

  /// Bumped on every sign-out; messages from an older epoch are dropped.
  epoch: u64,

  pub screen:  Screen,
  pub gate:    SessionGate,
  pub catalog: CourseCatalog,
  pub map:     MapSurface,
  pub dialog:  LogRoundDialog,
  pub overview: OverviewView,
  pub social:  SocialView,

  /// Recenter request from the overview, consumed by the map on the next tick.
  pub pending_focus: Option<FocusRequest>,

  /// Incremented after every saved round; the map closes its popup on change.
  pub close_trigger: u64,

  /// Blocking alert for a failed write. Any key dismisses it.
  pub alert: Option<String>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl<A: GolfApi + 'static> App<A> {
  pub fn new(api: A) -> Self {
    let (tx, rx) = unbounded_channel();
    Self {
      api: Arc::new(api),
      tx,
      rx,
      in_flight: 0,
      epoch: 0,
      screen: Screen::default(),
      gate: SessionGate::new(),
      catalog: CourseCatalog::new(),
      map: MapSurface::new(),
      dialog: LogRoundDialog::new(),
      overview: OverviewView::new(),
      social: SocialView::new(),
      pending_focus: None,
      close_trigger: 0,
      alert: None,
      status_msg: String::new(),
    }
  }

  // ── Task plumbing ─────────────────────────────────────────────────────────

  fn spawn<F, Fut>(&mut self, call: F)
  where
    F: FnOnce(Arc<A>) -> Fut,
    Fut: Future<Output = Message> + Send + 'static,
  {
    let fut = call(Arc::clone(&self.api));
    let tx = self.tx.clone();
    let epoch = self.epoch;
    self.in_flight += 1;
    tokio::spawn(async move {
      // The receiver lives as long as the app; a send error means we are
      // shutting down.
      let _ = tx.send((epoch, fut.await));
    });
  }

  /// Kick off the startup identity check.
  pub fn start(&mut self) {
    let ticket = self.gate.begin_check();
    self.spawn(move |api| async move { Message::SessionChecked(ticket, api.current_user().await) });
  }

  /// Apply every message that has arrived, without waiting.
  pub fn drain(&mut self) {
    while let Ok(envelope) = self.rx.try_recv() {
      self.in_flight = self.in_flight.saturating_sub(1);
      self.apply(envelope);
    }
  }

  /// Wait until every spawned call, including ones spawned while applying
  /// earlier messages, has been applied.
  #[cfg(test)]
  pub(crate) async fn settle(&mut self) {
    while self.in_flight > 0 {
      let Some(envelope) = self.rx.recv().await else {
        break;
      };
      self.in_flight -= 1;
      self.apply(envelope);
    }
  }

  /// Advance per-frame state.
  pub fn tick(&mut self) {
    self.map.observe_close_trigger(self.close_trigger);
    self.map.take_focus(&mut self.pending_focus);
    self.map.tick();
  }

  pub fn is_busy(&self) -> bool { self.in_flight > 0 }

  // ── Applying results ──────────────────────────────────────────────────────

  fn apply(&mut self, (epoch, message): Envelope) {
    if epoch != self.epoch {
      warn!(?message, "dropping result from a previous session");
      return;
    }
    match message {
      Message::SessionChecked(ticket, result) => {
        if let Some(profile) = self.gate.apply_check(ticket, result) {
          info!(user = profile.user_id, "session restored");
          self.enter_shell();
        }
      }
      Message::LoggedIn(result) => {
        if let Some(profile) = self.gate.apply_login(result) {
          info!(user = profile.user_id, "logged in");
          self.enter_shell();
        }
      }
      Message::LoggedOut(result) => match result {
        Ok(()) => {
          info!("logged out");
          self.sign_out_local();
        }
        Err(e) if e.is_unauthorized() => self.sign_out_local(),
        Err(e) => self.write_failed("Logout failed", &e),
      },
      Message::CoursesLoaded(ticket, result) => {
        if !self.session_expired(&result) {
          self.catalog.apply_courses(ticket, result);
        }
      }
      Message::RoundsLoaded(ticket, result) => {
        if !self.session_expired(&result) {
          self.catalog.apply_rounds(ticket, result);
        }
      }
      Message::RoundCreated(result) => self.round_created(result),
      Message::OverviewLoaded(ticket, result) => {
        if !self.session_expired(&result) {
          self.overview.apply_load(ticket, result);
        }
      }
      Message::RoundDeleted(id, result) => self.round_deleted(id, result),
      Message::FriendsLoaded(ticket, result) => {
        if !self.session_expired(&result) {
          self.social.apply_friends(ticket, result);
        }
      }
      Message::RequestsLoaded(ticket, result) => {
        if !self.session_expired(&result) {
          self.social.apply_requests(ticket, result);
        }
      }
      Message::SearchResults(ticket, result) => {
        if !self.session_expired(&result) {
          self.social.apply_search(ticket, result);
        }
      }
      Message::FriendRequestSent(user, result) => {
        if self.session_expired(&result) {
          return;
        }
        self.social.request_sent(user, &result);
        match result {
          Ok(()) => {
            info!(user, "friend request sent");
            self.status_msg = "Friend request sent".into();
          }
          Err(e) => self.write_failed("Could not send friend request", &e),
        }
      }
      Message::RequestAnswered(friendship, response, result) => {
        if self.session_expired(&result) {
          return;
        }
        self.social.responded(friendship, response, &result);
        match result {
          Ok(()) => {
            info!(friendship, %response, "friend request answered");
            self.load_friends();
          }
          Err(e) => self.write_failed("Could not answer friend request", &e),
        }
      }
    }
  }

  fn round_created(&mut self, result: Result<Round>) {
    if self.session_expired(&result) {
      return;
    }
    match result {
      Ok(round) => {
        info!(round = round.id, course = round.course_id, "round saved");
        self.catalog.record_created(round);
        self.load_rounds();
        self.dialog.succeed();
        self.close_trigger += 1;
        self.status_msg = "Round saved".into();
      }
      Err(e) => {
        self.dialog.fail(&e.to_string());
        self.write_failed("Failed to save round", &e);
      }
    }
  }

  fn round_deleted(&mut self, id: RoundId, result: Result<()>) {
    if self.session_expired(&result) {
      return;
    }
    match result {
      Ok(()) => {
        info!(round = id, "round deleted");
        self.overview.delete_succeeded();
        self.load_overview();
        self.load_rounds();
      }
      Err(e) => {
        self.overview.delete_failed();
        self.write_failed("Failed to delete round", &e);
      }
    }
  }

  /// A 401 from any call ends the session locally. Returns `true` if that
  /// happened and the result should not be applied.
  fn session_expired<T>(&mut self, result: &Result<T>) -> bool {
    match result {
      Err(e) if e.is_unauthorized() => {
        warn!("session expired");
        self.sign_out_local();
        self.status_msg = "Session expired, please log in again".into();
        true
      }
      _ => false,
    }
  }

  fn write_failed(&mut self, what: &str, error: &Error) {
    warn!("{what}: {error}");
    self.alert = Some(format!("{what}: {error}"));
  }

  // ── Session ───────────────────────────────────────────────────────────────

  fn enter_shell(&mut self) {
    self.screen = Screen::Map;
    self.status_msg.clear();
    self.mount_screen();
  }

  /// Forget the session and everything fetched under it.
  fn sign_out_local(&mut self) {
    self.epoch += 1;
    self.gate.sign_out();
    self.catalog.reset();
    self.map.reset();
    self.dialog.reset();
    self.overview.reset();
    self.social.reset();
    self.pending_focus = None;
    self.close_trigger = 0;
    self.screen = Screen::Map;
  }

  fn logout(&mut self) {
    self.spawn(|api| async move { Message::LoggedOut(api.logout().await) });
  }

  // ── Loading ───────────────────────────────────────────────────────────────

  pub fn switch_screen(&mut self, screen: Screen) {
    if self.screen != screen {
      self.screen = screen;
      self.mount_screen();
    }
  }

  /// Fetch what the current screen shows. The course list is cached for the
  /// session; everything else is fetched again on every visit.
  fn mount_screen(&mut self) {
    match self.screen {
      Screen::Map => {
        if !self.catalog.is_loaded() {
          self.load_courses();
        }
        self.load_rounds();
      }
      Screen::Overview => self.load_overview(),
      Screen::Social => self.load_friends(),
    }
  }

  fn load_courses(&mut self) {
    let ticket = self.catalog.begin_courses();
    self.spawn(move |api| async move { Message::CoursesLoaded(ticket, api.list_courses().await) });
  }

  fn load_rounds(&mut self) {
    let ticket = self.catalog.begin_rounds();
    self.spawn(move |api| async move { Message::RoundsLoaded(ticket, api.list_rounds().await) });
  }

  fn load_overview(&mut self) {
    let ticket = self.overview.begin_load();
    self.spawn(move |api| async move { Message::OverviewLoaded(ticket, api.overview().await) });
  }

  /// Leaderboard and incoming requests, always together.
  fn load_friends(&mut self) {
    let ticket = self.social.begin_friends();
    self.spawn(move |api| async move { Message::FriendsLoaded(ticket, api.friends().await) });
    let ticket = self.social.begin_requests();
    self.spawn(move |api| async move {
      Message::RequestsLoaded(ticket, api.friend_requests().await)
    });
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  fn today() -> NaiveDate { Local::now().date_naive() }

  fn submit_login(&mut self) {
    let Some(credentials) = self.gate.form_mut().and_then(|form| form.submit()) else {
      return;
    };
    self.spawn(move |api| async move { Message::LoggedIn(api.login(&credentials).await) });
  }

  /// Open the popup for the course under the cursor, or the log dialog if
  /// its popup is already open.
  fn activate_cursor_course(&mut self) {
    let Some(course) = self.map.cursor_course(&self.catalog).cloned() else {
      return;
    };
    if self.map.popup == Some(course.id) {
      self.dialog.open(course, Self::today());
    } else {
      self.map.open_popup(course.id);
    }
  }

  fn fly_to_cursor_course(&mut self) {
    let position = self
      .map
      .cursor_course(&self.catalog)
      .and_then(Course::position);
    if let Some((latitude, longitude)) = position {
      self.pending_focus = Some(FocusRequest {
        latitude,
        longitude,
        zoom: COURSE_ZOOM,
      });
    }
  }

  fn submit_round(&mut self) {
    let Some(round) = self.dialog.submit(Self::today()) else {
      return;
    };
    info!(course = round.course_id, "saving round");
    self.spawn(move |api| async move { Message::RoundCreated(api.create_round(&round).await) });
  }

  fn confirm_delete(&mut self) {
    let Some(id) = self.overview.confirm_delete() else {
      return;
    };
    self.spawn(move |api| async move { Message::RoundDeleted(id, api.delete_round(id).await) });
  }

  /// Jump from the region detail to the selected course on the map.
  fn show_course_on_map(&mut self) {
    let Some(focus) = self.overview.cursor_course_focus() else {
      return;
    };
    let id = self.overview.cursor_course().map(|c| c.id);
    self.pending_focus = Some(focus);
    self.switch_screen(Screen::Map);
    if let Some(id) = id {
      self.map.filter.clear();
      self.map.point_at(id, &self.catalog);
    }
  }

  fn search(&mut self) {
    let Some((ticket, query)) = self.social.begin_search() else {
      return;
    };
    self.spawn(move |api| async move {
      Message::SearchResults(ticket, api.search_users(&query).await)
    });
  }

  fn send_friend_request(&mut self) {
    let Some(user) = self.social.send_request() else {
      return;
    };
    self.spawn(move |api| async move {
      Message::FriendRequestSent(user, api.send_friend_request(user).await)
    });
  }

  fn answer_request(&mut self, response: Response) {
    let Some(friendship) = self.social.respond() else {
      return;
    };
    self.spawn(move |api| async move {
      let result = api.respond_to_request(friendship, response).await;
      Message::RequestAnswered(friendship, response, result)
    });
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
      return true;
    }

    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    if self.alert.take().is_some() {
      return true;
    }

    match self.gate.state {
      Gate::Checking => key.code != KeyCode::Char('q'),
      Gate::Anonymous(_) => self.handle_login_key(key),
      Gate::Authenticated(_) => self.handle_shell_key(key),
    }
  }

  fn handle_login_key(&mut self, key: KeyEvent) -> bool {
    if key.code == KeyCode::Esc {
      return false;
    }
    if key.code == KeyCode::Enter {
      self.submit_login();
      return true;
    }
    let Some(form) = self.gate.form_mut() else {
      return true;
    };
    match key.code {
      KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_focus(),
      KeyCode::Backspace => form.backspace(),
      KeyCode::Char(c) => form.input(c),
      _ => {}
    }
    true
  }

  fn handle_shell_key(&mut self, key: KeyEvent) -> bool {
    // Text entry modes swallow every key.
    if self.dialog.is_open() {
      self.handle_dialog_key(key);
      return true;
    }
    if self.screen == Screen::Map && self.map.filter_active {
      self.handle_filter_key(key);
      return true;
    }
    if self.screen == Screen::Social && self.social.editing {
      self.handle_query_key(key);
      return true;
    }
    if self.screen == Screen::Overview && self.overview.staged_delete().is_some() {
      self.handle_confirm_key(key);
      return true;
    }

    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Char('1') => self.switch_screen(Screen::Map),
      KeyCode::Char('2') => self.switch_screen(Screen::Overview),
      KeyCode::Char('3') => self.switch_screen(Screen::Social),
      KeyCode::Char('L') => self.logout(),
      _ => match self.screen {
        Screen::Map => self.handle_map_key(key),
        Screen::Overview => self.handle_overview_key(key),
        Screen::Social => self.handle_social_key(key),
      },
    }
    true
  }

  fn handle_dialog_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.dialog.cancel();
      }
      KeyCode::Enter => self.submit_round(),
      KeyCode::Tab | KeyCode::BackTab => self.dialog.toggle_focus(),
      KeyCode::Backspace => self.dialog.backspace(),
      KeyCode::Char(c) => self.dialog.input(c),
      _ => {}
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.map.filter_active = false;
        self.map.filter.clear();
        self.map.cursor = 0;
      }
      KeyCode::Enter => {
        self.map.filter_active = false;
        self.map.cursor = 0;
      }
      KeyCode::Backspace => {
        self.map.filter.pop();
        self.map.cursor = 0;
      }
      KeyCode::Char(c) => {
        self.map.filter.push(c);
        self.map.cursor = 0;
      }
      _ => {}
    }
  }

  fn handle_map_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => self.map.move_cursor(1, &self.catalog),
      KeyCode::Up | KeyCode::Char('k') => self.map.move_cursor(-1, &self.catalog),
      KeyCode::PageDown => self.map.move_cursor(10, &self.catalog),
      KeyCode::PageUp => self.map.move_cursor(-10, &self.catalog),
      KeyCode::Char('/') => self.map.filter_active = true,
      KeyCode::Enter => self.activate_cursor_course(),
      KeyCode::Esc => self.map.close_popup(),
      KeyCode::Char('f') => self.fly_to_cursor_course(),
      KeyCode::Char('+') | KeyCode::Char('=') => self.map.zoom_by(1.0),
      KeyCode::Char('-') => self.map.zoom_by(-1.0),
      _ => {}
    }
  }

  fn handle_confirm_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Enter => self.confirm_delete(),
      KeyCode::Char('n') | KeyCode::Esc => self.overview.cancel_delete(),
      _ => {}
    }
  }

  fn handle_overview_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Tab => self.overview.toggle_focus(),
      KeyCode::Down | KeyCode::Char('j') => self.overview.move_cursor(1),
      KeyCode::Up | KeyCode::Char('k') => self.overview.move_cursor(-1),
      KeyCode::Enter => {
        let in_region = matches!(self.overview.selection, RegionSelection::Region(_));
        match self.overview.focus {
          OverviewFocus::Regions if in_region => self.show_course_on_map(),
          OverviewFocus::Regions => self.overview.select_cursor_region(),
          OverviewFocus::Recent => {}
        }
      }
      KeyCode::Esc | KeyCode::Backspace => self.overview.select_all(),
      KeyCode::Char('d') if self.overview.focus == OverviewFocus::Recent => {
        self.overview.stage_cursor_round();
      }
      KeyCode::Char('r') => self.load_overview(),
      _ => {}
    }
  }

  fn handle_query_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => self.social.editing = false,
      KeyCode::Enter => self.search(),
      KeyCode::Backspace => {
        self.social.query.pop();
      }
      KeyCode::Char(c) => self.social.query.push(c),
      _ => {}
    }
  }

  fn handle_social_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Tab => self.social.toggle_tab(),
      KeyCode::Down | KeyCode::Char('j') => self.social.move_cursor(1),
      KeyCode::Up | KeyCode::Char('k') => self.social.move_cursor(-1),
      KeyCode::Char('r') => self.load_friends(),
      _ => match self.social.tab {
        SocialTab::Leaderboard => match key.code {
          KeyCode::Char('a') => self.answer_request(Response::Accept),
          KeyCode::Char('x') => self.answer_request(Response::Reject),
          _ => {}
        },
        SocialTab::Search => match key.code {
          KeyCode::Char('/') | KeyCode::Char('i') => self.social.editing = true,
          KeyCode::Enter => self.search(),
          KeyCode::Char('s') => self.send_friend_request(),
          _ => {}
        },
      },
    }
  }
}
