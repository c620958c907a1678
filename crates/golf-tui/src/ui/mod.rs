//! TUI rendering for every screen and overlay.

pub mod dialog;
pub mod login;
pub mod map;
pub mod overview;
pub mod social;

use golf_core::api::GolfApi;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use crate::{
  app::{App, Screen},
  views::session::Gate,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<A: GolfApi + 'static>(f: &mut Frame, app: &App<A>) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match &app.gate.state {
    Gate::Checking => {
      f.render_widget(
        Paragraph::new("Checking session…").style(Style::default().fg(Color::DarkGray)),
        centered(rows[1], 20, 1),
      );
    }
    Gate::Anonymous(form) => login::draw(f, rows[1], form),
    Gate::Authenticated(_) => {
      match app.screen {
        Screen::Map => map::draw(f, rows[1], &app.map, &app.catalog),
        Screen::Overview => overview::draw(f, rows[1], &app.overview),
        Screen::Social => social::draw(f, rows[1], &app.social),
      }
      if app.dialog.is_open() {
        dialog::draw(f, rows[1], &app.dialog);
      }
    }
  }
  draw_status(f, rows[2], app);

  if let Some(alert) = &app.alert {
    draw_alert(f, area, alert);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<A: GolfApi + 'static>(f: &mut Frame, area: Rect, app: &App<A>) {
  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(profile) = app.gate.profile() else {
    f.render_widget(
      Paragraph::new(Span::styled(
        " norskgolf",
        Style::default()
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )),
      inner,
    );
    return;
  };

  let selected = match app.screen {
    Screen::Map => 0,
    Screen::Overview => 1,
    Screen::Social => 2,
  };
  let right = format!("{} ", profile.display_name());
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Min(0),
      Constraint::Length(right.chars().count() as u16),
    ])
    .split(inner);

  let tabs = Tabs::new(vec![" [1] Map", "[2] Overview", "[3] Friends"])
    .select(selected)
    .style(Style::default().fg(Color::Gray))
    .highlight_style(
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    );
  f.render_widget(tabs, cols[0]);
  f.render_widget(
    Paragraph::new(Span::styled(
      right,
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    )),
    cols[1],
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<A: GolfApi + 'static>(f: &mut Frame, area: Rect, app: &App<A>) {
  let (mode_label, hints) = match (&app.gate.state, app.screen) {
    (Gate::Checking, _) => ("WAIT", "q quit"),
    (Gate::Anonymous(_), _) => ("LOGIN", "Tab switch field  Enter log in  Esc quit"),
    _ if app.dialog.is_open() => ("ROUND", "Tab switch field  Enter save  Esc cancel"),
    (_, Screen::Map) if app.map.filter_active => {
      ("SEARCH", "Type to filter  Esc clear  Enter done")
    }
    (_, Screen::Map) => (
      "MAP",
      "jk navigate  / filter  Enter popup/log  f fly  +- zoom  L logout  q quit",
    ),
    (_, Screen::Overview) if app.overview.staged_delete().is_some() => {
      ("DELETE", "y confirm  n cancel")
    }
    (_, Screen::Overview) => (
      "STATS",
      "jk navigate  Tab switch list  Enter open  Esc all regions  d delete  r reload",
    ),
    (_, Screen::Social) if app.social.editing => ("SEARCH", "Type a query  Enter search  Esc done"),
    (_, Screen::Social) => (
      "FRIENDS",
      "Tab switch tab  a accept  x reject  / search  s send request  r reload",
    ),
  };

  let mut status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };
  if app.is_busy() {
    status.push_str("  …");
  }

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span])).style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Overlays ─────────────────────────────────────────────────────────────────

fn draw_alert(f: &mut Frame, area: Rect, message: &str) {
  let rect = centered(area, 60, 5);
  let block = Block::default()
    .title(" Error ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let inner = block.inner(rect);
  f.render_widget(Clear, rect);
  f.render_widget(block, rect);
  f.render_widget(
    Paragraph::new(vec![
      Line::from(message.to_string()),
      Line::from(Span::styled(
        "Press any key to continue",
        Style::default().fg(Color::DarkGray),
      )),
    ])
    .wrap(Wrap { trim: true }),
    inner,
  );
}

/// A `width` × `height` rectangle centred in `area`, clipped to it.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

/// Colour for a round score: red under 72, green under 80.
pub(crate) fn score_style(score: i32) -> Style {
  match score {
    s if s < 72 => Style::default().fg(Color::Red),
    s if s < 80 => Style::default().fg(Color::Green),
    _ => Style::default(),
  }
}

pub(crate) fn cursor_style() -> Style {
  Style::default()
    .bg(Color::Blue)
    .fg(Color::White)
    .add_modifier(Modifier::BOLD)
}

pub(crate) fn pane(title: impl Into<String>) -> Block<'static> {
  Block::default()
    .title(format!(" {} ", title.into()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}
