//! Friends screen: requests + leaderboard, and user search.

use golf_core::friend::{FriendStatus, Golfer};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph, Tabs},
};

use super::{cursor_style, pane};
use crate::views::social::{Listing, SocialTab, SocialView, rank_label};

pub fn draw(f: &mut Frame, area: Rect, view: &SocialView) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),
      Constraint::Min(0),
      Constraint::Length(1),
    ])
    .split(area);

  let selected = match view.tab {
    SocialTab::Leaderboard => 0,
    SocialTab::Search => 1,
  };
  f.render_widget(
    Tabs::new(vec!["Leaderboard", "Find golfers"])
      .select(selected)
      .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    rows[0],
  );

  match view.tab {
    SocialTab::Leaderboard => draw_leaderboard(f, rows[1], view),
    SocialTab::Search => draw_search(f, rows[1], view),
  }

  if let Some(error) = &view.error {
    f.render_widget(
      Paragraph::new(error.clone()).style(Style::default().fg(Color::Red)),
      rows[2],
    );
  }
}

/// Placeholder for a list that has nothing to show yet, if any.
fn placeholder(listing: &Listing, empty: &'static str) -> Option<ListItem<'static>> {
  let (text, color) = match &listing.error {
    Some(error) => (format!("Error: {error}"), Color::Red),
    None if listing.is_loading() && listing.rows.is_empty() => ("Loading…".into(), Color::DarkGray),
    None if listing.rows.is_empty() => (empty.into(), Color::DarkGray),
    None => return None,
  };
  Some(ListItem::new(Span::styled(text, Style::default().fg(color))))
}

// ─── Leaderboard ──────────────────────────────────────────────────────────────

fn draw_leaderboard(f: &mut Frame, area: Rect, view: &SocialView) {
  let request_rows = view.requests.rows.len().max(1) as u16 + 2;
  let cols = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(request_rows), Constraint::Min(0)])
    .split(area);

  // Incoming requests.
  let items: Vec<ListItem> = placeholder(&view.requests, "No pending requests")
    .map(|p| vec![p])
    .unwrap_or_else(|| {
      view
        .requests
        .rows
        .iter()
        .map(|row| {
          let busy = row
            .friendship_id
            .is_some_and(|id| view.is_answering(id));
          let hint = if busy { "  …" } else { "  [a] accept  [x] reject" };
          ListItem::new(Line::from(vec![
            Span::raw(row.display_name.clone()),
            Span::styled(hint, Style::default().fg(Color::DarkGray)),
          ]))
        })
        .collect()
    });
  let mut state = ListState::default();
  if !view.requests.rows.is_empty() {
    state.select(Some(view.request_cursor));
  }
  f.render_stateful_widget(
    List::new(items)
      .block(pane("Friend requests"))
      .highlight_style(cursor_style()),
    cols[0],
    &mut state,
  );

  // Leaderboard.
  let items: Vec<ListItem> = placeholder(&view.friends, "No friends yet")
    .map(|p| vec![p])
    .unwrap_or_else(|| {
      view
        .friends
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| leaderboard_row(i, row))
        .collect()
    });
  f.render_widget(List::new(items).block(pane("Leaderboard")), cols[1]);
}

fn leaderboard_row(index: usize, row: &Golfer) -> ListItem<'static> {
  let me = row.status == FriendStatus::Me;
  let name_style = if me {
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default()
  };
  let name = if me {
    format!("{} (you)", row.display_name)
  } else {
    row.display_name.clone()
  };
  ListItem::new(Line::from(vec![
    Span::styled(format!("{:>4} ", rank_label(index)), Style::default().fg(Color::Yellow)),
    Span::styled(format!("{name:<28}"), name_style),
    Span::raw(format!(
      "{:>4} courses {:>5} rounds",
      row.total_courses, row.total_rounds
    )),
  ]))
}

// ─── Search ───────────────────────────────────────────────────────────────────

fn status_label(row: &Golfer, sending: bool) -> (&'static str, Color) {
  if sending {
    return ("sending…", Color::DarkGray);
  }
  match row.status {
    FriendStatus::None => ("[s] add friend", Color::Cyan),
    FriendStatus::Sent => ("request sent", Color::DarkGray),
    FriendStatus::Received => ("wants to be friends (see requests)", Color::Yellow),
    FriendStatus::Friends => ("friends", Color::Green),
    FriendStatus::Me => ("you", Color::DarkGray),
  }
}

fn draw_search(f: &mut Frame, area: Rect, view: &SocialView) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(0)])
    .split(area);

  let cursor = if view.editing { "_" } else { "" };
  let query_style = if view.editing {
    Style::default().fg(Color::Yellow)
  } else {
    Style::default()
  };
  f.render_widget(
    Paragraph::new(format!("{}{cursor}", view.query))
      .style(query_style)
      .block(pane("Search by name, username or email")),
    rows[0],
  );

  let items: Vec<ListItem> = placeholder(&view.results, "No results")
    .map(|p| vec![p])
    .unwrap_or_else(|| {
      view
        .results
        .rows
        .iter()
        .map(|row| {
          let (label, color) = status_label(row, view.is_sending(row.id));
          ListItem::new(Line::from(vec![
            Span::raw(format!("{:<28}", row.display_name)),
            Span::styled(label, Style::default().fg(color)),
          ]))
        })
        .collect()
    });
  let mut state = ListState::default();
  if !view.results.rows.is_empty() {
    state.select(Some(view.result_cursor));
  }
  f.render_stateful_widget(
    List::new(items)
      .block(pane("Golfers"))
      .highlight_style(cursor_style()),
    rows[1],
    &mut state,
  );
}
