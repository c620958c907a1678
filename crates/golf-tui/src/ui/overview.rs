//! Overview screen: totals, regions, recent rounds.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph},
};

use super::{cursor_style, pane, score_style};
use crate::views::overview::{OverviewFocus, OverviewView, RegionDetail};

const BAR_WIDTH: usize = 12;

fn bar(percent: f64) -> String {
  let filled = ((percent / 100.0) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
  format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn draw(f: &mut Frame, area: Rect, view: &OverviewView) {
  let Some(snapshot) = view.snapshot() else {
    let (text, style) = match &view.error {
      Some(error) => (format!("Error: {error}"), Style::default().fg(Color::Red)),
      None => ("Loading overview…".to_string(), Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(Paragraph::new(text).style(style).block(pane("Overview")), area);
    return;
  };

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(0)])
    .split(area);

  // Header: who, and how far along.
  let name = snapshot.display_name.as_deref().unwrap_or("You");
  let mut header = vec![
    Span::styled(
      format!("{name} "),
      Style::default().add_modifier(Modifier::BOLD),
    ),
    Span::styled(
      snapshot.email.clone().unwrap_or_default(),
      Style::default().fg(Color::DarkGray),
    ),
    Span::raw(format!(
      "   {} / {} courses  {} {:.1}%",
      snapshot.total_played,
      snapshot.total_courses,
      bar(snapshot.percentage_complete),
      snapshot.percentage_complete
    )),
  ];
  if view.is_loading() {
    header.push(Span::styled("   refreshing…", Style::default().fg(Color::DarkGray)));
  } else if let Some(error) = &view.error {
    header.push(Span::styled(
      format!("   (refresh failed: {error})"),
      Style::default().fg(Color::Red),
    ));
  }
  f.render_widget(Paragraph::new(Line::from(header)).block(pane("Overview")), rows[0]);

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
    .split(rows[1]);

  match view.region_detail() {
    Some(detail) => draw_region_detail(f, cols[0], view, &detail),
    None => draw_regions(f, cols[0], view),
  }
  draw_recent(f, cols[1], view);
}

fn draw_regions(f: &mut Frame, area: Rect, view: &OverviewView) {
  let regions = view.regions();
  let items: Vec<ListItem> = regions
    .iter()
    .map(|(name, stat)| {
      ListItem::new(Line::from(vec![
        Span::raw(format!("{name:<20}")),
        Span::styled(bar(stat.percent()), Style::default().fg(Color::Green)),
        Span::raw(format!(" {:>3}/{:<3}", stat.played_count, stat.total_count)),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  if view.focus == OverviewFocus::Regions && !regions.is_empty() {
    state.select(Some(view.region_cursor));
  }
  f.render_stateful_widget(
    List::new(items)
      .block(pane("Regions"))
      .highlight_style(cursor_style()),
    area,
    &mut state,
  );
}

fn draw_region_detail(f: &mut Frame, area: Rect, view: &OverviewView, detail: &RegionDetail<'_>) {
  let items: Vec<ListItem> = detail
    .courses()
    .map(|course| {
      let (mark, color) = if course.played {
        ("✓ ", Color::Green)
      } else {
        ("· ", Color::DarkGray)
      };
      ListItem::new(Line::from(vec![
        Span::styled(mark, Style::default().fg(color)),
        Span::raw(course.name.clone()),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  if view.focus == OverviewFocus::Regions && !items.is_empty() {
    state.select(Some(view.course_cursor));
  }
  let title = format!(
    "{} · {}/{} played · Esc for all regions",
    detail.name,
    detail.played.len(),
    detail.played.len() + detail.missing.len()
  );
  f.render_stateful_widget(
    List::new(items)
      .block(pane(title))
      .highlight_style(cursor_style()),
    area,
    &mut state,
  );
}

fn draw_recent(f: &mut Frame, area: Rect, view: &OverviewView) {
  let Some(snapshot) = view.snapshot() else {
    return;
  };

  let mut items: Vec<ListItem> = snapshot
    .recent_rounds
    .iter()
    .map(|round| {
      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{} ", round.date.format("%Y-%m-%d")),
          Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("{:<22}", round.course_name)),
        Span::styled(format!("{:>4}", round.score), score_style(round.score)),
      ]))
    })
    .collect();
  if items.is_empty() {
    items.push(ListItem::new(Span::styled(
      "No rounds yet",
      Style::default().fg(Color::DarkGray),
    )));
  }

  let title = match view.staged_delete() {
    Some(_) if view.is_deleting() => "Recent rounds · deleting…".to_string(),
    Some(id) => format!("Recent rounds · delete round {id}? [y/n]"),
    None => "Recent rounds".to_string(),
  };

  let mut state = ListState::default();
  if view.focus == OverviewFocus::Recent && !snapshot.recent_rounds.is_empty() {
    state.select(Some(view.round_cursor));
  }
  f.render_stateful_widget(
    List::new(items)
      .block(pane(title))
      .highlight_style(cursor_style()),
    area,
    &mut state,
  );
}
