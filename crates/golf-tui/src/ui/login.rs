//! Login form.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered;
use crate::views::session::{LoginField, LoginForm};

pub fn draw(f: &mut Frame, area: Rect, form: &LoginForm) {
  let rect = centered(area, 44, 9);
  let block = Block::default()
    .title(" Log in ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(rect);
  f.render_widget(Clear, rect);
  f.render_widget(block, rect);

  let masked = "•".repeat(form.password.chars().count());
  let mut lines = vec![
    field_line("Username", &form.username, form.focus == LoginField::Username),
    field_line("Password", &masked, form.focus == LoginField::Password),
    Line::from(""),
  ];

  if form.submitting {
    lines.push(Line::from(Span::styled(
      "Logging in…",
      Style::default().fg(Color::DarkGray),
    )));
  } else if let Some(error) = &form.error {
    lines.push(Line::from(Span::styled(
      error.clone(),
      Style::default().fg(Color::Red),
    )));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

/// `label: value` with a trailing cursor on the focused field.
pub(crate) fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
  let label_style = if focused {
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  let cursor = if focused { "_" } else { "" };
  Line::from(vec![
    Span::styled(format!("{label:<10}"), label_style),
    Span::raw(format!("{value}{cursor}")),
  ])
}
