//! Round logging overlay.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{centered, login::field_line};
use crate::views::log_round::{DialogField, LogRoundDialog};

pub fn draw(f: &mut Frame, area: Rect, dialog: &LogRoundDialog) {
  let Some(course) = dialog.course() else {
    return;
  };

  let rect = centered(area, 54, 10);
  let block = Block::default()
    .title(format!(" Log round: {} ", course.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(rect);
  f.render_widget(Clear, rect);
  f.render_widget(block, rect);

  let editable = !dialog.is_submitting();
  let mut lines = vec![
    field_line("Date", &dialog.date, editable && dialog.focus == DialogField::Date),
    field_line("Score", &dialog.score, editable && dialog.focus == DialogField::Score),
    Line::from(""),
  ];

  if dialog.is_submitting() {
    lines.push(Line::from(Span::styled(
      "Saving…",
      Style::default().fg(Color::DarkGray),
    )));
  } else {
    if let Some(error) = &dialog.error {
      lines.push(Line::from(Span::styled(
        error.clone(),
        Style::default().fg(Color::Red),
      )));
    }
    lines.push(Line::from(Span::styled(
      "[Enter] save  [Esc] cancel",
      Style::default().fg(Color::DarkGray),
    )));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
