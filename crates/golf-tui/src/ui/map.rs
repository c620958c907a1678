//! Map screen: course list on the left, canvas map on the right.

use golf_core::{course::Course, played::MarkerVariant};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Style},
  symbols::Marker,
  text::{Line, Span},
  widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph,
    canvas::{Canvas, Map, MapResolution, Points},
  },
};

use super::{cursor_style, pane};
use crate::views::{catalog::CourseCatalog, map::MapSurface};

const PLAYED: Color = Color::Green;
const UNPLAYED: Color = Color::Red;

fn marker_color(variant: MarkerVariant) -> Color {
  match variant {
    MarkerVariant::Played => PLAYED,
    MarkerVariant::Unplayed => UNPLAYED,
  }
}

pub fn draw(f: &mut Frame, area: Rect, map: &MapSurface, catalog: &CourseCatalog) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
    .split(area);

  let visible = map.visible_courses(catalog);
  draw_list(f, cols[0], map, catalog, &visible);
  draw_canvas(f, cols[1], map, catalog);
}

// ─── Course list ──────────────────────────────────────────────────────────────

fn draw_list(
  f: &mut Frame,
  area: Rect,
  map: &MapSurface,
  catalog: &CourseCatalog,
  visible: &[&Course],
) {
  let total = catalog.courses().len();
  let title = if map.filter_active || !map.filter.is_empty() {
    format!("Courses ({}/{})", visible.len(), total)
  } else {
    format!("Courses ({}, {} played)", total, catalog.played().len())
  };
  let block = pane(title);
  let mut inner = block.inner(area);
  f.render_widget(block, area);

  if let Some(error) = &catalog.courses_error {
    f.render_widget(
      Paragraph::new(format!("Error: {error}")).style(Style::default().fg(Color::Red)),
      inner,
    );
    return;
  }
  if !catalog.is_loaded() {
    f.render_widget(
      Paragraph::new("Loading courses…").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  if (map.filter_active || !map.filter.is_empty()) && inner.height > 2 {
    let filter_area = Rect {
      y: inner.y + inner.height - 1,
      height: 1,
      ..inner
    };
    inner.height -= 1;
    let cursor = if map.filter_active { "_" } else { "" };
    f.render_widget(
      Paragraph::new(format!("/{}{cursor}", map.filter)).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  let items: Vec<ListItem> = visible
    .iter()
    .map(|course| {
      let color = marker_color(catalog.variant(course.id));
      ListItem::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::raw(course.name.clone()),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((!visible.is_empty()).then_some(map.cursor));
  f.render_stateful_widget(List::new(items).highlight_style(cursor_style()), inner, &mut state);
}

// ─── Canvas ───────────────────────────────────────────────────────────────────

fn draw_canvas(f: &mut Frame, area: Rect, map: &MapSurface, catalog: &CourseCatalog) {
  let mut played = Vec::new();
  let mut unplayed = Vec::new();
  for course in catalog.courses() {
    let Some((lat, lon)) = course.position() else {
      continue;
    };
    match catalog.variant(course.id) {
      MarkerVariant::Played => played.push((lon, lat)),
      MarkerVariant::Unplayed => unplayed.push((lon, lat)),
    }
  }
  let highlighted = map
    .cursor_course(catalog)
    .and_then(|c| Some((c.position()?, c.name.clone())));

  let (x_bounds, y_bounds) = map.viewport.bounds();
  let mut title = format!(
    "Map {:.3}N {:.3}E z{:.0}",
    map.viewport.latitude, map.viewport.longitude, map.viewport.zoom
  );
  if map.is_flying() {
    title.push_str(" ✈");
  }
  if catalog.is_loading() {
    title.push_str(" · syncing…");
  }
  if let Some(error) = &catalog.rounds_error {
    title.push_str(&format!(" · rounds unavailable: {error}"));
  }

  let canvas = Canvas::default()
    .block(pane(title))
    .marker(Marker::Braille)
    .x_bounds(x_bounds)
    .y_bounds(y_bounds)
    .paint(|ctx| {
      ctx.draw(&Map {
        resolution: MapResolution::High,
        color:      Color::DarkGray,
      });
      ctx.layer();
      ctx.draw(&Points {
        coords: &unplayed,
        color:  UNPLAYED,
      });
      ctx.draw(&Points {
        coords: &played,
        color:  PLAYED,
      });
      if let Some(((lat, lon), name)) = &highlighted {
        ctx.print(
          *lon,
          *lat,
          Span::styled(format!("◉ {name}"), Style::default().fg(Color::Yellow)),
        );
      }
    });
  f.render_widget(canvas, area);

  if let Some(course) = map.popup.and_then(|id| catalog.course(id)) {
    draw_popup(f, area, catalog, course);
  }
}

fn draw_popup(f: &mut Frame, area: Rect, catalog: &CourseCatalog, course: &Course) {
  let height = 6.min(area.height);
  let width = 44.min(area.width);
  let rect = Rect {
    x: area.x + area.width.saturating_sub(width + 1),
    y: area.y + area.height.saturating_sub(height + 1),
    width,
    height,
  };

  let status = match catalog.activity(course.id) {
    Some(activity) => Line::from(Span::styled(
      format!(
        "Played · {} round{} · best {}",
        activity.rounds,
        if activity.rounds == 1 { "" } else { "s" },
        activity.best_score
      ),
      Style::default().fg(PLAYED),
    )),
    None => Line::from(Span::styled("Not played yet", Style::default().fg(UNPLAYED))),
  };

  let block = Block::default()
    .title(format!(" {} ", course.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(rect);
  f.render_widget(Clear, rect);
  f.render_widget(block, rect);
  f.render_widget(
    Paragraph::new(vec![
      status,
      Line::from(""),
      Line::from(Span::styled(
        "[Enter] log round  [Esc] close",
        Style::default().fg(Color::DarkGray),
      )),
    ]),
    inner,
  );
}
