//! Add-item form, the top-left panel.

use grocer_core::record::Field;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Mode};

/// Render the form into `area`.
pub fn draw<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let editing = app.mode == Mode::Editing;

  let block = Block::default()
    .title(" Add New Item ")
    .borders(Borders::ALL)
    .border_style(if editing {
      Style::default().fg(Color::Cyan)
    } else {
      Style::default().fg(Color::DarkGray)
    });

  let mut lines: Vec<Line> = Field::ALL
    .into_iter()
    .map(|field| {
      let focused = editing && field == app.focus;
      let value = app.draft.field(field);

      let marker = if focused { "› " } else { "  " };
      let label = Span::styled(
        format!("{marker}{:<10}", field.as_str()),
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      );

      let mut spans = vec![label];
      if value.is_empty() && !focused {
        spans.push(Span::styled(
          field.placeholder(),
          Style::default().fg(Color::DarkGray),
        ));
      } else {
        spans.push(Span::raw(value.to_owned()));
      }
      if focused {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
      }
      Line::from(spans)
    })
    .collect();

  lines.push(Line::from(Span::styled(
    " Add Item ",
    Style::default()
      .fg(Color::White)
      .bg(Color::Blue)
      .add_modifier(Modifier::BOLD),
  )));

  f.render_widget(Paragraph::new(lines).block(block), area);
}
