//! TUI rendering for all panes.

pub mod charts;
pub mod form;
pub mod listing;
pub mod overview;

use chrono::Local;
use grocer_core::store::GroceryStore;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Mode};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: GroceryStore>(f: &mut Frame, app: &App<S>) {
  let area = f.area();
  let report = app.report();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);

  let body = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(9),  // form + overview
      Constraint::Min(5),     // listing
      Constraint::Length(14), // charts
    ])
    .split(rows[1]);

  let top = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(body[0]);

  form::draw(f, top[0], app);
  overview::draw(f, top[1], &report);
  listing::draw(f, body[1], &report, app.table_scroll);
  charts::draw(f, body[2], &report);

  draw_status(f, rows[2], app);
}

/// Label for a store name; the empty name is its own bucket.
pub fn store_label(store: &str) -> &str { if store.is_empty() { "(no store)" } else { store } }

/// Parse a `#rrggbb` palette entry.
pub fn hex_color(hex: &str) -> Color { hex.parse().unwrap_or(Color::Gray) }

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " grocer  Grocery Expense Tracker",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = match app.mode {
    Mode::Normal => (
      "NORMAL",
      "a add item  ←→/hl month  ↑↓/jk scroll  q quit",
    ),
    Mode::Editing => (
      "EDIT",
      "Type to fill  Tab/Shift-Tab field  Enter add item  Esc done",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::Gray));

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
