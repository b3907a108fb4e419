//! Grocery list: the month's purchases as a table.

use grocer_core::{amount::format_money, report::MonthlyReport};
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Cell, Row, Table},
};
use rust_decimal::Decimal;

const HEADERS: [&str; 8] = [
  "S.No", "Item", "Price", "Discount", "Store", "Weight", "Quantity", "Total",
];

/// Render the listing into `area`, starting at row `scroll`.
pub fn draw(f: &mut Frame, area: Rect, report: &MonthlyReport, scroll: usize) {
  let block = Block::default()
    .title(format!(" Grocery List ({}) ", report.rows.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let header = Row::new(HEADERS.map(Cell::from)).style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  let rows: Vec<Row> = report
    .rows
    .iter()
    .skip(scroll)
    .map(|r| {
      Row::new([
        Cell::from(r.index.to_string()),
        Cell::from(r.name.clone()),
        Cell::from(money(r.price)),
        Cell::from(money(r.discount)),
        Cell::from(r.store.clone()),
        Cell::from(r.weight.clone()),
        Cell::from(r.quantity.clone()),
        Cell::from(money(r.total)),
      ])
    })
    .collect();

  let widths = [
    Constraint::Length(5),
    Constraint::Min(12),
    Constraint::Length(10),
    Constraint::Length(10),
    Constraint::Min(10),
    Constraint::Length(10),
    Constraint::Length(9),
    Constraint::Length(11),
  ];

  f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

fn money(amount: Option<Decimal>) -> String { amount.map(format_money).unwrap_or_else(|| "-".into()) }
