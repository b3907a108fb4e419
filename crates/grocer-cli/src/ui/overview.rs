//! Monthly overview: top-right panel with navigation hints and totals.

use grocer_core::{amount::format_money, report::MonthlyReport};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

pub fn draw(f: &mut Frame, area: Rect, report: &MonthlyReport) {
  let block = Block::default()
    .title(format!(" {} ", report.title()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let button = Style::default().fg(Color::White).bg(Color::Blue);
  let total = Style::default().add_modifier(Modifier::BOLD);

  let mut lines = vec![
    Line::from(vec![
      Span::styled(" ← Previous Month ", button),
      Span::raw("   "),
      Span::styled(" Next Month → ", button),
    ]),
    Line::from(""),
    Line::from(Span::styled(
      format!("Total Expense: {}", format_money(report.total_expense)),
      total,
    )),
    Line::from(Span::styled(
      format!("Total Savings: {}", format_money(report.total_savings)),
      total,
    )),
  ];

  if let Some(first) = report.issues.first() {
    let warn = Style::default().fg(Color::Yellow);
    lines.push(Line::from(Span::styled(
      format!("{} unusable amount(s) left out of the totals", report.issues.len()),
      warn,
    )));
    lines.push(Line::from(Span::styled(first.to_string(), warn)));
  }

  f.render_widget(Paragraph::new(lines).block(block), area);
}
