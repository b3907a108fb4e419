//! Per-store charts: a pie of spend share and a bar per store.

use std::f64::consts::TAU;

use grocer_core::{
  amount::format_money,
  report::{BAR_FILL, MonthlyReport, StoreSlice},
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Style},
  symbols::Marker,
  text::{Line, Span},
  widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Paragraph,
    canvas::{Canvas, Points},
  },
};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use super::{hex_color, store_label};

/// Grid spacing, in unit-circle coordinates, of the points that fill the pie.
const PIE_STEP: f64 = 0.02;

/// Height given to the tallest bar.
const BAR_SCALE: u64 = 1000;

pub fn draw(f: &mut Frame, area: Rect, report: &MonthlyReport) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(area);

  draw_pie(f, cols[0], &report.slices);
  draw_bars(f, cols[1], &report.slices);
}

fn panel(title: &str) -> Block<'static> {
  Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

fn draw_empty(f: &mut Frame, inner: Rect) {
  f.render_widget(
    Paragraph::new("No purchases this month.").style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

// ─── Pie ──────────────────────────────────────────────────────────────────────

fn draw_pie(f: &mut Frame, area: Rect, slices: &[StoreSlice]) {
  let block = panel("Expenses by Store");
  let inner = block.inner(area);
  f.render_widget(block, area);

  let shares = pie_shares(slices);
  if shares.is_empty() {
    draw_empty(f, inner);
    return;
  }

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Min(10), Constraint::Length(28)])
    .split(inner);

  let points = pie_points(&shares);
  let (x_bounds, y_bounds) = circle_bounds(cols[0]);
  let canvas = Canvas::default()
    .marker(Marker::Braille)
    .x_bounds(x_bounds)
    .y_bounds(y_bounds)
    .paint(|ctx| {
      for (slice, coords) in slices.iter().zip(&points) {
        ctx.draw(&Points {
          coords: coords.as_slice(),
          color: hex_color(slice.color),
        });
      }
    });
  f.render_widget(canvas, cols[0]);

  let legend: Vec<Line> = slices
    .iter()
    .zip(&shares)
    .map(|(slice, share)| {
      Line::from(vec![
        Span::styled("■ ", Style::default().fg(hex_color(slice.color))),
        Span::raw(format!(
          "{} {} ({:.0}%)",
          store_label(&slice.store),
          format_money(slice.total),
          share * 100.0
        )),
      ])
    })
    .collect();
  f.render_widget(Paragraph::new(legend), cols[1]);
}

/// Each slice's fraction of the positive spend; empty when nothing is
/// positive. Negative subtotals get no area.
fn pie_shares(slices: &[StoreSlice]) -> Vec<f64> {
  let values: Vec<f64> = slices
    .iter()
    .map(|s| s.total.to_f64().unwrap_or(0.0).max(0.0))
    .collect();
  let sum: f64 = values.iter().sum();
  if sum <= 0.0 {
    return Vec::new();
  }
  values.into_iter().map(|v| v / sum).collect()
}

/// Points of the unit disc, bucketed by the slice whose angular range
/// contains them. Slices start at 3 o'clock and run counter-clockwise.
fn pie_points(shares: &[f64]) -> Vec<Vec<(f64, f64)>> {
  let mut buckets = vec![Vec::new(); shares.len()];
  let steps = (2.0 / PIE_STEP) as i32;
  for i in 0..=steps {
    for j in 0..=steps {
      let x = -1.0 + f64::from(i) * PIE_STEP;
      let y = -1.0 + f64::from(j) * PIE_STEP;
      if x * x + y * y > 1.0 {
        continue;
      }
      let turn = y.atan2(x).rem_euclid(TAU) / TAU;
      let mut start = 0.0;
      for (k, share) in shares.iter().enumerate() {
        if turn < start + share || k + 1 == shares.len() {
          buckets[k].push((x, y));
          break;
        }
        start += share;
      }
    }
  }
  buckets
}

/// Canvas bounds that keep the disc round. Terminal cells are about twice
/// as tall as they are wide.
fn circle_bounds(area: Rect) -> ([f64; 2], [f64; 2]) {
  let ratio = f64::from(area.width.max(1)) / (2.0 * f64::from(area.height.max(1)));
  if ratio >= 1.0 {
    ([-ratio, ratio], [-1.0, 1.0])
  } else {
    ([-1.0, 1.0], [-1.0 / ratio, 1.0 / ratio])
  }
}

// ─── Bars ─────────────────────────────────────────────────────────────────────

fn draw_bars(f: &mut Frame, area: Rect, slices: &[StoreSlice]) {
  let block = panel("Monthly Expenses");
  let inner = block.inner(area);

  if slices.is_empty() {
    f.render_widget(block, area);
    draw_empty(f, inner);
    return;
  }

  let fill = hex_color(BAR_FILL);
  let bars: Vec<Bar> = slices
    .iter()
    .zip(bar_heights(slices))
    .map(|(s, height)| {
      Bar::default()
        .value(height)
        .label(Line::from(store_label(&s.store).to_owned()))
        .text_value(format_money(s.total))
    })
    .collect();

  let count = u16::try_from(slices.len()).unwrap_or(u16::MAX);
  let bar_width = (inner.width / count).saturating_sub(2).clamp(3, 12);

  let chart = BarChart::default()
    .block(block)
    .data(BarGroup::default().bars(&bars))
    .max(BAR_SCALE)
    .bar_width(bar_width)
    .bar_gap(2)
    .bar_style(Style::default().fg(fill))
    .value_style(Style::default().fg(Color::Black).bg(fill));
  f.render_widget(chart, area);
}

/// Bar heights relative to the largest subtotal, which gets [`BAR_SCALE`].
/// Negative subtotals draw as empty bars.
fn bar_heights(slices: &[StoreSlice]) -> Vec<u64> {
  let largest = slices
    .iter()
    .map(|s| s.total)
    .max()
    .unwrap_or(Decimal::ZERO);
  slices
    .iter()
    .map(|s| {
      if largest <= Decimal::ZERO || s.total <= Decimal::ZERO {
        return 0;
      }
      s.total
        .checked_div(largest)
        .and_then(|ratio| ratio.checked_mul(Decimal::from(BAR_SCALE)))
        .map(|h| h.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|h| h.to_u64())
        .unwrap_or(0)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn slice(store: &str, total: i64) -> StoreSlice {
    StoreSlice {
      store: store.into(),
      total: Decimal::from(total),
      color: "#0088FE",
    }
  }

  #[test]
  fn shares_ignore_negative_totals() {
    let shares = pie_shares(&[slice("a", 3), slice("b", 1), slice("c", -4)]);
    assert_eq!(shares, vec![0.75, 0.25, 0.0]);
    assert!(pie_shares(&[slice("a", 0)]).is_empty());
  }

  #[test]
  fn pie_points_split_by_share() {
    let points = pie_points(&[0.5, 0.5]);
    let (upper, lower) = (&points[0], &points[1]);
    assert!(upper.iter().all(|(_, y)| *y >= 0.0));
    assert!(lower.iter().all(|(_, y)| *y <= 0.0));
    let diff = upper.len().abs_diff(lower.len());
    assert!(diff * 20 < upper.len(), "{} vs {}", upper.len(), lower.len());
  }

  #[test]
  fn bounds_keep_the_disc_round() {
    let (x, y) = circle_bounds(Rect::new(0, 0, 40, 10));
    assert_eq!(x, [-2.0, 2.0]);
    assert_eq!(y, [-1.0, 1.0]);
  }

  #[test]
  fn bar_heights_scale_to_the_largest() {
    let heights = bar_heights(&[slice("a", 7), slice("b", 2), slice("c", -1)]);
    assert_eq!(heights, vec![1000, 286, 0]);
    assert_eq!(bar_heights(&[slice("a", 0), slice("b", -3)]), vec![0, 0]);
  }

  #[test]
  fn bar_heights_survive_the_largest_decimal() {
    let huge = StoreSlice {
      store: "Deli".into(),
      total: Decimal::MAX,
      color: "#0088FE",
    };
    assert_eq!(bar_heights(&[huge, slice("b", 1)]), vec![1000, 0]);
  }
}
