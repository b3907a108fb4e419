//! The monthly render model: filter, then aggregate, then lay out.
//!
//! [`MonthlyReport`] is rebuilt from scratch for every frame. Unlike the
//! strict reductions in [`crate::aggregate`], building a report never fails:
//! records with unusable amounts are left out of the affected sums and
//! listed in [`MonthlyReport::issues`].

use chrono::{Local, TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
  aggregate::{StoreTotal, add_to_store},
  amount::AmountIssue,
  month::{MonthSelection, filter_in},
  record::PurchaseRecord,
};

/// Pie slice colours, reused cyclically by slice position.
pub const PALETTE: [&str; 5] = ["#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8"];

/// Single fill colour of the per-store bar chart.
pub const BAR_FILL: &str = "#8884d8";

pub fn palette_color(index: usize) -> &'static str { PALETTE[index % PALETTE.len()] }

/// One line of the listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
  /// 1-based position in the listing (not the record id).
  pub index:    usize,
  pub id:       i64,
  pub name:     String,
  pub price:    Option<Decimal>,
  pub discount: Option<Decimal>,
  pub store:    String,
  pub weight:   String,
  pub quantity: String,
  /// `price × quantity`, absent when either is unusable.
  pub total:    Option<Decimal>,
}

/// A per-store entry with its chart colour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSlice {
  pub store: String,
  pub total: Decimal,
  pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
  pub period:        MonthSelection,
  pub rows:          Vec<ReportRow>,
  pub total_expense: Decimal,
  pub total_savings: Decimal,
  pub slices:        Vec<StoreSlice>,
  pub issues:        Vec<AmountIssue>,
}

impl MonthlyReport {
  /// Build the report for `period` in local time.
  pub fn build(records: &[PurchaseRecord], period: MonthSelection) -> Self {
    Self::build_in(records, period, &Local)
  }

  pub fn build_in<Tz: TimeZone>(records: &[PurchaseRecord], period: MonthSelection, tz: &Tz) -> Self {
    let mut rows = Vec::new();
    let mut stores: Vec<StoreTotal> = Vec::new();
    let mut issues = Vec::new();
    let mut total_expense = Decimal::ZERO;
    let mut total_savings = Decimal::ZERO;

    for (i, r) in filter_in(records, period, tz).into_iter().enumerate() {
      let total = match r.line_total() {
        Ok(t) => {
          match total_expense.checked_add(t) {
            Some(sum) if add_to_store(&mut stores, &r.store, t) => total_expense = sum,
            _ => issues.push(r.overflow_issue()),
          }
          Some(t)
        }
        Err(issue) => {
          issues.push(issue);
          None
        }
      };

      let savings = r.line_savings().and_then(|s| {
        total_savings
          .checked_add(s)
          .ok_or_else(|| r.overflow_issue())
      });
      match savings {
        Ok(sum) => total_savings = sum,
        // Already reported above when the quantity or an overflow is the
        // culprit.
        Err(issue) if issues.contains(&issue) => {}
        Err(issue) => issues.push(issue),
      }

      rows.push(ReportRow {
        index: i + 1,
        id: r.id,
        name: r.name.clone(),
        price: r.unit_price().ok(),
        discount: r.unit_discount().ok(),
        store: r.store.clone(),
        weight: r.weight.clone(),
        quantity: r.display_quantity().to_owned(),
        total,
      });
    }

    let slices = stores
      .into_iter()
      .enumerate()
      .map(|(i, s)| StoreSlice {
        store: s.store,
        total: s.total,
        color: palette_color(i),
      })
      .collect();

    Self {
      period,
      rows,
      total_expense,
      total_savings,
      slices,
      issues,
    }
  }

  pub fn title(&self) -> String { format!("Monthly Overview - {}", self.period) }
}
