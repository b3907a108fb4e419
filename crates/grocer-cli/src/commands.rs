//! Non-interactive subcommands: `add` and `report`.

use std::{
  fmt,
  io::{self, Write},
};

use anyhow::Context as _;
use chrono::{Local, TimeZone};
use clap::Args;
use grocer_core::{
  amount::format_money,
  month::MonthSelection,
  record::{Draft, Field, PurchaseRecord},
  report::MonthlyReport,
  store::{GroceryStore, ItemStore},
};
use rust_decimal::Decimal;

use crate::ui::store_label;

// ─── add ──────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct AddArgs {
  /// Item name.
  #[arg(long)]
  pub name:     String,
  /// Unit price.
  #[arg(long)]
  pub price:    String,
  /// Discount per unit.
  #[arg(long, default_value = "")]
  pub discount: String,
  #[arg(long, default_value = "")]
  pub store:    String,
  /// Free-form weight, e.g. 500g.
  #[arg(long, default_value = "")]
  pub weight:   String,
  #[arg(long, default_value = "")]
  pub quantity: String,
}

impl AddArgs {
  pub fn to_draft(&self) -> Draft {
    let mut draft = Draft::new();
    for (field, value) in [
      (Field::Name, &self.name),
      (Field::Price, &self.price),
      (Field::Discount, &self.discount),
      (Field::Store, &self.store),
      (Field::Weight, &self.weight),
      (Field::Quantity, &self.quantity),
    ] {
      draft.set_field(field, value.as_str());
    }
    draft
  }
}

pub async fn add<S: GroceryStore>(items: &mut ItemStore<S>, args: &AddArgs) -> anyhow::Result<()> {
  let record = items
    .append(&args.to_draft())
    .await
    .context("adding item")?;
  println!("{}", added_line(&record, &Local));
  Ok(())
}

/// Confirmation printed by `add`, dated in `tz`.
fn added_line<Tz: TimeZone>(record: &PurchaseRecord, tz: &Tz) -> String
where
  Tz::Offset: fmt::Display,
{
  let total = record.line_total().map(format_money).unwrap_or_default();
  let day = record.date.with_timezone(tz).format("%Y-%m-%d");
  format!("Added {} {} on {}", record.name, total, day)
}

// ─── report ───────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct ReportArgs {
  /// Month, 1-12. Defaults to the current month.
  #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
  pub month: Option<u32>,
  /// Four-digit year. Defaults to the current year.
  #[arg(long)]
  pub year:  Option<i32>,
  /// Print the report as JSON.
  #[arg(long)]
  pub json:  bool,
}

impl ReportArgs {
  pub fn period(&self) -> anyhow::Result<MonthSelection> {
    let now = MonthSelection::current();
    let month = self.month.map_or(now.month(), |m| m - 1);
    Ok(MonthSelection::new(month, self.year.unwrap_or(now.year()))?)
  }
}

pub fn report<S: GroceryStore>(items: &ItemStore<S>, args: &ReportArgs) -> anyhow::Result<()> {
  let report = MonthlyReport::build(items.records(), args.period()?);
  let mut out = io::stdout().lock();
  if args.json {
    serde_json::to_writer_pretty(&mut out, &report).context("writing JSON report")?;
    writeln!(out)?;
  } else {
    write_report(&mut out, &report)?;
  }
  Ok(())
}

/// Plain-text rendering of a report: listing, totals, per-store subtotals.
pub fn write_report(out: &mut impl Write, report: &MonthlyReport) -> io::Result<()> {
  writeln!(out, "{}", report.title())?;
  writeln!(out)?;
  writeln!(
    out,
    "{:>4}  {:<20} {:>9} {:>9} {:<12} {:<10} {:>8} {:>10}",
    "S.No", "Item", "Price", "Discount", "Store", "Weight", "Quantity", "Total"
  )?;
  for r in &report.rows {
    writeln!(
      out,
      "{:>4}  {:<20} {:>9} {:>9} {:<12} {:<10} {:>8} {:>10}",
      r.index,
      r.name,
      money(r.price),
      money(r.discount),
      r.store,
      r.weight,
      r.quantity,
      money(r.total)
    )?;
  }
  writeln!(out)?;
  writeln!(out, "Total Expense: {}", format_money(report.total_expense))?;
  writeln!(out, "Total Savings: {}", format_money(report.total_savings))?;

  if !report.slices.is_empty() {
    writeln!(out)?;
    writeln!(out, "Expenses by Store")?;
    for s in &report.slices {
      writeln!(out, "  {:<20} {:>10}", store_label(&s.store), format_money(s.total))?;
    }
  }

  for issue in &report.issues {
    writeln!(out, "warning: {issue}")?;
  }
  Ok(())
}

fn money(amount: Option<Decimal>) -> String { amount.map(format_money).unwrap_or_else(|| "-".into()) }

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use grocer_core::memory::MemoryStore;

  use super::*;

  fn args(name: &str, price: &str, quantity: &str, store: &str) -> AddArgs {
    AddArgs {
      name:     name.into(),
      price:    price.into(),
      discount: String::new(),
      store:    store.into(),
      weight:   String::new(),
      quantity: quantity.into(),
    }
  }

  #[tokio::test]
  async fn add_rejects_missing_price() {
    let mut items = ItemStore::open(MemoryStore::new()).await.unwrap();
    let err = add(&mut items, &args("Milk", "", "", "")).await.unwrap_err();
    assert!(format!("{err:#}").contains("price is required"));
    assert!(items.is_empty());
  }

  #[tokio::test]
  async fn text_report_lists_rows_and_totals() {
    let mut items = ItemStore::open(MemoryStore::new()).await.unwrap();
    let at = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    items
      .append_at(&args("Milk", "3.50", "2", "A").to_draft(), at)
      .await
      .unwrap();
    items
      .append_at(&args("Bread", "2.00", "", "B").to_draft(), at + chrono::Duration::minutes(5))
      .await
      .unwrap();

    let period = MonthSelection::new(2, 2024).unwrap();
    let report = MonthlyReport::build_in(items.records(), period, &Utc);
    let mut out = Vec::new();
    write_report(&mut out, &report).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("Monthly Overview - March 2024"));
    assert!(text.contains("Milk"));
    assert!(text.contains("Total Expense: $9.00"));
    assert!(text.contains("Total Savings: $0.00"));
    assert!(text.contains("$7.00"));
  }

  #[test]
  fn added_line_uses_the_given_zone() {
    let at = Utc.with_ymd_and_hms(2024, 3, 15, 23, 30, 0).unwrap();
    let record = PurchaseRecord::from_draft(args("Milk", "3.50", "2", "A").to_draft(), at);
    assert_eq!(added_line(&record, &Utc), "Added Milk $7.00 on 2024-03-15");

    let east = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
    assert_eq!(added_line(&record, &east), "Added Milk $7.00 on 2024-03-16");
  }

  #[test]
  fn report_month_is_one_based() {
    let args = ReportArgs {
      month: Some(12),
      year:  Some(2023),
      json:  false,
    };
    let period = args.period().unwrap();
    assert_eq!((period.month(), period.year()), (11, 2023));
  }
}
