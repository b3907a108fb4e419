//! Calendar-month selection and the month filter.
//!
//! Months are zero-indexed (0 = January). Record timestamps are compared in
//! the viewer's local timezone unless a zone is given explicitly.

use std::fmt;

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use serde::Serialize;

use crate::{Error, Result, record::PurchaseRecord};

pub const MONTH_NAMES: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December",
];

/// How stepping past December or before January treats the year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Navigation {
  /// The month wraps and the year stays put.
  #[default]
  Wrap,
  /// The year is carried across the boundary.
  Rollover,
}

/// The (month, year) pair the listing and totals are restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthSelection {
  month: u32,
  year:  i32,
}

impl MonthSelection {
  pub fn new(month: u32, year: i32) -> Result<Self> {
    if month > 11 {
      return Err(Error::InvalidMonth(month));
    }
    Ok(Self { month, year })
  }

  /// The current local month.
  pub fn current() -> Self { Self::containing(&Local::now()) }

  pub fn containing<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
    Self {
      month: at.month0(),
      year:  at.year(),
    }
  }

  pub fn month(&self) -> u32 { self.month }

  pub fn year(&self) -> i32 { self.year }

  pub fn name(&self) -> &'static str { MONTH_NAMES[self.month as usize] }

  /// Step `delta` months forward (negative steps back).
  pub fn advance(self, delta: i32, navigation: Navigation) -> Self {
    match navigation {
      Navigation::Wrap => Self {
        month: (self.month as i32 + delta).rem_euclid(12) as u32,
        year:  self.year,
      },
      Navigation::Rollover => {
        let index = self.year * 12 + self.month as i32 + delta;
        Self {
          month: index.rem_euclid(12) as u32,
          year:  index.div_euclid(12),
        }
      }
    }
  }

  /// Whether `at`, read in `tz`, falls inside this month.
  pub fn contains_in<Tz: TimeZone>(&self, at: &DateTime<Utc>, tz: &Tz) -> bool {
    let local = at.with_timezone(tz);
    local.month0() == self.month && local.year() == self.year
  }
}

impl fmt::Display for MonthSelection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.name(), self.year)
  }
}

/// Records dated in `selection`, in local time, in insertion order.
pub fn filter(records: &[PurchaseRecord], selection: MonthSelection) -> Vec<&PurchaseRecord> {
  filter_in(records, selection, &Local)
}

/// [`filter`] with an explicit timezone.
pub fn filter_in<'a, Tz: TimeZone>(
  records: &'a [PurchaseRecord],
  selection: MonthSelection,
  tz: &Tz,
) -> Vec<&'a PurchaseRecord> {
  records
    .iter()
    .filter(|r| selection.contains_in(&r.date, tz))
    .collect()
}
