//! Totals over a set of records.
//!
//! These reductions are strict: the first record with an unusable amount,
//! or whose line would overflow the running sum, aborts with
//! [`Error::InvalidRecord`](crate::Error::InvalidRecord). The render model in
//! [`crate::report`] is the lenient counterpart.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{Error, Result, record::PurchaseRecord};

/// Spend at one store. Records with an empty store share the `""` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreTotal {
  pub store: String,
  pub total: Decimal,
}

/// `Σ price × quantity`.
pub fn total_expense<'a>(records: impl IntoIterator<Item = &'a PurchaseRecord>) -> Result<Decimal> {
  records
    .into_iter()
    .try_fold(Decimal::ZERO, |sum, r| {
      sum
        .checked_add(r.line_total()?)
        .ok_or_else(|| Error::InvalidRecord(r.overflow_issue()))
    })
}

/// `Σ discount × quantity`.
pub fn total_savings<'a>(records: impl IntoIterator<Item = &'a PurchaseRecord>) -> Result<Decimal> {
  records
    .into_iter()
    .try_fold(Decimal::ZERO, |sum, r| {
      sum
        .checked_add(r.line_savings()?)
        .ok_or_else(|| Error::InvalidRecord(r.overflow_issue()))
    })
}

/// `price × quantity` summed per store, in order of each store's first
/// appearance.
pub fn per_store_total<'a>(
  records: impl IntoIterator<Item = &'a PurchaseRecord>,
) -> Result<Vec<StoreTotal>> {
  let mut totals = Vec::new();
  for r in records {
    if !add_to_store(&mut totals, &r.store, r.line_total()?) {
      return Err(Error::InvalidRecord(r.overflow_issue()));
    }
  }
  Ok(totals)
}

/// Add `amount` to `store`'s entry. Returns `false`, leaving `totals`
/// untouched, when the entry would overflow.
pub(crate) fn add_to_store(totals: &mut Vec<StoreTotal>, store: &str, amount: Decimal) -> bool {
  match totals.iter_mut().find(|t| t.store == store) {
    Some(t) => match t.total.checked_add(amount) {
      Some(sum) => {
        t.total = sum;
        true
      }
      None => false,
    },
    None => {
      totals.push(StoreTotal {
        store: store.to_owned(),
        total: amount,
      });
      true
    }
  }
}
