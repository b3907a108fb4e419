//! Decimal amounts as typed into the form and stored in records.
//!
//! Prices, discounts and quantities are kept as the text the user entered and
//! parsed on demand. Parsing is locale-insensitive and exact; a value that
//! does not parse is reported, never coerced.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::record::Field;

/// Largest magnitude accepted for a price, discount or quantity.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Parse `text` as a decimal number. Surrounding whitespace is ignored;
/// scientific notation (`1e3`) is accepted. Empty text, anything other than
/// digits, sign, point and exponent, and magnitudes above [`MAX_AMOUNT`] are
/// `None`.
pub fn parse_amount(text: &str) -> Option<Decimal> {
  let text = text.trim();
  if text.is_empty()
    || !text
      .chars()
      .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
  {
    return None;
  }
  Decimal::from_str(text)
    .or_else(|_| Decimal::from_scientific(text))
    .ok()
    .filter(|amount| amount.abs() <= MAX_AMOUNT)
}

/// Format an amount with the currency prefix and two decimal places.
pub fn format_money(amount: Decimal) -> String {
  let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  format!("${rounded:.2}")
}

// ─── AmountIssue ─────────────────────────────────────────────────────────────

/// A stored record carries a numeric field that cannot be used in totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmountIssue {
  pub id:    i64,
  pub field: Field,
  pub value: String,
}

impl fmt::Display for AmountIssue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "record {}: {} {:?} is not a usable amount",
      self.id, self.field, self.value
    )
  }
}

impl std::error::Error for AmountIssue {}

#[cfg(test)]
mod tests {
  use rust_decimal::Decimal;

  use super::*;

  #[test]
  fn parses_plain_decimals() {
    assert_eq!(parse_amount("3.50"), Some(Decimal::new(350, 2)));
    assert_eq!(parse_amount(" 2 "), Some(Decimal::from(2)));
    assert_eq!(parse_amount("-0.5"), Some(Decimal::new(-5, 1)));
  }

  #[test]
  fn parses_scientific_notation() {
    assert_eq!(parse_amount("1e2"), Some(Decimal::from(100)));
  }

  #[test]
  fn rejects_empty_and_garbage() {
    assert_eq!(parse_amount(""), None);
    assert_eq!(parse_amount("   "), None);
    assert_eq!(parse_amount("abc"), None);
    assert_eq!(parse_amount("3,50"), None);
    assert_eq!(parse_amount("3_50"), None);
    assert_eq!(parse_amount("1_000"), None);
    assert_eq!(parse_amount("$3"), None);
  }

  #[test]
  fn rejects_amounts_beyond_the_limit() {
    assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_i64));
    assert_eq!(parse_amount("1000000000000"), Some(MAX_AMOUNT));
    assert_eq!(parse_amount("-1000000000000"), Some(-MAX_AMOUNT));
    assert_eq!(parse_amount("1000000000000.01"), None);
    assert_eq!(parse_amount("1e28"), None);
    assert_eq!(parse_amount("79228162514264337593543950335"), None);
  }

  #[test]
  fn money_has_two_decimals() {
    assert_eq!(format_money(Decimal::from(9)), "$9.00");
    assert_eq!(format_money(Decimal::new(7005, 3)), "$7.01");
    assert_eq!(format_money(Decimal::new(35, 1)), "$3.50");
  }
}
