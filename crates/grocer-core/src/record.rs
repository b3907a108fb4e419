//! Purchase records and the draft that the add-item form edits.
//!
//! A record is created once from a [`Draft`] and never changes afterwards.
//! Numeric fields stay as entered text; see [`crate::amount`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  amount::{AmountIssue, parse_amount},
};

// ─── Field ───────────────────────────────────────────────────────────────────

/// One of the six user-editable fields of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
  Name,
  Price,
  Discount,
  Store,
  Weight,
  Quantity,
}

impl Field {
  /// Form order.
  pub const ALL: [Field; 6] = [
    Field::Name,
    Field::Price,
    Field::Discount,
    Field::Store,
    Field::Weight,
    Field::Quantity,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Name => "name",
      Self::Price => "price",
      Self::Discount => "discount",
      Self::Store => "store",
      Self::Weight => "weight",
      Self::Quantity => "quantity",
    }
  }

  /// Hint shown in an empty form input.
  pub fn placeholder(self) -> &'static str {
    match self {
      Self::Name => "Item name",
      Self::Price => "Price",
      Self::Discount => "Discount",
      Self::Store => "Store",
      Self::Weight => "Weight (e.g., 500g)",
      Self::Quantity => "Quantity",
    }
  }

  pub fn is_numeric(self) -> bool {
    matches!(self, Self::Price | Self::Discount | Self::Quantity)
  }

  /// The next field in form order, wrapping around.
  pub fn next(self) -> Self {
    let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
    Self::ALL[(i + 1) % Self::ALL.len()]
  }

  /// The previous field in form order, wrapping around.
  pub fn prev(self) -> Self {
    let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
    Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Field {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|f| f.as_str() == s)
      .ok_or_else(|| Error::UnknownField(s.to_owned()))
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// The in-progress form contents. Every field starts out empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
  pub name:     String,
  pub price:    String,
  pub discount: String,
  pub store:    String,
  pub weight:   String,
  pub quantity: String,
}

impl Draft {
  pub fn new() -> Self { Self::default() }

  pub fn field(&self, field: Field) -> &str {
    match field {
      Field::Name => &self.name,
      Field::Price => &self.price,
      Field::Discount => &self.discount,
      Field::Store => &self.store,
      Field::Weight => &self.weight,
      Field::Quantity => &self.quantity,
    }
  }

  pub fn field_mut(&mut self, field: Field) -> &mut String {
    match field {
      Field::Name => &mut self.name,
      Field::Price => &mut self.price,
      Field::Discount => &mut self.discount,
      Field::Store => &mut self.store,
      Field::Weight => &mut self.weight,
      Field::Quantity => &mut self.quantity,
    }
  }

  /// Replace one field, leaving the others untouched.
  pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
    *self.field_mut(field) = value.into();
  }

  /// Clear every field.
  pub fn reset(&mut self) { *self = Self::default(); }

  /// Check that the draft can become a record.
  ///
  /// `name` and `price` must be non-empty. Numeric fields that are filled in
  /// must parse as decimals.
  pub fn validate(&self) -> Result<()> {
    for field in [Field::Name, Field::Price] {
      if self.field(field).is_empty() {
        return Err(Error::MissingField(field));
      }
    }
    for field in Field::ALL.into_iter().filter(|f| f.is_numeric()) {
      let value = self.field(field);
      if !value.is_empty() && parse_amount(value).is_none() {
        return Err(Error::InvalidAmount {
          field,
          value: value.to_owned(),
        });
      }
    }
    Ok(())
  }
}

// ─── PurchaseRecord ──────────────────────────────────────────────────────────

/// One logged purchase. Never edited or removed once appended.
///
/// The serialised field names are part of the stored format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
  /// Milliseconds since the Unix epoch at creation.
  pub id:       i64,
  #[serde(default)]
  pub name:     String,
  #[serde(default)]
  pub price:    String,
  #[serde(default)]
  pub discount: String,
  #[serde(default)]
  pub store:    String,
  /// Free-form; display only.
  #[serde(default)]
  pub weight:   String,
  #[serde(default)]
  pub quantity: String,
  #[serde(with = "iso_millis")]
  pub date:     DateTime<Utc>,
}

impl PurchaseRecord {
  /// Build a record from `draft`, stamped with `created_at` truncated to
  /// whole milliseconds so that `date` and `id` name the same instant.
  pub fn from_draft(draft: Draft, created_at: DateTime<Utc>) -> Self {
    let id = created_at.timestamp_millis();
    let date = DateTime::from_timestamp_millis(id).unwrap_or(created_at);
    let Draft {
      name,
      price,
      discount,
      store,
      weight,
      quantity,
    } = draft;
    Self {
      id,
      name,
      price,
      discount,
      store,
      weight,
      quantity,
      date,
    }
  }

  fn issue(&self, field: Field, value: &str) -> AmountIssue {
    AmountIssue {
      id:    self.id,
      field,
      value: value.to_owned(),
    }
  }

  /// The record's line pushes a running sum past what a decimal can hold.
  pub(crate) fn overflow_issue(&self) -> AmountIssue { self.issue(Field::Price, &self.price) }

  pub fn unit_price(&self) -> Result<Decimal, AmountIssue> {
    parse_amount(&self.price).ok_or_else(|| self.issue(Field::Price, &self.price))
  }

  /// Discount per unit; empty means none.
  pub fn unit_discount(&self) -> Result<Decimal, AmountIssue> {
    if self.discount.is_empty() {
      return Ok(Decimal::ZERO);
    }
    parse_amount(&self.discount).ok_or_else(|| self.issue(Field::Discount, &self.discount))
  }

  /// Quantity; empty means one.
  pub fn quantity_amount(&self) -> Result<Decimal, AmountIssue> {
    if self.quantity.is_empty() {
      return Ok(Decimal::ONE);
    }
    parse_amount(&self.quantity).ok_or_else(|| self.issue(Field::Quantity, &self.quantity))
  }

  /// `price × quantity`.
  pub fn line_total(&self) -> Result<Decimal, AmountIssue> {
    self
      .unit_price()?
      .checked_mul(self.quantity_amount()?)
      .ok_or_else(|| self.issue(Field::Quantity, &self.quantity))
  }

  /// `discount × quantity`.
  pub fn line_savings(&self) -> Result<Decimal, AmountIssue> {
    self
      .unit_discount()?
      .checked_mul(self.quantity_amount()?)
      .ok_or_else(|| self.issue(Field::Quantity, &self.quantity))
  }

  /// Quantity as shown in listings.
  pub fn display_quantity(&self) -> &str {
    if self.quantity.is_empty() { "1" } else { &self.quantity }
  }
}

/// `date` is stored the way browsers print `Date.toISOString()`:
/// `2024-03-15T12:00:00.000Z`. Any RFC 3339 timestamp is accepted on read.
mod iso_millis {
  use chrono::{DateTime, SecondsFormat, Utc};
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let s = String::deserialize(d)?;
    DateTime::parse_from_rfc3339(&s)
      .map(|dt| dt.with_timezone(&Utc))
      .map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn milk() -> Draft {
    let mut d = Draft::new();
    d.set_field(Field::Name, "Milk");
    d.set_field(Field::Price, "3.50");
    d.set_field(Field::Quantity, "2");
    d.set_field(Field::Store, "A");
    d
  }

  #[test]
  fn set_field_leaves_others_untouched() {
    let mut d = milk();
    d.set_field(Field::Store, "B");
    assert_eq!(d.store, "B");
    assert_eq!(d.name, "Milk");
    assert_eq!(d.price, "3.50");
    assert_eq!(d.quantity, "2");
  }

  #[test]
  fn reset_clears_everything() {
    let mut d = milk();
    d.reset();
    assert_eq!(d, Draft::default());
  }

  #[test]
  fn validate_requires_name_and_price() {
    let mut d = milk();
    d.set_field(Field::Name, "");
    assert!(matches!(d.validate(), Err(Error::MissingField(Field::Name))));

    let mut d = milk();
    d.set_field(Field::Price, "");
    assert!(matches!(d.validate(), Err(Error::MissingField(Field::Price))));

    assert!(milk().validate().is_ok());
  }

  #[test]
  fn validate_rejects_malformed_numbers() {
    let mut d = milk();
    d.set_field(Field::Quantity, "two");
    let err = d.validate().unwrap_err();
    assert!(matches!(
      err,
      Error::InvalidAmount { field: Field::Quantity, ref value } if value == "two"
    ));
  }

  #[test]
  fn validate_rejects_separators_and_huge_prices() {
    for price in ["3_50", "1e28", "79228162514264337593543950335"] {
      let mut d = milk();
      d.set_field(Field::Price, price);
      assert!(
        matches!(d.validate(), Err(Error::InvalidAmount { field: Field::Price, .. })),
        "{price}"
      );
    }
  }

  #[test]
  fn field_names_parse() {
    assert_eq!("discount".parse::<Field>().unwrap(), Field::Discount);
    assert!("colour".parse::<Field>().is_err());
    assert_eq!(Field::Quantity.next(), Field::Name);
    assert_eq!(Field::Name.prev(), Field::Quantity);
  }

  #[test]
  fn record_id_and_date_agree() {
    let at = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
      + chrono::Duration::nanoseconds(123_456_789);
    let r = PurchaseRecord::from_draft(milk(), at);
    assert_eq!(r.id, at.timestamp_millis());
    assert_eq!(r.date.timestamp_millis(), r.id);
    assert_eq!(r.date.timestamp_subsec_nanos(), 123_000_000);
  }

  #[test]
  fn serialises_with_browser_field_names() {
    let at = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    let r = PurchaseRecord::from_draft(milk(), at);
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["id"], 1_710_504_000_000_i64);
    assert_eq!(json["date"], "2024-03-15T12:00:00.000Z");
    assert_eq!(json["quantity"], "2");

    let back: PurchaseRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, r);
  }

  #[test]
  fn missing_text_fields_default_to_empty() {
    let r: PurchaseRecord = serde_json::from_str(
      r#"{"id":1,"name":"Eggs","price":"2","date":"2024-01-02T03:04:05.000Z"}"#,
    )
    .unwrap();
    assert_eq!(r.discount, "");
    assert_eq!(r.display_quantity(), "1");
    assert_eq!(r.line_total().unwrap(), Decimal::from(2));
    assert_eq!(r.line_savings().unwrap(), Decimal::ZERO);
  }

  #[test]
  fn malformed_price_is_an_issue() {
    let mut r = PurchaseRecord::from_draft(milk(), Utc::now());
    r.price = "free".into();
    let issue = r.line_total().unwrap_err();
    assert_eq!(issue.field, Field::Price);
    assert_eq!(issue.value, "free");
  }
}
