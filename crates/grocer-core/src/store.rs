//! The `GroceryStore` persistence trait and the [`ItemStore`] built on it.
//!
//! Backends (e.g. `grocer-store-sqlite`, [`crate::memory::MemoryStore`])
//! persist the whole record list as one JSON document under
//! [`GROCERIES_KEY`]. The CLI depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  Error, Result,
  record::{Draft, PurchaseRecord},
};

/// Key the serialised record list lives under.
pub const GROCERIES_KEY: &str = "groceries";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Whole-collection persistence for purchase records.
///
/// `save` always receives the complete list and overwrites what was there.
pub trait GroceryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the persisted list. Nothing stored yet, or a stored document that
  /// does not parse, both yield an empty list.
  fn load(&self) -> impl Future<Output = Result<Vec<PurchaseRecord>, Self::Error>> + Send + '_;

  /// Replace the persisted list with `records`.
  fn save<'a>(
    &'a self,
    records: &'a [PurchaseRecord],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Encoding ────────────────────────────────────────────────────────────────

/// Serialise the record list for storage.
pub fn encode_records(records: &[PurchaseRecord]) -> Result<String> {
  Ok(serde_json::to_string(records)?)
}

/// Decode a stored record list. Absent or unparseable text yields an empty
/// list; the latter is logged.
pub fn decode_records(raw: Option<&str>) -> Vec<PurchaseRecord> {
  let Some(raw) = raw else {
    return Vec::new();
  };
  match serde_json::from_str(raw) {
    Ok(records) => records,
    Err(e) => {
      tracing::warn!(error = %e, "stored groceries are not readable; starting empty");
      Vec::new()
    }
  }
}

// ─── ItemStore ───────────────────────────────────────────────────────────────

/// The ordered, append-only list of purchases plus the backend it is
/// mirrored to. Every successful append rewrites the backend.
pub struct ItemStore<S> {
  backend: S,
  records: Vec<PurchaseRecord>,
}

impl<S: GroceryStore> ItemStore<S> {
  /// Load the persisted list from `backend`.
  pub async fn open(backend: S) -> Result<Self> {
    let records = backend.load().await.map_err(storage)?;
    tracing::debug!(count = records.len(), "loaded groceries");
    Ok(Self { backend, records })
  }

  /// All records in insertion order.
  pub fn records(&self) -> &[PurchaseRecord] { &self.records }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn backend(&self) -> &S { &self.backend }

  /// Append a record built from `draft`, stamped now.
  pub async fn append(&mut self, draft: &Draft) -> Result<PurchaseRecord> {
    self.append_at(draft, Utc::now()).await
  }

  /// Append a record built from `draft` with an explicit creation time.
  ///
  /// Refuses drafts that fail [`Draft::validate`]. If the backend write
  /// fails the record is dropped again, so memory never runs ahead of
  /// storage.
  pub async fn append_at(
    &mut self,
    draft: &Draft,
    created_at: DateTime<Utc>,
  ) -> Result<PurchaseRecord> {
    draft.validate()?;
    let record = PurchaseRecord::from_draft(draft.clone(), created_at);
    self.records.push(record.clone());

    if let Err(e) = self.backend.save(&self.records).await {
      self.records.pop();
      return Err(storage(e));
    }

    tracing::info!(id = record.id, name = %record.name, "added purchase");
    Ok(record)
  }
}

fn storage<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Storage(Box::new(e))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::{memory::MemoryStore, record::Field};

  fn draft(name: &str, price: &str) -> Draft {
    let mut d = Draft::new();
    d.set_field(Field::Name, name);
    d.set_field(Field::Price, price);
    d
  }

  #[tokio::test]
  async fn open_empty_backend() {
    let items = ItemStore::open(MemoryStore::new()).await.unwrap();
    assert!(items.is_empty());
  }

  #[tokio::test]
  async fn append_grows_by_one_and_persists() {
    let mut items = ItemStore::open(MemoryStore::new()).await.unwrap();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

    let r = items.append_at(&draft("Milk", "3.50"), at).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(r.date, at);
    assert_eq!(r.id, at.timestamp_millis());

    let stored = decode_records(items.backend().raw().as_deref());
    assert_eq!(stored, items.records());
  }

  #[tokio::test]
  async fn append_keeps_insertion_order() {
    let mut items = ItemStore::open(MemoryStore::new()).await.unwrap();
    for name in ["a", "b", "c"] {
      items.append(&draft(name, "1")).await.unwrap();
    }
    let names: Vec<_> = items.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);
  }

  #[tokio::test]
  async fn missing_name_or_price_changes_nothing() {
    let mut items = ItemStore::open(MemoryStore::new()).await.unwrap();

    let err = items.append(&draft("", "1.00")).await.unwrap_err();
    assert!(matches!(err, Error::MissingField(Field::Name)));
    let err = items.append(&draft("Milk", "")).await.unwrap_err();
    assert!(matches!(err, Error::MissingField(Field::Price)));

    assert!(items.is_empty());
    assert!(items.backend().raw().is_none());
  }

  #[tokio::test]
  async fn reopening_restores_the_same_records() {
    let backend = MemoryStore::new();
    let mut items = ItemStore::open(backend).await.unwrap();
    let mut d = draft("Bread", "2.00");
    d.set_field(Field::Weight, "800g");
    d.set_field(Field::Store, "B");
    items.append(&d).await.unwrap();
    items.append(&draft("Milk", "3.50")).await.unwrap();

    let raw = items.backend().raw();
    let reopened = ItemStore::open(MemoryStore::with_raw(raw.unwrap()))
      .await
      .unwrap();
    assert_eq!(reopened.records(), items.records());
  }

  #[tokio::test]
  async fn unreadable_storage_opens_empty() {
    let items = ItemStore::open(MemoryStore::with_raw("{not json"))
      .await
      .unwrap();
    assert!(items.is_empty());
  }

  #[tokio::test]
  async fn failed_save_rolls_back() {
    let backend = MemoryStore::new();
    backend.fail_saves(true);
    let mut items = ItemStore::open(backend).await.unwrap();

    let err = items.append(&draft("Milk", "3.50")).await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
    assert!(items.is_empty());
  }
}
