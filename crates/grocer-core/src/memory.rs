//! In-process [`GroceryStore`] holding the serialised list in memory.
//!
//! Behaves like one slot of a key-value store: the list is kept as JSON
//! text so tests exercise the same encode/decode path as real backends.

use std::sync::{
  Mutex, PoisonError,
  atomic::{AtomicBool, Ordering},
};

use crate::{
  Error, Result,
  record::PurchaseRecord,
  store::{GroceryStore, decode_records, encode_records},
};

#[derive(Debug, Default)]
pub struct MemoryStore {
  slot:       Mutex<Option<String>>,
  fail_saves: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Start from previously stored text, parseable or not.
  pub fn with_raw(raw: impl Into<String>) -> Self {
    Self {
      slot:       Mutex::new(Some(raw.into())),
      fail_saves: AtomicBool::new(false),
    }
  }

  /// The stored text, if anything has been saved.
  pub fn raw(&self) -> Option<String> {
    self
      .slot
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// Make subsequent saves fail, to exercise error paths.
  pub fn fail_saves(&self, fail: bool) { self.fail_saves.store(fail, Ordering::SeqCst); }
}

impl GroceryStore for MemoryStore {
  type Error = Error;

  async fn load(&self) -> Result<Vec<PurchaseRecord>> { Ok(decode_records(self.raw().as_deref())) }

  async fn save(&self, records: &[PurchaseRecord]) -> Result<()> {
    if self.fail_saves.load(Ordering::SeqCst) {
      return Err(Error::Storage("memory store is read-only".into()));
    }
    let text = encode_records(records)?;
    *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(text);
    Ok(())
  }
}
