//! [`SqliteStore`]: the SQLite implementation of [`GroceryStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use grocer_core::{
  record::PurchaseRecord,
  store::{GROCERIES_KEY, GroceryStore, decode_records, encode_records},
};

use crate::{Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A key-value store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read the text stored under `key`, if any.
  pub async fn get(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();
    let value = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;
    Ok(value)
  }

  /// Store `value` under `key`, replacing whatever was there.
  pub async fn set(&self, key: &str, value: String) -> Result<()> {
    let key = key.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO kv (key, value) VALUES (?1, ?2)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value",
          rusqlite::params![key, value],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── GroceryStore impl ───────────────────────────────────────────────────────

impl GroceryStore for SqliteStore {
  type Error = crate::Error;

  async fn load(&self) -> Result<Vec<PurchaseRecord>> {
    let raw = self.get(GROCERIES_KEY).await?;
    Ok(decode_records(raw.as_deref()))
  }

  async fn save(&self, records: &[PurchaseRecord]) -> Result<()> {
    let text = encode_records(records)?;
    tracing::debug!(count = records.len(), bytes = text.len(), "saving groceries");
    self.set(GROCERIES_KEY, text).await
  }
}
