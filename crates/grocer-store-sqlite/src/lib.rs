//! SQLite backend for the Grocer purchase log.
//!
//! A single `kv` table stands in for browser-style local storage; the record
//! list lives under one key. Wraps [`tokio_rusqlite`] so all database access
//! runs on a dedicated thread without blocking the async runtime.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
