//! Error types for `grocer-core`.

use thiserror::Error;

use crate::{amount::AmountIssue, record::Field};

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} is required")]
  MissingField(Field),

  #[error("{field} {value:?} is not a decimal number")]
  InvalidAmount { field: Field, value: String },

  #[error("{0}")]
  InvalidRecord(#[from] AmountIssue),

  #[error("unknown field: {0:?}")]
  UnknownField(String),

  #[error("month must be between 0 and 11, got {0}")]
  InvalidMonth(u32),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
