//! Error type for `encore-store-sqlite`.

use encore_core::id::{EventId, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] encore_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value that does not map back to a domain type.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("user not found: {0}")]
  UserNotFound(UserId),

  #[error("event not found: {0}")]
  EventNotFound(EventId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
