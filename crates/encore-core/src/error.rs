//! Error types for `encore-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// An identifier that is not a positive integer.
  #[error("invalid id: {0:?}")]
  InvalidId(String),

  #[error("invalid event: {0}")]
  InvalidEvent(String),

  #[error("invalid interaction: {0}")]
  InvalidInteraction(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
