//! Error type for `encore-recommend`.

use encore_core::id::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The user directory has no such user. Never downgraded to a cold start.
  #[error("user not found: {0}")]
  UserNotFound(UserId),

  /// The backing store failed; not retried here.
  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreUnavailable(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
