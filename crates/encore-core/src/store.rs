//! The `CatalogStore` trait, the repository boundary of the recommender.
//!
//! The trait is implemented by storage backends (e.g. `encore-store-sqlite`).
//! The recommender and the HTTP layer depend on this abstraction, never on a
//! concrete backend.

use std::{collections::HashMap, future::Future};

use chrono::{DateTime, Utc};

use crate::{
  event::{EventRecord, NewEvent},
  id::{EventId, UserId},
  interaction::{HistoryEntry, InteractionRecord, NewInteraction},
  user::{ExplicitPreferences, NewUser, User},
};

/// Abstraction over the event catalog, the interaction log and the user
/// directory.
///
/// Reads are snapshot-style: callers assume a consistent-enough view at fetch
/// time and nothing stronger.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Events ────────────────────────────────────────────────────────────

  /// Validate and persist a new event, assigning the next id.
  fn add_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<EventRecord, Self::Error>> + Send + '_;

  /// Retrieve an event by id. Returns `None` if not found.
  fn get_event(
    &self,
    id: EventId,
  ) -> impl Future<Output = Result<Option<EventRecord>, Self::Error>> + Send + '_;

  /// All events with `date > now`, ordered by date then id.
  fn get_upcoming_events(
    &self,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<EventRecord>, Self::Error>> + Send + '_;

  /// Remove an event from the catalog. Interactions referencing it are kept.
  /// Returns `false` if the event did not exist.
  fn delete_event(
    &self,
    id: EventId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Interactions ──────────────────────────────────────────────────────

  /// Append an interaction. Fails if the user does not exist.
  fn record_interaction(
    &self,
    input: NewInteraction,
  ) -> impl Future<Output = Result<InteractionRecord, Self::Error>> + Send + '_;

  /// Every interaction of `user_id` joined with its event, newest first.
  fn get_user_history(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Vec<HistoryEntry>, Self::Error>> + Send + '_;

  /// Number of interactions recorded against `event_id` across all users.
  fn get_interaction_count(
    &self,
    event_id: EventId,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Interaction counts for several events in one lookup. Every requested id
  /// is present in the result; events nobody touched map to `0`.
  fn get_interaction_counts<'a>(
    &'a self,
    event_ids: &'a [EventId],
  ) -> impl Future<Output = Result<HashMap<EventId, u64>, Self::Error>> + Send + 'a;

  // ── Users ─────────────────────────────────────────────────────────────

  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// `true` when the store holds neither users nor events.
  fn is_empty(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Replace the user's stated preferences. Returns `None` if the user does
  /// not exist.
  fn update_user_preferences(
    &self,
    id: UserId,
    preferences: ExplicitPreferences,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;
}
