//! Interaction records: a user's timestamped touch on an event.
//!
//! Interactions are appended by the reaction subsystem and are never
//! updated. They are the only behavioural signal the recommender sees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::{
  Error, Result,
  event::EventRecord,
  id::{EventId, InteractionId, UserId},
};

// ─── ReactionType ────────────────────────────────────────────────────────────

/// The reaction attached to an interaction.
///
/// Only `love` and `like` carry meaning for ranking; every other tag the
/// reaction subsystem emits (`clap`, `wow`, `bookmark`, ...) is kept verbatim
/// in [`ReactionType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(from = "String", into = "String")]
pub enum ReactionType {
  Love,
  Like,
  #[strum(default)]
  Other(String),
}

impl ReactionType {
  /// Map a raw tag to its reaction; unknown tags become [`Self::Other`].
  pub fn from_tag(tag: &str) -> Self {
    tag.parse().unwrap_or_else(|_| Self::Other(tag.to_owned()))
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Love => "love",
      Self::Like => "like",
      Self::Other(tag) => tag,
    }
  }
}

impl From<String> for ReactionType {
  fn from(s: String) -> Self { Self::from_tag(&s) }
}

impl From<ReactionType> for String {
  fn from(r: ReactionType) -> Self {
    match r {
      ReactionType::Other(tag) => tag,
      known => known.as_str().to_owned(),
    }
  }
}

// ─── InteractionRecord ───────────────────────────────────────────────────────

/// One user's historical touch on one event. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
  pub id:            InteractionId,
  pub user_id:       UserId,
  pub event_id:      EventId,
  pub reaction_type: ReactionType,
  /// Server-assigned; drives recency decay.
  pub occurred_at:   DateTime<Utc>,
}

/// Input to [`crate::store::CatalogStore::record_interaction`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInteraction {
  pub user_id:       UserId,
  pub event_id:      EventId,
  pub reaction_type: ReactionType,
  /// Defaults to the store's clock when absent.
  #[serde(default)]
  pub occurred_at:   Option<DateTime<Utc>>,
}

impl NewInteraction {
  pub fn new(user_id: UserId, event_id: EventId, reaction_type: &str) -> Self {
    Self {
      user_id,
      event_id,
      reaction_type: ReactionType::from_tag(reaction_type),
      occurred_at: None,
    }
  }

  pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
    self.occurred_at = Some(occurred_at);
    self
  }

  /// Reject interactions stamped after `now`; history only moves forward.
  pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
    match self.occurred_at {
      Some(at) if at > now => Err(Error::InvalidInteraction(format!(
        "occurredAt {} is in the future",
        at.to_rfc3339()
      ))),
      _ => Ok(()),
    }
  }
}

// ─── HistoryEntry ────────────────────────────────────────────────────────────

/// An interaction pre-joined with the event it references.
///
/// `event` is `None` when the catalog no longer holds the referenced event;
/// consumers skip such rows rather than fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
  pub interaction: InteractionRecord,
  pub event:       Option<EventRecord>,
}
