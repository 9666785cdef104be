//! Event records: the read-only catalog snapshot the recommender works over.

use std::collections::BTreeSet;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, id::EventId};

// ─── EventRecord ─────────────────────────────────────────────────────────────

/// A schedulable event (concert, exhibition, ...) as published by the catalog.
///
/// Serves both as similarity input and as recommendation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
  pub id:          EventId,
  pub title:       String,
  pub genre:       String,
  /// Event format, e.g. `"concert"` or `"exhibition"`.
  #[serde(rename = "type")]
  pub event_type:  String,
  pub artist:      String,
  /// Venue kind, e.g. `"stadium"` or `"gallery"`.
  pub environment: String,
  pub tags:        BTreeSet<String>,
  pub date:        DateTime<Utc>,
  /// Length in minutes; always positive.
  pub duration:    u32,
  pub is_live:     bool,
}

impl EventRecord {
  /// Hour of day (UTC, 0–23) at which the event starts.
  pub fn hour(&self) -> u32 { self.date.hour() }
}

// ─── NewEvent ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::CatalogStore::add_event`]. The id is assigned by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
  pub title:       String,
  pub genre:       String,
  #[serde(rename = "type")]
  pub event_type:  String,
  pub artist:      String,
  pub environment: String,
  #[serde(default)]
  pub tags:        BTreeSet<String>,
  pub date:        DateTime<Utc>,
  pub duration:    u32,
  #[serde(default)]
  pub is_live:     bool,
}

impl NewEvent {
  /// Reject records that would break scoring invariants.
  pub fn validate(&self) -> Result<()> {
    if self.duration == 0 {
      return Err(Error::InvalidEvent(format!(
        "{:?}: duration must be positive",
        self.title
      )));
    }
    Ok(())
  }

  /// Attach a store-assigned id.
  pub fn into_record(self, id: EventId) -> EventRecord {
    EventRecord {
      id,
      title: self.title,
      genre: self.genre,
      event_type: self.event_type,
      artist: self.artist,
      environment: self.environment,
      tags: self.tags,
      date: self.date,
      duration: self.duration,
      is_live: self.is_live,
    }
  }
}
