//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (millisecond
//! precision, `Z` suffix) so that lexicographic order equals time order and
//! `date > ?` comparisons work in SQL. Tags and preferences are stored as
//! compact JSON.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use encore_core::{
  event::EventRecord,
  id::{EventId, InteractionId, UserId},
  interaction::{HistoryEntry, InteractionRecord, ReactionType},
  user::{ExplicitPreferences, User},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &BTreeSet<String>) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<BTreeSet<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── ExplicitPreferences ─────────────────────────────────────────────────────

pub fn encode_preferences(p: &ExplicitPreferences) -> Result<String> {
  Ok(serde_json::to_string(p)?)
}

pub fn decode_preferences(s: &str) -> Result<ExplicitPreferences> {
  Ok(serde_json::from_str(s)?)
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// Column list shared by every query that materialises an event.
pub const EVENT_COLUMNS: &str =
  "id, title, genre, event_type, artist, environment, tags, date, duration, is_live";

/// Raw row from the `events` table.
pub struct RawEvent {
  pub id:          i64,
  pub title:       String,
  pub genre:       String,
  pub event_type:  String,
  pub artist:      String,
  pub environment: String,
  pub tags:        String,
  pub date:        String,
  pub duration:    i64,
  pub is_live:     bool,
}

impl RawEvent {
  /// Read the ten event columns starting at `offset`.
  pub fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(offset)?,
      title:       row.get(offset + 1)?,
      genre:       row.get(offset + 2)?,
      event_type:  row.get(offset + 3)?,
      artist:      row.get(offset + 4)?,
      environment: row.get(offset + 5)?,
      tags:        row.get(offset + 6)?,
      date:        row.get(offset + 7)?,
      duration:    row.get(offset + 8)?,
      is_live:     row.get(offset + 9)?,
    })
  }

  /// Like [`RawEvent::from_row`], for the nullable side of a `LEFT JOIN`.
  pub fn from_joined_row(
    row: &rusqlite::Row<'_>,
    offset: usize,
  ) -> rusqlite::Result<Option<Self>> {
    let id: Option<i64> = row.get(offset)?;
    match id {
      Some(_) => Self::from_row(row, offset).map(Some),
      None => Ok(None),
    }
  }

  pub fn into_event(self) -> Result<EventRecord> {
    let duration = u32::try_from(self.duration)
      .map_err(|_| Error::Decode(format!("event {}: bad duration {}", self.id, self.duration)))?;
    Ok(EventRecord {
      id: EventId(self.id),
      title: self.title,
      genre: self.genre,
      event_type: self.event_type,
      artist: self.artist,
      environment: self.environment,
      tags: decode_tags(&self.tags)?,
      date: decode_dt(&self.date)?,
      duration,
      is_live: self.is_live,
    })
  }
}

/// Raw row from the `users` table.
pub struct RawUser {
  pub id:               i64,
  pub username:         String,
  pub display_name:     Option<String>,
  pub preferences_json: Option<String>,
  pub created_at:       String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      username:         row.get(1)?,
      display_name:     row.get(2)?,
      preferences_json: row.get(3)?,
      created_at:       row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:                   UserId(self.id),
      username:             self.username,
      display_name:         self.display_name,
      explicit_preferences: self
        .preferences_json
        .as_deref()
        .map(decode_preferences)
        .transpose()?,
      created_at:           decode_dt(&self.created_at)?,
    })
  }
}

/// Raw row from the `interactions` table.
pub struct RawInteraction {
  pub id:            i64,
  pub user_id:       i64,
  pub event_id:      i64,
  pub reaction_type: String,
  pub occurred_at:   String,
}

impl RawInteraction {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      user_id:       row.get(1)?,
      event_id:      row.get(2)?,
      reaction_type: row.get(3)?,
      occurred_at:   row.get(4)?,
    })
  }

  pub fn into_interaction(self) -> Result<InteractionRecord> {
    Ok(InteractionRecord {
      id:            InteractionId(self.id),
      user_id:       UserId(self.user_id),
      event_id:      EventId(self.event_id),
      reaction_type: ReactionType::from(self.reaction_type),
      occurred_at:   decode_dt(&self.occurred_at)?,
    })
  }
}

/// An interaction row `LEFT JOIN`ed with its event.
pub struct RawHistoryRow {
  pub interaction: RawInteraction,
  pub event:       Option<RawEvent>,
}

impl RawHistoryRow {
  pub fn into_entry(self) -> Result<HistoryEntry> {
    Ok(HistoryEntry {
      interaction: self.interaction.into_interaction()?,
      event:       self.event.map(RawEvent::into_event).transpose()?,
    })
  }
}
