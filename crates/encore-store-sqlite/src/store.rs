//! [`SqliteStore`]: the SQLite implementation of [`CatalogStore`].

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;

use encore_core::{
  event::{EventRecord, NewEvent},
  id::{EventId, InteractionId, UserId},
  interaction::{HistoryEntry, InteractionRecord, NewInteraction},
  store::CatalogStore,
  user::{ExplicitPreferences, NewUser, User},
};

use crate::{
  Error, Result,
  encode::{
    EVENT_COLUMNS, RawEvent, RawHistoryRow, RawInteraction, RawUser, encode_dt,
    encode_preferences, encode_tags,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Encore catalog store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Timestamps are persisted at millisecond precision; truncate up front so
/// the returned record matches what a later read yields.
fn to_stored_precision(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(3) }

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
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

  /// Check whether a user and an event exist, in one round trip.
  async fn existence_check(
    &self,
    user_id: UserId,
    event_id: EventId,
  ) -> Result<(bool, bool)> {
    let (uid, eid) = (user_id.get(), event_id.get());
    let found = self
      .conn
      .call(move |conn| {
        let user = conn
          .query_row("SELECT 1 FROM users WHERE id = ?1", [uid], |_| Ok(true))
          .optional()?
          .unwrap_or(false);
        let event = conn
          .query_row("SELECT 1 FROM events WHERE id = ?1", [eid], |_| Ok(true))
          .optional()?
          .unwrap_or(false);
        Ok((user, event))
      })
      .await?;
    Ok(found)
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Events ────────────────────────────────────────────────────────────────

  async fn add_event(&self, mut input: NewEvent) -> Result<EventRecord> {
    input.validate()?;
    input.date = to_stored_precision(input.date);

    let title       = input.title.clone();
    let genre       = input.genre.clone();
    let event_type  = input.event_type.clone();
    let artist      = input.artist.clone();
    let environment = input.environment.clone();
    let tags_str    = encode_tags(&input.tags)?;
    let date_str    = encode_dt(input.date);
    let duration    = i64::from(input.duration);
    let is_live     = input.is_live;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (
             title, genre, event_type, artist, environment,
             tags, date, duration, is_live
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            title,
            genre,
            event_type,
            artist,
            environment,
            tags_str,
            date_str,
            duration,
            is_live,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(input.into_record(EventId(id)))
  }

  async fn get_event(&self, id: EventId) -> Result<Option<EventRecord>> {
    let id_val = id.get();

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
            [id_val],
            |row| RawEvent::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn get_upcoming_events(&self, now: DateTime<Utc>) -> Result<Vec<EventRecord>> {
    let now_str = encode_dt(now);

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EVENT_COLUMNS} FROM events
           WHERE date > ?1
           ORDER BY date ASC, id ASC"
        ))?;
        let rows = stmt
          .query_map([now_str], |row| RawEvent::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn delete_event(&self, id: EventId) -> Result<bool> {
    let id_val = id.get();
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM events WHERE id = ?1", [id_val])?))
      .await?;
    Ok(removed > 0)
  }

  // ── Interactions ──────────────────────────────────────────────────────────

  async fn record_interaction(&self, input: NewInteraction) -> Result<InteractionRecord> {
    input.validate(Utc::now())?;

    let (user_exists, event_exists) =
      self.existence_check(input.user_id, input.event_id).await?;
    if !user_exists {
      return Err(Error::UserNotFound(input.user_id));
    }
    if !event_exists {
      return Err(Error::EventNotFound(input.event_id));
    }

    let occurred_at  = to_stored_precision(input.occurred_at.unwrap_or_else(Utc::now));
    let user_id      = input.user_id.get();
    let event_id     = input.event_id.get();
    let reaction_str = input.reaction_type.as_str().to_owned();
    let at_str       = encode_dt(occurred_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO interactions (user_id, event_id, reaction_type, occurred_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![user_id, event_id, reaction_str, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(InteractionRecord {
      id: InteractionId(id),
      user_id: input.user_id,
      event_id: input.event_id,
      reaction_type: input.reaction_type,
      occurred_at,
    })
  }

  async fn get_user_history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>> {
    let uid = user_id.get();

    let raws: Vec<RawHistoryRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             i.id, i.user_id, i.event_id, i.reaction_type, i.occurred_at,
             e.id, e.title, e.genre, e.event_type, e.artist, e.environment,
             e.tags, e.date, e.duration, e.is_live
           FROM interactions i
           LEFT JOIN events e ON e.id = i.event_id
           WHERE i.user_id = ?1
           ORDER BY i.occurred_at DESC, i.id DESC",
        )?;

        let rows = stmt
          .query_map([uid], |row| {
            Ok(RawHistoryRow {
              interaction: RawInteraction::from_row(row)?,
              event:       RawEvent::from_joined_row(row, 5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistoryRow::into_entry).collect()
  }

  async fn get_interaction_count(&self, event_id: EventId) -> Result<u64> {
    let eid = event_id.get();
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM interactions WHERE event_id = ?1",
          [eid],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(u64::try_from(count).unwrap_or(0))
  }

  async fn get_interaction_counts<'a>(
    &'a self,
    event_ids: &'a [EventId],
  ) -> Result<HashMap<EventId, u64>> {
    let mut counts: HashMap<EventId, u64> = event_ids.iter().map(|&id| (id, 0)).collect();
    if event_ids.is_empty() {
      return Ok(counts);
    }

    let ids: Vec<i64> = event_ids.iter().map(|id| id.get()).collect();
    let rows: Vec<(i64, i64)> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
          "SELECT event_id, COUNT(*) FROM interactions
           WHERE event_id IN ({placeholders})
           GROUP BY event_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(ids), |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    for (event_id, count) in rows {
      counts.insert(EventId(event_id), u64::try_from(count).unwrap_or(0));
    }
    Ok(counts)
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let created_at = to_stored_precision(Utc::now());
    let prefs_str  = input
      .explicit_preferences
      .as_ref()
      .map(encode_preferences)
      .transpose()?;
    let username     = input.username.clone();
    let display_name = input.display_name.clone();
    let at_str       = encode_dt(created_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (username, display_name, preferences_json, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![username, display_name, prefs_str, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(User {
      id: UserId(id),
      username: input.username,
      display_name: input.display_name,
      explicit_preferences: input.explicit_preferences,
      created_at,
    })
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let id_val = id.get();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, username, display_name, preferences_json, created_at
             FROM users WHERE id = ?1",
            [id_val],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn is_empty(&self) -> Result<bool> {
    let empty = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT NOT EXISTS (SELECT 1 FROM users)
              AND NOT EXISTS (SELECT 1 FROM events)",
          [],
          |r| r.get::<_, bool>(0),
        )?)
      })
      .await?;
    Ok(empty)
  }

  async fn update_user_preferences(
    &self,
    id:          UserId,
    preferences: ExplicitPreferences,
  ) -> Result<Option<User>> {
    let prefs_str = encode_preferences(&preferences)?;
    let id_val    = id.get();

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET preferences_json = ?1 WHERE id = ?2",
          rusqlite::params![prefs_str, id_val],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.get_user(id).await
  }
}
