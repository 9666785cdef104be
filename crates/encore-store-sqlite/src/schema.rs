//! SQL schema for the Encore SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    username         TEXT NOT NULL UNIQUE,
    display_name     TEXT,
    preferences_json TEXT,           -- JSON-encoded ExplicitPreferences or NULL
    created_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    genre       TEXT NOT NULL,
    event_type  TEXT NOT NULL,       -- concert, exhibition, theater, ...
    artist      TEXT NOT NULL,
    environment TEXT NOT NULL,       -- stadium, gallery, ...
    tags        TEXT NOT NULL DEFAULT '[]',
    date        TEXT NOT NULL,       -- fixed-width RFC 3339 UTC, sortable
    duration    INTEGER NOT NULL CHECK (duration > 0),
    is_live     INTEGER NOT NULL DEFAULT 0
);

-- Interactions are strictly append-only.
-- event_id has no foreign key: catalog deletions leave dangling history
-- rows, which readers skip.
CREATE TABLE IF NOT EXISTS interactions (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       INTEGER NOT NULL REFERENCES users(id),
    event_id      INTEGER NOT NULL,
    reaction_type TEXT NOT NULL,
    occurred_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS events_date_idx        ON events(date);
CREATE INDEX IF NOT EXISTS interactions_user_idx  ON interactions(user_id);
CREATE INDEX IF NOT EXISTS interactions_event_idx ON interactions(event_id);

PRAGMA user_version = 1;
";
