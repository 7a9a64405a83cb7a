//! SQL schema for the matchday SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS matches (
    match_id    TEXT PRIMARY KEY,
    sport       TEXT NOT NULL,
    home_team   TEXT NOT NULL,
    away_team   TEXT NOT NULL,
    start_time  TEXT NOT NULL,     -- timestamp text; not guaranteed to parse
    end_time    TEXT,              -- NULL for open-ended matches
    home_score  INTEGER NOT NULL DEFAULT 0,
    away_score  INTEGER NOT NULL DEFAULT 0,
    status      TEXT NOT NULL,     -- 'scheduled' | 'live' | 'finished'
    version     INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,     -- RFC 3339 UTC; server-assigned
    CHECK (status IN ('scheduled', 'live', 'finished'))
);

CREATE INDEX IF NOT EXISTS matches_created_idx ON matches(created_at);

PRAGMA user_version = 1;
";
