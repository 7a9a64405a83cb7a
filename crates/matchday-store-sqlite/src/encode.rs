//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! `created_at` is stored as fixed-width RFC 3339 so that text ordering is
//! chronological. UUIDs are stored as hyphenated lowercase strings. Match
//! start and end times are stored exactly as given.

use chrono::{DateTime, SecondsFormat, Utc};
use matchday_core::{Match, MatchStatus};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── MatchStatus ──────────────────────────────────────────────────────────────

pub fn encode_status(status: MatchStatus) -> String { status.as_str().to_owned() }

pub fn decode_status(s: &str) -> Result<MatchStatus> {
  Ok(MatchStatus::from_text(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawMatch::from_row`].
pub const MATCH_COLUMNS: &str = "match_id, sport, home_team, away_team, \
   start_time, end_time, home_score, away_score, status, version, created_at";

/// Raw values read directly from a `matches` row.
pub struct RawMatch {
  pub match_id:   String,
  pub sport:      String,
  pub home_team:  String,
  pub away_team:  String,
  pub start_time: String,
  pub end_time:   Option<String>,
  pub home_score: i32,
  pub away_score: i32,
  pub status:     String,
  pub version:    i64,
  pub created_at: String,
}

impl RawMatch {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      match_id:   row.get(0)?,
      sport:      row.get(1)?,
      home_team:  row.get(2)?,
      away_team:  row.get(3)?,
      start_time: row.get(4)?,
      end_time:   row.get(5)?,
      home_score: row.get(6)?,
      away_score: row.get(7)?,
      status:     row.get(8)?,
      version:    row.get(9)?,
      created_at: row.get(10)?,
    })
  }

  pub fn into_match(self) -> Result<Match> {
    Ok(Match {
      match_id:   decode_uuid(&self.match_id)?,
      sport:      self.sport,
      home_team:  self.home_team,
      away_team:  self.away_team,
      start_time: self.start_time,
      end_time:   self.end_time,
      home_score: self.home_score,
      away_score: self.away_score,
      status:     decode_status(&self.status)?,
      version:    self.version,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
