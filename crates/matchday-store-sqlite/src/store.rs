//! [`SqliteStore`]: the SQLite implementation of [`MatchStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use matchday_core::{Match, MatchStatus, NewMatch, store::MatchStore};
use rusqlite::OptionalExtension as _;
use tracing::warn;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{MATCH_COLUMNS, RawMatch, encode_dt, encode_status, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A matchday store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
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
}

// ─── MatchStore impl ─────────────────────────────────────────────────────────

impl MatchStore for SqliteStore {
  type Error = Error;

  async fn create_match(&self, input: NewMatch) -> Result<Match> {
    let record = Match {
      match_id:   Uuid::new_v4(),
      sport:      input.sport,
      home_team:  input.home_team,
      away_team:  input.away_team,
      start_time: input.start_time,
      end_time:   input.end_time,
      home_score: input.home_score,
      away_score: input.away_score,
      status:     input.status,
      version:    0,
      // Stored with microsecond precision; truncate so reads compare equal.
      created_at: Utc::now().trunc_subsecs(6),
    };

    let id_str     = encode_uuid(record.match_id);
    let status_str = encode_status(record.status);
    let at_str     = encode_dt(record.created_at);
    let sport      = record.sport.clone();
    let home_team  = record.home_team.clone();
    let away_team  = record.away_team.clone();
    let start_time = record.start_time.clone();
    let end_time   = record.end_time.clone();
    let home_score = record.home_score;
    let away_score = record.away_score;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO matches (
             match_id, sport, home_team, away_team, start_time, end_time,
             home_score, away_score, status, version, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10)",
          rusqlite::params![
            id_str,
            sport,
            home_team,
            away_team,
            start_time,
            end_time,
            home_score,
            away_score,
            status_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn get_match(&self, id: Uuid) -> Result<Option<Match>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMatch> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE match_id = ?1"),
            rusqlite::params![id_str],
            RawMatch::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMatch::into_match).transpose()
  }

  async fn list_matches(&self, limit: usize) -> Result<Vec<Match>> {
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawMatch> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MATCH_COLUMNS} FROM matches
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawMatch::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMatch::into_match).collect()
  }

  async fn update_status(
    &self,
    id:               Uuid,
    expected_version: i64,
    status:           MatchStatus,
  ) -> Result<()> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status);

    // (rows written, row exists)
    let (written, exists): (usize, bool) = self
      .conn
      .call(move |conn| {
        let written = conn.execute(
          "UPDATE matches SET status = ?1, version = version + 1
           WHERE match_id = ?2 AND version = ?3",
          rusqlite::params![status_str, id_str, expected_version],
        )?;
        if written > 0 {
          return Ok((written, true));
        }

        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM matches WHERE match_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        Ok((0, exists))
      })
      .await?;

    match (written, exists) {
      (0, false) => Err(Error::MatchNotFound(id)),
      (0, true) => {
        warn!(match_id = %id, expected_version, "stale status write rejected");
        Err(Error::VersionConflict { match_id: id, expected: expected_version })
      }
      _ => Ok(()),
    }
  }
}
