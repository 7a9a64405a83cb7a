//! Error type for `matchday-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] matchday_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("match not found: {0}")]
  MatchNotFound(uuid::Uuid),

  /// The row's version moved on since the caller read it.
  #[error("match {match_id} changed concurrently (expected version {expected})")]
  VersionConflict {
    match_id: uuid::Uuid,
    expected: i64,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl matchday_core::store::StoreError for Error {
  fn is_not_found(&self) -> bool { matches!(self, Self::MatchNotFound(_)) }

  fn is_conflict(&self) -> bool { matches!(self, Self::VersionConflict { .. }) }
}
