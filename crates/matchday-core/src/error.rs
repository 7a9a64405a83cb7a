//! Error types for `matchday-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown match status: {0:?}")]
  UnknownStatus(String),

  #[error("{field} must not be empty")]
  EmptyField { field: &'static str },

  #[error("{field} is not a valid timestamp: {value:?}")]
  InvalidTimestamp { field: &'static str, value: String },

  #[error("endTime {end} must be after startTime {start}")]
  EndBeforeStart { start: String, end: String },

  #[error("{field} must not be negative (got {value})")]
  NegativeScore { field: &'static str, value: i32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
