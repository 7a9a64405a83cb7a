//! The match record: the snapshot the persistence layer owns and hands out.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, derive::parse_instant, status::MatchStatus};

/// A stored match.
///
/// `start_time` and `end_time` are kept as text: rows written by other tools
/// may carry timestamps that do not parse, and derivation has to cope with
/// that rather than refuse to load the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
  #[serde(rename = "id")]
  pub match_id:   Uuid,
  pub sport:      String,
  pub home_team:  String,
  pub away_team:  String,
  pub start_time: String,
  pub end_time:   Option<String>,
  pub home_score: i32,
  pub away_score: i32,
  /// Cache of the last persisted derivation, not a source of truth.
  pub status:     MatchStatus,
  /// Number of persisted status changes; used as an optimistic-concurrency
  /// token by status writes.
  pub version:    i64,
  pub created_at: DateTime<Utc>,
}

impl Match {
  /// The record as it looks after `status` has been durably written.
  pub fn with_status(&self, status: MatchStatus) -> Self {
    Self {
      status,
      version: self.version + 1,
      ..self.clone()
    }
  }
}

/// Input to [`crate::store::MatchStore::create_match`].
/// `match_id`, `version` and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
  pub sport:      String,
  pub home_team:  String,
  pub away_team:  String,
  pub start_time: String,
  pub end_time:   Option<String>,
  pub home_score: i32,
  pub away_score: i32,
  pub status:     MatchStatus,
}

impl NewMatch {
  /// Convenience constructor: no end time, zero scores, `Scheduled`.
  pub fn new(
    sport: impl Into<String>,
    home_team: impl Into<String>,
    away_team: impl Into<String>,
    start_time: impl Into<String>,
  ) -> Self {
    Self {
      sport:      sport.into(),
      home_team:  home_team.into(),
      away_team:  away_team.into(),
      start_time: start_time.into(),
      end_time:   None,
      home_score: 0,
      away_score: 0,
      status:     MatchStatus::Scheduled,
    }
  }

  /// Check caller-supplied fields and normalise both timestamps to RFC 3339
  /// UTC. Names are trimmed.
  ///
  /// Returns the parsed `(start, end)` instants alongside the cleaned input so
  /// callers can derive an initial status without parsing again.
  pub fn validated(
    mut self,
  ) -> Result<(Self, DateTime<Utc>, Option<DateTime<Utc>>)> {
    self.sport = non_empty("sport", self.sport)?;
    self.home_team = non_empty("homeTeam", self.home_team)?;
    self.away_team = non_empty("awayTeam", self.away_team)?;

    let start = parse_instant(&self.start_time).ok_or_else(|| {
      Error::InvalidTimestamp {
        field: "startTime",
        value: self.start_time.clone(),
      }
    })?;

    let end = match self.end_time.as_deref() {
      None => None,
      Some(text) => {
        let end = parse_instant(text).ok_or_else(|| Error::InvalidTimestamp {
          field: "endTime",
          value: text.to_owned(),
        })?;
        if end <= start {
          return Err(Error::EndBeforeStart {
            start: encode_instant(start),
            end:   encode_instant(end),
          });
        }
        Some(end)
      }
    };

    if self.home_score < 0 {
      return Err(Error::NegativeScore { field: "homeScore", value: self.home_score });
    }
    if self.away_score < 0 {
      return Err(Error::NegativeScore { field: "awayScore", value: self.away_score });
    }

    self.start_time = encode_instant(start);
    self.end_time = end.map(encode_instant);
    Ok((self, start, end))
  }
}

/// The canonical text form for stored timestamps. Sub-second precision is
/// kept so the stored text orders exactly like the validated instants.
pub fn encode_instant(instant: DateTime<Utc>) -> String {
  instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn non_empty(field: &'static str, value: String) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::EmptyField { field });
  }
  Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input() -> NewMatch {
    NewMatch::new("football", " Arsenal ", "Chelsea", "2024-01-01T01:00:00+01:00")
  }

  #[test]
  fn validated_normalises_timestamps_and_names() {
    let mut new = input();
    new.end_time = Some("2024-01-01 02:00".into());

    let (clean, start, end) = new.validated().unwrap();
    assert_eq!(clean.home_team, "Arsenal");
    assert_eq!(clean.start_time, "2024-01-01T00:00:00Z");
    assert_eq!(clean.end_time.as_deref(), Some("2024-01-01T02:00:00Z"));
    assert_eq!(end.map(|e| e - start), Some(chrono::Duration::hours(2)));
  }

  #[test]
  fn validated_rejects_bad_input() {
    let mut bad_start = input();
    bad_start.start_time = "soon".into();
    assert!(matches!(
      bad_start.validated(),
      Err(Error::InvalidTimestamp { field: "startTime", .. })
    ));

    let mut bad_end = input();
    bad_end.end_time = Some("later".into());
    assert!(matches!(
      bad_end.validated(),
      Err(Error::InvalidTimestamp { field: "endTime", .. })
    ));

    let mut backwards = input();
    backwards.end_time = Some("2023-12-31T00:00:00Z".into());
    assert!(matches!(backwards.validated(), Err(Error::EndBeforeStart { .. })));

    let mut blank = input();
    blank.sport = "  ".into();
    assert!(matches!(blank.validated(), Err(Error::EmptyField { field: "sport" })));

    let mut negative = input();
    negative.away_score = -1;
    assert!(matches!(
      negative.validated(),
      Err(Error::NegativeScore { field: "awayScore", value: -1 })
    ));
  }

  #[test]
  fn validated_keeps_sub_second_precision() {
    let mut new = input();
    new.start_time = "2024-01-01T00:00:00.200Z".into();
    new.end_time = Some("2024-01-01T00:00:00.800Z".into());

    let (clean, start, end) = new.validated().unwrap();
    assert_eq!(clean.start_time, "2024-01-01T00:00:00.200Z");
    assert_eq!(clean.end_time.as_deref(), Some("2024-01-01T00:00:00.800Z"));

    // The stored text derives the same status as the validated instants.
    let reference = parse_instant("2024-01-01T00:00:00.100Z").unwrap();
    let stored = crate::derive::derive_status(
      &clean.start_time,
      clean.end_time.as_deref(),
      reference,
    );
    assert_eq!(stored, Some(crate::derive::derive_status_at_instants(start, end, reference)));
    assert_eq!(stored, Some(MatchStatus::Scheduled));
  }

  fn record() -> Match {
    Match {
      match_id:   Uuid::nil(),
      sport:      "tennis".into(),
      home_team:  "A".into(),
      away_team:  "B".into(),
      start_time: "2024-01-01T00:00:00Z".into(),
      end_time:   None,
      home_score: 0,
      away_score: 0,
      status:     MatchStatus::Scheduled,
      version:    3,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn with_status_bumps_version_only() {
    let record = record();

    let next = record.with_status(MatchStatus::Live);
    assert_eq!(next.status, MatchStatus::Live);
    assert_eq!(next.version, 4);
    assert_eq!(next.match_id, record.match_id);
    assert_eq!(record.status, MatchStatus::Scheduled);
  }

  #[test]
  fn serialises_with_camel_case_keys() {
    let json = serde_json::to_value(record()).unwrap();
    assert_eq!(json["id"], Uuid::nil().to_string());
    assert_eq!(json["homeTeam"], "A");
    assert_eq!(json["startTime"], "2024-01-01T00:00:00Z");
    assert!(json["endTime"].is_null());
    assert_eq!(json["status"], "scheduled");
  }
}
