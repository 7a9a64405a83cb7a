//! Status derivation: a pure function of a match's timestamps and a
//! reference instant.
//!
//! The start boundary is exclusive for `Scheduled` and the end boundary is
//! inclusive for `Finished`: at exactly `start` a match is already live, and
//! at exactly `end` it is already finished.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::status::MatchStatus;

/// ISO 8601 layouts with an explicit offset that RFC 3339 does not cover:
/// minutes-only times and offsets written without a colon. `%#z` also takes
/// `Z` and hour-only offsets.
const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M%#z",
  "%Y-%m-%dT%H:%M%:z",
  "%Y-%m-%dT%H:%M:%S%.f%#z",
  "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Offset-less layouts accepted after the offset forms; all are read as UTC.
/// `%.f` makes the fractional part optional.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M",
];

/// Parse timestamp text into an absolute UTC instant.
///
/// Accepts RFC 3339 and the other ISO 8601 date-times carrying an offset
/// (`2024-01-01T00:00Z`, `+0000`), naive date-times (taken as UTC) and bare
/// `YYYY-MM-DD` dates (midnight UTC). Returns `None` for anything else,
/// including empty or whitespace-only input.
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
  let text = text.trim();
  if text.is_empty() {
    return None;
  }

  if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
    return Some(dt.with_timezone(&Utc));
  }

  for format in OFFSET_DATE_TIME_FORMATS {
    if let Ok(dt) = DateTime::parse_from_str(text, format) {
      return Some(dt.with_timezone(&Utc));
    }
  }

  for format in NAIVE_DATE_TIME_FORMATS {
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
      return Some(naive.and_utc());
    }
  }

  NaiveDate::parse_from_str(text, "%Y-%m-%d")
    .ok()
    .and_then(|date| date.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
}

/// Derive the status from already-parsed instants.
pub fn derive_status_at_instants(
  start: DateTime<Utc>,
  end: Option<DateTime<Utc>>,
  reference: DateTime<Utc>,
) -> MatchStatus {
  if reference < start {
    return MatchStatus::Scheduled;
  }

  match end {
    Some(end) if reference >= end => MatchStatus::Finished,
    _ => MatchStatus::Live,
  }
}

/// Derive the status of a match at `reference`.
///
/// Returns `None` when `start` cannot be parsed: the status is indeterminate
/// and the caller decides what to do with that. An `end` that is absent or
/// unparseable makes the match open-ended, so it can never be `Finished`.
pub fn derive_status(
  start: &str,
  end: Option<&str>,
  reference: DateTime<Utc>,
) -> Option<MatchStatus> {
  let start = parse_instant(start)?;
  let end = end.and_then(parse_instant);
  Some(derive_status_at_instants(start, end, reference))
}

/// [`derive_status`] against the wall clock.
pub fn derive_status_now(start: &str, end: Option<&str>) -> Option<MatchStatus> {
  derive_status(start, end, Utc::now())
}
