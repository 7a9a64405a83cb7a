//! The closed set of match statuses.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Where a match sits on its timeline.
///
/// Variants are declared in temporal order, so `Ord` follows the natural
/// `Scheduled < Live < Finished` progression. Nothing enforces that a match
/// only moves forward; status is recomputed from its timestamps every time.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchStatus {
  Scheduled,
  Live,
  Finished,
}

impl MatchStatus {
  /// Parse the lowercase text form stored in the database.
  pub fn from_text(s: &str) -> crate::Result<Self> {
    s.parse()
      .map_err(|_| crate::Error::UnknownStatus(s.to_owned()))
  }

  pub fn as_str(&self) -> &str { self.as_ref() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn text_form_is_lowercase() {
    assert_eq!(MatchStatus::Scheduled.to_string(), "scheduled");
    assert_eq!(MatchStatus::Live.as_str(), "live");
    assert_eq!(
      serde_json::to_string(&MatchStatus::Finished).unwrap(),
      "\"finished\""
    );
  }

  #[test]
  fn unknown_text_is_rejected() {
    assert_eq!(MatchStatus::from_text("live").unwrap(), MatchStatus::Live);
    assert!(matches!(
      MatchStatus::from_text("postponed"),
      Err(crate::Error::UnknownStatus(s)) if s == "postponed"
    ));
  }

  #[test]
  fn ordering_is_temporal() {
    assert!(MatchStatus::Scheduled < MatchStatus::Live);
    assert!(MatchStatus::Live < MatchStatus::Finished);
  }
}
