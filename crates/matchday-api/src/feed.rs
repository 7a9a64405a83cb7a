//! The match feed: a broadcast hub fanning match events out to every
//! connected WebSocket client.

use matchday_core::Match;
use serde::Serialize;
use tokio::sync::broadcast;

/// A message pushed to feed subscribers, serialised as
/// `{"type": "...", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum FeedEvent {
  /// Sent once to each new WebSocket client; never broadcast.
  Welcome,
  MatchCreated(Match),
  MatchUpdated(Match),
}

/// Broadcast hub backed by a Tokio broadcast channel.
///
/// Cloning shares the same channel.
#[derive(Clone)]
pub struct MatchFeed {
  sender: broadcast::Sender<FeedEvent>,
}

impl MatchFeed {
  /// Construct a hub that buffers up to `capacity` events per slow
  /// subscriber before it starts lagging.
  pub fn new(capacity: usize) -> Self {
    let (sender, _receiver) = broadcast::channel(capacity.max(1));
    Self { sender }
  }

  /// Register a new subscriber that will receive subsequent events.
  pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> { self.sender.subscribe() }

  /// Send an event to all current subscribers. Having none is not an error.
  pub fn publish(&self, event: FeedEvent) {
    let _ = self.sender.send(event);
  }

  pub fn subscriber_count(&self) -> usize { self.sender.receiver_count() }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use matchday_core::MatchStatus;
  use uuid::Uuid;

  use super::*;

  fn sample() -> Match {
    Match {
      match_id:   Uuid::nil(),
      sport:      "cricket".into(),
      home_team:  "India".into(),
      away_team:  "Australia".into(),
      start_time: "2024-01-01T00:00:00Z".into(),
      end_time:   None,
      home_score: 0,
      away_score: 0,
      status:     MatchStatus::Live,
      version:    1,
      created_at: Utc.timestamp_opt(0, 0).unwrap(),
    }
  }

  #[test]
  fn publish_without_subscribers_is_fine() {
    let feed = MatchFeed::new(4);
    feed.publish(FeedEvent::MatchCreated(sample()));
    assert_eq!(feed.subscriber_count(), 0);
  }

  #[tokio::test]
  async fn every_subscriber_sees_events() {
    let feed = MatchFeed::new(4);
    let mut a = feed.subscribe();
    let mut b = feed.subscribe();

    feed.publish(FeedEvent::MatchUpdated(sample()));

    assert_eq!(a.recv().await.unwrap(), FeedEvent::MatchUpdated(sample()));
    assert!(matches!(b.recv().await.unwrap(), FeedEvent::MatchUpdated(_)));
  }

  #[test]
  fn events_are_tagged() {
    let welcome = serde_json::to_value(FeedEvent::Welcome).unwrap();
    assert_eq!(welcome, serde_json::json!({ "type": "welcome" }));

    let created = serde_json::to_value(FeedEvent::MatchCreated(sample())).unwrap();
    assert_eq!(created["type"], "match_created");
    assert_eq!(created["data"]["homeTeam"], "India");
  }
}
