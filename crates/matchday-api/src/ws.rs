//! Handler for `GET /ws`: upgrade to a WebSocket and stream the match feed.
//!
//! The connection is push-only. Inbound frames are read solely to notice when
//! the client goes away.

use axum::{
  extract::{
    State,
    ws::{Message, WebSocket, WebSocketUpgrade},
  },
  response::IntoResponse,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use matchday_core::store::MatchStore;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::{
  AppState,
  feed::{FeedEvent, MatchFeed},
};

/// `GET /ws`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  ws: WebSocketUpgrade,
) -> impl IntoResponse
where
  S: MatchStore + 'static,
{
  // Subscribe before the upgrade so nothing published in between is lost.
  let receiver = state.feed.subscribe();
  let feed = state.feed.clone();
  ws.on_upgrade(move |socket: WebSocket| {
    let (sink, inbound) = socket.split();
    stream_feed(sink, inbound, receiver, feed)
  })
}

/// Send the welcome message, then forward feed events to `sink` until the
/// client closes `inbound` or stops accepting frames.
async fn stream_feed<T, R, E>(
  mut sink: T,
  mut inbound: R,
  mut receiver: broadcast::Receiver<FeedEvent>,
  feed: MatchFeed,
) where
  T: Sink<Message> + Unpin,
  R: Stream<Item = Result<Message, E>> + Unpin,
{
  info!(subscribers = feed.subscriber_count(), "feed client connected");

  if send_event(&mut sink, &FeedEvent::Welcome).await.is_err() {
    return;
  }

  loop {
    tokio::select! {
      received = receiver.recv() => match received {
        Ok(event) => {
          if send_event(&mut sink, &event).await.is_err() {
            break;
          }
        }
        Err(RecvError::Lagged(skipped)) => {
          // Keep the client connected; it just misses some events.
          warn!(skipped, "feed client lagging");
        }
        Err(RecvError::Closed) => break,
      },
      frame = inbound.next() => match frame {
        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
        Some(Ok(_)) => {}
      },
    }
  }

  info!("feed client disconnected");
}

async fn send_event<T>(sink: &mut T, event: &FeedEvent) -> Result<(), ()>
where
  T: Sink<Message> + Unpin,
{
  let text = match serde_json::to_string(event) {
    Ok(text) => text,
    Err(e) => {
      warn!(error = %e, "failed to serialise feed event");
      return Ok(());
    }
  };
  sink.send(Message::Text(text.into())).await.map_err(|_| {
    debug!("feed client went away mid-send");
  })
}

#[cfg(test)]
mod tests {
  use std::convert::Infallible;

  use chrono::{TimeZone, Utc};
  use futures::channel::mpsc;
  use matchday_core::{Match, MatchStatus};
  use serde_json::{Value, json};
  use uuid::Uuid;

  use super::*;

  fn sample(home_team: &str) -> Match {
    Match {
      match_id:   Uuid::nil(),
      sport:      "football".into(),
      home_team:  home_team.into(),
      away_team:  "Away".into(),
      start_time: "2024-01-01T00:00:00Z".into(),
      end_time:   None,
      home_score: 0,
      away_score: 0,
      status:     MatchStatus::Live,
      version:    0,
      created_at: Utc.timestamp_opt(0, 0).unwrap(),
    }
  }

  fn decode(message: Message) -> Value {
    match message {
      Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
      other => panic!("expected a text frame, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn welcome_then_events_are_forwarded() {
    let feed = MatchFeed::new(8);
    let receiver = feed.subscribe();
    let (out_tx, mut out_rx) = mpsc::unbounded::<Message>();
    let (in_tx, in_rx) = mpsc::unbounded::<Result<Message, Infallible>>();

    let task = tokio::spawn(stream_feed(out_tx, in_rx, receiver, feed.clone()));

    let welcome = decode(out_rx.next().await.unwrap());
    assert_eq!(welcome, json!({ "type": "welcome" }));

    feed.publish(FeedEvent::MatchCreated(sample("Arsenal")));
    let created = decode(out_rx.next().await.unwrap());
    assert_eq!(created["type"], "match_created");
    assert_eq!(created["data"]["homeTeam"], "Arsenal");

    drop(in_tx);
    task.await.unwrap();
    assert!(out_rx.next().await.is_none());
  }

  #[tokio::test]
  async fn lagging_client_stays_connected() {
    let feed = MatchFeed::new(1);
    let receiver = feed.subscribe();
    for team in ["A", "B", "C"] {
      feed.publish(FeedEvent::MatchUpdated(sample(team)));
    }

    let (out_tx, mut out_rx) = mpsc::unbounded::<Message>();
    let (in_tx, in_rx) = mpsc::unbounded::<Result<Message, Infallible>>();
    let task = tokio::spawn(stream_feed(out_tx, in_rx, receiver, feed.clone()));

    assert_eq!(decode(out_rx.next().await.unwrap())["type"], "welcome");
    // The two oldest events were overwritten; the newest still arrives.
    let latest = decode(out_rx.next().await.unwrap());
    assert_eq!(latest["data"]["homeTeam"], "C");

    feed.publish(FeedEvent::MatchUpdated(sample("D")));
    assert_eq!(decode(out_rx.next().await.unwrap())["data"]["homeTeam"], "D");

    in_tx.unbounded_send(Ok(Message::Close(None))).unwrap();
    task.await.unwrap();
  }

  #[tokio::test]
  async fn closed_sink_ends_the_stream() {
    let feed = MatchFeed::new(4);
    let receiver = feed.subscribe();
    let (out_tx, out_rx) = mpsc::unbounded::<Message>();
    let (_in_tx, in_rx) = mpsc::unbounded::<Result<Message, Infallible>>();
    drop(out_rx);

    stream_feed(out_tx, in_rx, receiver, feed).await;
  }
}
