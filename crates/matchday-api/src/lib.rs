//! JSON REST API and WebSocket feed for matchday.
//!
//! Exposes an axum [`Router`] backed by any [`matchday_core::store::MatchStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(matchday_api::api_router(AppState::new(store, MatchFeed::new(64))))
//! ```

pub mod error;
pub mod feed;
pub mod matches;
pub mod ws;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use matchday_core::store::MatchStore;

pub use error::ApiError;
pub use feed::{FeedEvent, MatchFeed};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub feed:  MatchFeed,
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>, feed: MatchFeed) -> Self { Self { store, feed } }
}

// Manual impl: cloning the state never requires cloning the store itself.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      feed:  self.feed.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested or merged into any parent router
/// regardless of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: MatchStore + 'static,
{
  Router::new()
    .route("/matches", get(matches::list::<S>).post(matches::create::<S>))
    .route("/matches/{id}", get(matches::get_one::<S>))
    .route("/matches/{id}/sync", post(matches::sync_one::<S>))
    .route("/ws", get(ws::handler::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
