//! Handlers for `/matches` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/matches` | Optional `?limit=` (default 50, max 100); newest first |
//! | `POST` | `/matches` | Body: [`CreateBody`]; returns 201 + stored match |
//! | `GET`  | `/matches/{id}` | 404 if not found |
//! | `POST` | `/matches/{id}/sync` | Reconcile stored status with the clock |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use matchday_core::{
  Match, MatchStatus, NewMatch, StoredStatus,
  derive_status_at_instants,
  store::MatchStore,
  sync_status,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, feed::FeedEvent};

pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 100;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /matches[?limit=<n>]`
pub async fn list<S: MatchStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Match>>, ApiError> {
  let limit = params
    .limit
    .unwrap_or(DEFAULT_LIST_LIMIT)
    .clamp(1, MAX_LIST_LIMIT);

  let matches = state
    .store
    .list_matches(limit)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(matches))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /matches`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub sport:      String,
  pub home_team:  String,
  pub away_team:  String,
  pub start_time: String,
  pub end_time:   Option<String>,
  pub home_score: Option<i32>,
  pub away_score: Option<i32>,
}

impl From<CreateBody> for NewMatch {
  fn from(b: CreateBody) -> Self {
    NewMatch {
      sport:      b.sport,
      home_team:  b.home_team,
      away_team:  b.away_team,
      start_time: b.start_time,
      end_time:   b.end_time,
      home_score: b.home_score.unwrap_or(0),
      away_score: b.away_score.unwrap_or(0),
      status:     MatchStatus::Scheduled,
    }
  }
}

/// `POST /matches`: validates the body, derives the initial status from the
/// clock, stores the match and announces it on the feed.
pub async fn create<S: MatchStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let (mut input, start, end) = NewMatch::from(body).validated()?;
  input.status = derive_status_at_instants(start, end, Utc::now());

  let record = state
    .store
    .create_match(input)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(match_id = %record.match_id, status = %record.status, "match created");
  state.feed.publish(FeedEvent::MatchCreated(record.clone()));
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /matches/{id}`
pub async fn get_one<S: MatchStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Match>, ApiError> {
  let record = fetch(&state, id).await?;
  Ok(Json(record))
}

// ─── Sync ─────────────────────────────────────────────────────────────────────

/// Response body for `POST /matches/{id}/sync`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
  pub status:  MatchStatus,
  pub changed: bool,
  #[serde(rename = "match")]
  pub record:  Match,
}

/// `POST /matches/{id}/sync`: derive the status at the current instant and
/// persist it if it differs. A concurrent writer winning the race yields 409.
pub async fn sync_one<S: MatchStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SyncResponse>, ApiError> {
  let record = fetch(&state, id).await?;

  let port = StoredStatus::new(state.store.as_ref(), &record);
  let outcome = sync_status(&record, &port)
    .await
    .map_err(ApiError::from_store)?;

  let changed = outcome.changed();
  let record = outcome.into_record();
  if changed {
    state.feed.publish(FeedEvent::MatchUpdated(record.clone()));
  }

  Ok(Json(SyncResponse {
    status: record.status,
    changed,
    record,
  }))
}

async fn fetch<S: MatchStore>(state: &AppState<S>, id: Uuid) -> Result<Match, ApiError> {
  state
    .store
    .get_match(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("match {id} not found")))
}
