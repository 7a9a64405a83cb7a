//! Status synchronization: reconcile a stored status with a fresh derivation,
//! writing through a [`StatusPort`] only when the two diverge.
//!
//! The record passed in is never mutated. A successful write produces a new
//! record inside [`SyncOutcome::Updated`]; a failed write returns the port's
//! error and produces nothing, so the caller's copy still shows the status
//! that is actually stored.
//!
//! Two concurrent syncs of the same match can both see the same stale status
//! and both decide to write. Nothing here prevents that; [`StoredStatus`]
//! turns the second write into a version conflict at the store instead.

use std::future::Future;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  derive::derive_status,
  record::Match,
  status::MatchStatus,
  store::MatchStore,
};

// ─── Port ────────────────────────────────────────────────────────────────────

/// The single capability the synchronizer needs from persistence: durably
/// record a new status for the match being synchronized.
pub trait StatusPort: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn persist(
    &self,
    status: MatchStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// A [`StatusPort`] that writes through a [`MatchStore`], guarded by the
/// version the record had when it was read.
pub struct StoredStatus<'a, S> {
  store:            &'a S,
  match_id:         Uuid,
  expected_version: i64,
}

impl<'a, S: MatchStore> StoredStatus<'a, S> {
  pub fn new(store: &'a S, record: &Match) -> Self {
    Self {
      store,
      match_id: record.match_id,
      expected_version: record.version,
    }
  }
}

impl<S: MatchStore> StatusPort for StoredStatus<'_, S> {
  type Error = S::Error;

  async fn persist(&self, status: MatchStatus) -> Result<(), S::Error> {
    self
      .store
      .update_status(self.match_id, self.expected_version, status)
      .await
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// What a synchronization pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
  /// The start time could not be parsed; nothing was written.
  Indeterminate(Match),
  /// The stored status already matched the derivation; nothing was written.
  Unchanged(Match),
  /// The derived status was persisted.
  Updated {
    previous: MatchStatus,
    record:   Match,
  },
}

impl SyncOutcome {
  pub fn record(&self) -> &Match {
    match self {
      Self::Indeterminate(record) | Self::Unchanged(record) => record,
      Self::Updated { record, .. } => record,
    }
  }

  pub fn into_record(self) -> Match {
    match self {
      Self::Indeterminate(record) | Self::Unchanged(record) => record,
      Self::Updated { record, .. } => record,
    }
  }

  /// The status the match has after this pass.
  pub fn status(&self) -> MatchStatus { self.record().status }

  pub fn changed(&self) -> bool { matches!(self, Self::Updated { .. }) }
}

// ─── Synchronizer ────────────────────────────────────────────────────────────

/// Synchronize `record` against the status derived at `reference`.
///
/// At most one call to `port.persist` is made, and only when the derived
/// status differs from `record.status`. Errors from the port are returned
/// unchanged and are not retried.
pub async fn sync_status_at<P: StatusPort>(
  record: &Match,
  reference: DateTime<Utc>,
  port: &P,
) -> Result<SyncOutcome, P::Error> {
  let Some(next) = derive_status(
    &record.start_time,
    record.end_time.as_deref(),
    reference,
  ) else {
    debug!(
      match_id = %record.match_id,
      start_time = %record.start_time,
      "start time does not parse, keeping stored status"
    );
    return Ok(SyncOutcome::Indeterminate(record.clone()));
  };

  if next == record.status {
    debug!(match_id = %record.match_id, status = %next, "status unchanged");
    return Ok(SyncOutcome::Unchanged(record.clone()));
  }

  port.persist(next).await?;

  info!(
    match_id = %record.match_id,
    from = %record.status,
    to = %next,
    "match status updated"
  );
  Ok(SyncOutcome::Updated {
    previous: record.status,
    record:   record.with_status(next),
  })
}

/// [`sync_status_at`] against the wall clock.
pub async fn sync_status<P: StatusPort>(
  record: &Match,
  port: &P,
) -> Result<SyncOutcome, P::Error> {
  sync_status_at(record, Utc::now(), port).await
}
