//! The `MatchStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `matchday-store-sqlite`).
//! Higher layers (`matchday-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  record::{Match, NewMatch},
  status::MatchStatus,
};

/// What callers above the store need to know about a backend failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The record does not exist.
  fn is_not_found(&self) -> bool;

  /// A version-checked write lost to a concurrent writer.
  fn is_conflict(&self) -> bool;
}

/// Abstraction over a matchday store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait MatchStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new match. The store assigns `match_id`, `created_at` and a
  /// starting `version` of 0.
  fn create_match(
    &self,
    input: NewMatch,
  ) -> impl Future<Output = Result<Match, Self::Error>> + Send + '_;

  /// Retrieve a match by UUID. Returns `None` if not found.
  fn get_match(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Match>, Self::Error>> + Send + '_;

  /// List up to `limit` matches, most recently created first.
  fn list_matches(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Match>, Self::Error>> + Send + '_;

  /// Write `status` if and only if the stored version still equals
  /// `expected_version`, incrementing the version on success.
  ///
  /// Returns an error if the match does not exist or its version has moved on.
  fn update_status(
    &self,
    id: Uuid,
    expected_version: i64,
    status: MatchStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
