//! Core types and trait definitions for matchday.
//!
//! A match's status is never authoritative on its own: it is derived from the
//! start and end timestamps at a reference instant, and the stored value is
//! only a cache of the last derivation that was persisted.
//!
//! This crate is deliberately free of HTTP and database dependencies.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod derive;
pub mod error;
pub mod record;
pub mod status;
pub mod store;
pub mod sync;

pub use derive::{derive_status, derive_status_at_instants, derive_status_now, parse_instant};
pub use error::{Error, Result};
pub use record::{Match, NewMatch};
pub use status::MatchStatus;
pub use sync::{StatusPort, StoredStatus, SyncOutcome, sync_status, sync_status_at};
