//! # Larder Engine
//!
//! Snapshot reconciliation for a shared recipe and grocery store.
//!
//! Clients do not send operation logs. Each sync submits the client's full view
//! of every collection, and the engine merges it with the server's persisted
//! view into one next canonical state.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine knows nothing about files, network, or clocks;
//!   callers pass the current time in
//! - **Never fails on bad data**: malformed records are dropped, not reported
//! - **Deterministic**: same inputs always produce the same outputs
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`Record`] is any JSON object with a non-empty string `id`. An optional
//! `updatedAt` (milliseconds) decides freshness; missing means the epoch.
//!
//! ### Tombstones
//!
//! A [`TombstoneSet`] per collection remembers deleted ids so that a stale
//! device cannot resurrect them. Sets only grow during reconciliation.
//!
//! ### Merging
//!
//! [`merge_collection`] picks the newest copy of each record, keeps the heavy
//! field (e.g. a recipe image) when a content edit arrives without it, and
//! follows the order of whichever list has the higher median timestamp.
//!
//! ### Reconciliation
//!
//! The [`Reconciler`] merges tombstones, merges collections, then filters out
//! deleted ids.
//!
//! ## Quick Start
//!
//! ```rust
//! use larder_engine::{reconcile, CanonicalState, ClientSnapshot, CollectionKind};
//! use serde_json::json;
//!
//! let server = CanonicalState::empty();
//! let client = ClientSnapshot::new()
//!     .with_items(
//!         CollectionKind::Recipes,
//!         vec![json!({"id": "r1", "title": "Soup", "updatedAt": 1706745600000u64})],
//!     )
//!     .with_deleted(CollectionKind::Groceries, ["g7"]);
//!
//! let result = reconcile(&server, &client, 1706745601000);
//!
//! assert_eq!(result.state.recipes.len(), 1);
//! assert!(result.state.deleted_grocery_ids.contains("g7"));
//! assert_eq!(result.state.last_updated, 1706745601000);
//! ```
//!
//! ## Single-record writes
//!
//! [`CanonicalState::apply`] applies an [`Operation`] directly. Creates and
//! updates clear the id's tombstone; deletes add it.

pub mod error;
pub mod merge;
pub mod operation;
pub mod recency;
pub mod reconcile;
pub mod record;
pub mod schema;
pub mod snapshot;
pub mod tombstone;

// Re-export main types at crate root
pub use error::Error;
pub use merge::{merge_collection, merge_records, MergeOutcome};
pub use operation::{ApplyResult, Operation};
pub use recency::{recency_score, Authority};
pub use reconcile::{reconcile, CollectionReport, ReconcileResult, Reconciler};
pub use record::Record;
pub use schema::{CollectionKind, CollectionSchema};
pub use snapshot::{CanonicalState, ClientSnapshot, StateSummary, STATE_FORMAT_VERSION};
pub use tombstone::{merge_ids, TombstoneSet};

/// Type aliases for clarity
pub type RecordId = String;
pub type Timestamp = u64;
