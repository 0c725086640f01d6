//! Reconciliation pipeline: server state + client snapshot -> next state.
//!
//! # Algorithm
//!
//! 1. Union the tombstone sets of every collection
//! 2. Merge each collection with the record merger
//! 3. Drop merged records whose id is tombstoned
//! 4. Stamp `lastUpdated`
//!
//! Tombstones are merged before the collections and filtering happens after
//! the merge, so a deletion that reached the server is honored even when a
//! stale snapshot still carries the record. Reconciliation is pure and never
//! fails; malformed client records are counted and dropped.

use crate::merge::merge_records;
use crate::recency::Authority;
use crate::record::sanitize;
use crate::tombstone::merge_ids;
use crate::{CanonicalState, ClientSnapshot, CollectionKind, CollectionSchema, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What happened to one collection during reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport {
    pub kind: CollectionKind,
    /// Records in the next state
    pub merged: usize,
    /// Client elements dropped as malformed
    pub dropped: usize,
    /// Merged records removed because their id is tombstoned
    pub tombstoned: usize,
    /// Whose order the collection now follows
    pub authority: Authority,
}

/// Result of reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileResult {
    /// The next canonical state
    pub state: CanonicalState,
    /// One report per collection kind
    pub reports: Vec<CollectionReport>,
}

impl ReconcileResult {
    /// Report for one collection.
    pub fn report(&self, kind: CollectionKind) -> Option<&CollectionReport> {
        self.reports.iter().find(|report| report.kind == kind)
    }
}

/// Merges client snapshots into canonical state.
#[derive(Debug, Clone)]
pub struct Reconciler {
    schemas: HashMap<CollectionKind, CollectionSchema>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    /// Create a reconciler using each collection's built-in schema.
    pub fn new() -> Self {
        let schemas = CollectionKind::ALL
            .iter()
            .map(|kind| (*kind, kind.schema()))
            .collect();
        Self { schemas }
    }

    /// Builder method to override one collection's schema.
    pub fn with_schema(mut self, kind: CollectionKind, schema: CollectionSchema) -> Self {
        self.schemas.insert(kind, schema);
        self
    }

    /// Schema used for `kind`.
    pub fn schema(&self, kind: CollectionKind) -> CollectionSchema {
        self.schemas
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| kind.schema())
    }

    /// Reconcile a client snapshot against the server's state.
    pub fn reconcile(
        &self,
        server: &CanonicalState,
        client: &ClientSnapshot,
        now: Timestamp,
    ) -> ReconcileResult {
        let mut next = CanonicalState::empty();

        // Deletion knowledge must be complete before any collection is filtered.
        for kind in CollectionKind::ALL {
            *next.tombstones_mut(kind) =
                merge_ids(server.tombstones(kind).iter(), client.tombstone_ids(kind));
        }

        let mut reports = Vec::with_capacity(CollectionKind::ALL.len());
        for kind in CollectionKind::ALL {
            let submitted = client.items(kind);
            let client_records = sanitize(submitted);
            let dropped = submitted.len() - client_records.len();

            let outcome = merge_records(server.items(kind), &client_records, &self.schema(kind));
            let before = outcome.items.len();

            let tombstones = next.tombstones(kind);
            let items: Vec<_> = outcome
                .items
                .into_iter()
                .filter(|record| !tombstones.contains(record.id()))
                .collect();

            reports.push(CollectionReport {
                kind,
                merged: items.len(),
                dropped,
                tombstoned: before - items.len(),
                authority: outcome.authority,
            });
            *next.items_mut(kind) = items;
        }

        next.last_updated = now;
        ReconcileResult {
            state: next,
            reports,
        }
    }
}

/// Reconcile with the default schemas.
pub fn reconcile(
    server: &CanonicalState,
    client: &ClientSnapshot,
    now: Timestamp,
) -> ReconcileResult {
    Reconciler::new().reconcile(server, client, now)
}
