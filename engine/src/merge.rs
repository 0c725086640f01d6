//! Record merger: combines the server's and a client's copy of one collection.
//!
//! # Algorithm
//!
//! 1. Drop anything that is not an object with a non-empty id
//! 2. Pick one winner per id: strictly newer `updatedAt` wins, ties go to the
//!    later-scanned item (server items are scanned before client items)
//! 3. Copy the heavy field from the loser when the winner is a real content
//!    edit that arrived without it
//! 4. Lay the winners out in the order of the list with the higher recency
//!    score, then append ids only the other list knows about

use crate::recency::{authority, Authority};
use crate::schema::{is_populated, CollectionSchema};
use crate::{record::sanitize, Record};
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Result of merging one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Merged records in final order, one per id
    pub items: Vec<Record>,
    /// Whose order `items` follows
    pub authority: Authority,
}

/// Merge raw JSON collections.
///
/// Malformed elements on either side are dropped; this never fails.
pub fn merge_collection(
    server_items: &[Value],
    client_items: &[Value],
    schema: &CollectionSchema,
) -> Vec<Record> {
    merge_records(&sanitize(server_items), &sanitize(client_items), schema).items
}

/// Merge two already-sanitized collections.
pub fn merge_records(
    server: &[Record],
    client: &[Record],
    schema: &CollectionSchema,
) -> MergeOutcome {
    let mut winners: HashMap<&str, Record> = HashMap::with_capacity(server.len() + client.len());

    for record in server.iter().chain(client) {
        match winners.entry(record.id()) {
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get_mut();
                let merged = if record.updated_at() >= current.updated_at() {
                    resolve(record, current, schema)
                } else {
                    resolve(current, record, schema)
                };
                *current = merged;
            }
        }
    }

    let authority = authority(server, client);
    let (primary, secondary) = match authority {
        Authority::Server => (server, client),
        Authority::Client => (client, server),
    };

    // Each id is taken out of the map the first time it is seen, so later
    // duplicates and secondary copies of primary ids are skipped.
    let mut items = Vec::with_capacity(winners.len());
    for record in primary.iter().chain(secondary) {
        if let Some(winner) = winners.remove(record.id()) {
            items.push(winner);
        }
    }

    MergeOutcome { items, authority }
}

/// Build the merged record for one id from the winning and losing copies.
fn resolve(winner: &Record, loser: &Record, schema: &CollectionSchema) -> Record {
    let mut merged = winner.clone();

    let Some(heavy) = schema.heavy_field.as_deref() else {
        return merged;
    };

    // A thin payload without content is not evidence of an edit, so the
    // heavy field is only carried over onto real content edits.
    let dropped_heavy = !is_populated(winner.get(heavy)) && is_populated(loser.get(heavy));
    if dropped_heavy && is_populated(winner.get(&schema.content_field)) {
        if let Some(value) = loser.get(heavy) {
            merged.set(heavy, value.clone());
        }
    }

    merged
}
