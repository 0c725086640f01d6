//! Recency scoring for ordering authority.
//!
//! A full manual reorder touches the timestamp of most items in a list at once,
//! which lifts the list's median. A single new or edited item barely moves it.
//! Comparing medians therefore lets an intentional reorder win over incidental
//! edits made elsewhere.

use crate::{Record, Timestamp};
use serde::{Deserialize, Serialize};

/// Which side's order the merged collection follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authority {
    /// The persisted server list keeps its order
    Server,
    /// The submitted client list imposes its order
    Client,
}

/// Median of the `updatedAt` values of `records`, duplicates included.
///
/// Even-length lists average the two middle values. An empty list scores 0.
pub fn recency_score(records: &[Record]) -> f64 {
    let mut stamps: Vec<Timestamp> = records.iter().map(Record::updated_at).collect();
    if stamps.is_empty() {
        return 0.0;
    }
    stamps.sort_unstable();

    let mid = stamps.len() / 2;
    if stamps.len() % 2 == 1 {
        stamps[mid] as f64
    } else {
        (stamps[mid - 1] as f64 + stamps[mid] as f64) / 2.0
    }
}

/// Decide which list is authoritative for ordering.
///
/// Equal scores go to the client.
pub fn authority(server: &[Record], client: &[Record]) -> Authority {
    if recency_score(client) >= recency_score(server) {
        Authority::Client
    } else {
        Authority::Server
    }
}
