//! Tombstone sets: ids of deleted records.
//!
//! A tombstone keeps a stale replica from reintroducing a record another
//! device already deleted. Merging is a plain set union, so a set only ever
//! grows; the one way out is an explicit restore through a single-record
//! create or update.

use crate::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of deleted record ids for one collection.
///
/// Backed by a `BTreeSet` so serialization order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TombstoneSet {
    ids: BTreeSet<RecordId>,
}

impl TombstoneSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` has been deleted.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Record a deletion. Empty ids are ignored.
    ///
    /// Returns `true` if the id was not already tombstoned.
    pub fn insert(&mut self, id: impl Into<RecordId>) -> bool {
        let id = id.into();
        if id.is_empty() {
            return false;
        }
        self.ids.insert(id)
    }

    /// Restore path: forget a deletion.
    ///
    /// Only explicit single-record create/update calls this.
    pub fn restore(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<RecordId>> FromIterator<S> for TombstoneSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Union of two id sequences.
///
/// Either side may be empty; duplicates collapse and empty ids are skipped.
pub fn merge_ids<'a, A, B>(existing: A, incoming: B) -> TombstoneSet
where
    A: IntoIterator<Item = &'a str>,
    B: IntoIterator<Item = &'a str>,
{
    existing.into_iter().chain(incoming).collect()
}
