//! Canonical state and client snapshot types.
//!
//! `CanonicalState` is the single document the server persists and hands back
//! to clients. `ClientSnapshot` is what a client submits for reconciliation:
//! same layout, but collections are kept as raw JSON so that per-element
//! validation happens inside the merger.

use crate::record::deserialize_lenient;
use crate::{error::Result, CollectionKind, Error, Record, Timestamp, TombstoneSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version of the persisted state format.
pub const STATE_FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    STATE_FORMAT_VERSION
}

/// The persisted source of truth all replicas synchronize against.
///
/// Decoding is lenient: malformed records are dropped, and the tombstone
/// arrays and timestamps default when missing so older files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalState {
    /// State format version
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub recipes: Vec<Record>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub groceries: Vec<Record>,
    #[serde(default)]
    pub deleted_recipe_ids: TombstoneSet,
    #[serde(default)]
    pub deleted_grocery_ids: TombstoneSet,
    /// When this state was last replaced (milliseconds since epoch)
    #[serde(default)]
    pub last_updated: Timestamp,
}

impl Default for CanonicalState {
    fn default() -> Self {
        Self::empty()
    }
}

impl CanonicalState {
    /// Empty state, as created on first boot.
    pub fn empty() -> Self {
        Self {
            format_version: STATE_FORMAT_VERSION,
            recipes: Vec::new(),
            groceries: Vec::new(),
            deleted_recipe_ids: TombstoneSet::new(),
            deleted_grocery_ids: TombstoneSet::new(),
            last_updated: 0,
        }
    }

    /// Records of one collection, in display order.
    pub fn items(&self, kind: CollectionKind) -> &[Record] {
        match kind {
            CollectionKind::Recipes => &self.recipes,
            CollectionKind::Groceries => &self.groceries,
        }
    }

    pub fn items_mut(&mut self, kind: CollectionKind) -> &mut Vec<Record> {
        match kind {
            CollectionKind::Recipes => &mut self.recipes,
            CollectionKind::Groceries => &mut self.groceries,
        }
    }

    /// Deleted ids of one collection.
    pub fn tombstones(&self, kind: CollectionKind) -> &TombstoneSet {
        match kind {
            CollectionKind::Recipes => &self.deleted_recipe_ids,
            CollectionKind::Groceries => &self.deleted_grocery_ids,
        }
    }

    pub fn tombstones_mut(&mut self, kind: CollectionKind) -> &mut TombstoneSet {
        match kind {
            CollectionKind::Recipes => &mut self.deleted_recipe_ids,
            CollectionKind::Groceries => &mut self.deleted_grocery_ids,
        }
    }

    /// Look up a live record by id.
    pub fn get(&self, kind: CollectionKind, id: &str) -> Option<&Record> {
        self.items(kind).iter().find(|record| record.id() == id)
    }

    /// Count records across all collections.
    pub fn record_count(&self) -> usize {
        CollectionKind::ALL
            .iter()
            .map(|kind| self.items(*kind).len())
            .sum()
    }

    /// Count tombstones across all collections.
    pub fn tombstone_count(&self) -> usize {
        CollectionKind::ALL
            .iter()
            .map(|kind| self.tombstones(*kind).len())
            .sum()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;

        if state.format_version > STATE_FORMAT_VERSION {
            return Err(Error::InvalidSnapshot(format!(
                "unsupported state format version: {} (max supported: {})",
                state.format_version, STATE_FORMAT_VERSION
            )));
        }

        Ok(state)
    }
}

/// A snapshot submitted by a client for reconciliation.
///
/// Both collections are required arrays; the tombstone arrays are optional
/// (older clients do not send them) and `null` is read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSnapshot {
    pub recipes: Vec<Value>,
    pub groceries: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_recipe_ids: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_grocery_ids: Option<Vec<Value>>,
}

impl ClientSnapshot {
    /// Empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a collection's items.
    pub fn with_items(mut self, kind: CollectionKind, items: Vec<Value>) -> Self {
        match kind {
            CollectionKind::Recipes => self.recipes = items,
            CollectionKind::Groceries => self.groceries = items,
        }
        self
    }

    /// Builder method to set a collection's deleted ids.
    pub fn with_deleted<I, S>(mut self, kind: CollectionKind, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = Some(ids.into_iter().map(|id| Value::String(id.into())).collect());
        match kind {
            CollectionKind::Recipes => self.deleted_recipe_ids = ids,
            CollectionKind::Groceries => self.deleted_grocery_ids = ids,
        }
        self
    }

    /// Raw submitted items of one collection.
    pub fn items(&self, kind: CollectionKind) -> &[Value] {
        match kind {
            CollectionKind::Recipes => &self.recipes,
            CollectionKind::Groceries => &self.groceries,
        }
    }

    /// Submitted deleted ids of one collection; non-string entries are skipped.
    pub fn tombstone_ids(&self, kind: CollectionKind) -> impl Iterator<Item = &str> {
        let ids = match kind {
            CollectionKind::Recipes => self.deleted_recipe_ids.as_deref(),
            CollectionKind::Groceries => self.deleted_grocery_ids.as_deref(),
        };
        ids.unwrap_or_default()
            .iter()
            .filter_map(Value::as_str)
            .filter(|id| !id.is_empty())
    }
}

/// Summary of a canonical state (without the full data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSummary {
    pub format_version: u32,
    pub recipe_count: usize,
    pub grocery_count: usize,
    pub tombstone_count: usize,
    pub last_updated: Timestamp,
}

impl From<&CanonicalState> for StateSummary {
    fn from(state: &CanonicalState) -> Self {
        Self {
            format_version: state.format_version,
            recipe_count: state.recipes.len(),
            grocery_count: state.groceries.len(),
            tombstone_count: state.tombstone_count(),
            last_updated: state.last_updated,
        }
    }
}
