//! Single-record operations.
//!
//! These back the create/update/delete-by-id endpoints. They are one
//! authoritative write against canonical state, so no cross-replica merge is
//! run. Create and update are the restore path: an explicit write is stronger
//! evidence of intent than a stale bulk snapshot, so it clears the id's
//! tombstone.

use crate::{error::Result, CanonicalState, CollectionKind, Error, Record, RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// A targeted change to one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operation {
    /// Insert a new record; fails if the id is live
    Create {
        kind: CollectionKind,
        record: Record,
    },
    /// Replace a record by id, appending it if absent
    Update {
        kind: CollectionKind,
        record: Record,
    },
    /// Remove a record and tombstone its id
    Delete { kind: CollectionKind, id: RecordId },
}

impl Operation {
    /// Target collection.
    pub fn kind(&self) -> CollectionKind {
        match self {
            Operation::Create { kind, .. }
            | Operation::Update { kind, .. }
            | Operation::Delete { kind, .. } => *kind,
        }
    }

    /// Target record id.
    pub fn record_id(&self) -> &str {
        match self {
            Operation::Create { record, .. } | Operation::Update { record, .. } => record.id(),
            Operation::Delete { id, .. } => id,
        }
    }
}

/// Result of applying an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResult {
    /// The record id that was affected
    pub record_id: RecordId,
    /// The stored record after a create or update
    pub record: Option<Record>,
    /// Whether a tombstone was cleared
    pub restored: bool,
    /// Whether a delete removed a live record
    pub removed: bool,
}

impl CanonicalState {
    /// Apply a single-record operation, stamping `last_updated` with `now`.
    ///
    /// Records written without an `updatedAt` are stamped with `now` too.
    pub fn apply(&mut self, op: Operation, now: Timestamp) -> Result<ApplyResult> {
        let result = match op {
            Operation::Create { kind, mut record } => {
                if self.get(kind, record.id()).is_some() {
                    return Err(Error::RecordAlreadyExists {
                        kind,
                        id: record.id().to_string(),
                    });
                }
                stamp(&mut record, now);
                let restored = self.tombstones_mut(kind).restore(record.id());
                self.items_mut(kind).push(record.clone());
                ApplyResult {
                    record_id: record.id().to_string(),
                    record: Some(record),
                    restored,
                    removed: false,
                }
            }
            Operation::Update { kind, mut record } => {
                stamp(&mut record, now);
                let restored = self.tombstones_mut(kind).restore(record.id());
                let items = self.items_mut(kind);
                match items.iter().position(|existing| existing.id() == record.id()) {
                    Some(index) => items[index] = record.clone(),
                    None => items.push(record.clone()),
                }
                ApplyResult {
                    record_id: record.id().to_string(),
                    record: Some(record),
                    restored,
                    removed: false,
                }
            }
            Operation::Delete { kind, id } => {
                let items = self.items_mut(kind);
                let before = items.len();
                items.retain(|record| record.id() != id);
                let removed = items.len() != before;
                self.tombstones_mut(kind).insert(id.clone());
                ApplyResult {
                    record_id: id,
                    record: None,
                    restored: false,
                    removed,
                }
            }
        };

        self.last_updated = now;
        Ok(result)
    }
}

fn stamp(record: &mut Record, now: Timestamp) {
    if !record.has_timestamp() {
        record.set_updated_at(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(&value).unwrap()
    }

    fn create(id: &str) -> Operation {
        Operation::Create {
            kind: CollectionKind::Recipes,
            record: record(json!({"id": id, "title": id, "updatedAt": 5})),
        }
    }

    #[test]
    fn create_appends_record() {
        let mut state = CanonicalState::empty();
        state.apply(create("r1"), 100).unwrap();
        state.apply(create("r2"), 200).unwrap();

        let ids: Vec<_> = state.recipes.iter().map(Record::id).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
        assert_eq!(state.last_updated, 200);
    }

    #[test]
    fn create_duplicate_fails() {
        let mut state = CanonicalState::empty();
        state.apply(create("r1"), 100).unwrap();

        let err = state.apply(create("r1"), 200).unwrap_err();

        assert!(matches!(err, Error::RecordAlreadyExists { .. }));
        assert_eq!(state.recipes.len(), 1);
        assert_eq!(state.last_updated, 100);
    }

    #[test]
    fn create_stamps_missing_timestamp() {
        let mut state = CanonicalState::empty();
        let op = Operation::Create {
            kind: CollectionKind::Groceries,
            record: record(json!({"id": "g1", "name": "Milk"})),
        };

        let result = state.apply(op, 1234).unwrap();

        assert_eq!(result.record.unwrap().updated_at(), 1234);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut state = CanonicalState::empty();
        state.apply(create("r1"), 1).unwrap();
        state.apply(create("r2"), 2).unwrap();

        let op = Operation::Update {
            kind: CollectionKind::Recipes,
            record: record(json!({"id": "r1", "title": "Edited", "updatedAt": 9})),
        };
        state.apply(op, 3).unwrap();

        assert_eq!(state.recipes[0].get("title"), Some(&json!("Edited")));
        assert_eq!(state.recipes[1].id(), "r2");
    }

    #[test]
    fn delete_tombstones_id() {
        let mut state = CanonicalState::empty();
        state.apply(create("r1"), 1).unwrap();

        let op = Operation::Delete {
            kind: CollectionKind::Recipes,
            id: "r1".into(),
        };
        let result = state.apply(op.clone(), 2).unwrap();

        assert!(result.removed);
        assert!(state.recipes.is_empty());
        assert!(state.deleted_recipe_ids.contains("r1"));

        // Deleting again is idempotent.
        let result = state.apply(op, 3).unwrap();
        assert!(!result.removed);
        assert_eq!(state.deleted_recipe_ids.len(), 1);
    }

    #[test]
    fn create_after_delete_restores() {
        let mut state = CanonicalState::empty();
        state.apply(create("r1"), 1).unwrap();
        state
            .apply(
                Operation::Delete {
                    kind: CollectionKind::Recipes,
                    id: "r1".into(),
                },
                2,
            )
            .unwrap();

        let result = state.apply(create("r1"), 3).unwrap();

        assert!(result.restored);
        assert!(!state.deleted_recipe_ids.contains("r1"));
        assert!(state.get(CollectionKind::Recipes, "r1").is_some());
    }

    #[test]
    fn update_of_tombstoned_id_restores() {
        let mut state = CanonicalState::empty();
        state.deleted_grocery_ids.insert("g1");

        let op = Operation::Update {
            kind: CollectionKind::Groceries,
            record: record(json!({"id": "g1", "name": "Eggs"})),
        };
        let result = state.apply(op, 10).unwrap();

        assert!(result.restored);
        assert_eq!(state.groceries.len(), 1);
        assert!(state.deleted_grocery_ids.is_empty());
    }

    #[test]
    fn operation_accessors() {
        let op = create("r7");
        assert_eq!(op.kind(), CollectionKind::Recipes);
        assert_eq!(op.record_id(), "r7");

        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["type"], "create");
        assert_eq!(json["kind"], "recipes");
    }
}
