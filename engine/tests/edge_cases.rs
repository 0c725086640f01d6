//! Edge case tests for larder-engine
//!
//! These tests cover boundary conditions and unusual inputs.

use larder_engine::{
    merge_collection, reconcile, Authority, CanonicalState, ClientSnapshot, CollectionKind,
    Operation, Record, Reconciler,
};
use serde_json::{json, Value};

fn recipes_schema() -> larder_engine::CollectionSchema {
    CollectionKind::Recipes.schema()
}

fn ids(records: &[Record]) -> Vec<&str> {
    records.iter().map(Record::id).collect()
}

fn recipes_snapshot(items: Vec<Value>) -> ClientSnapshot {
    ClientSnapshot::new().with_items(CollectionKind::Recipes, items)
}

// ============================================================================
// String Edge Cases
// ============================================================================

#[test]
fn unicode_ids() {
    let names = vec!["日本語テスト", "Привет мир", "🎉🚀💯", "Hello\nWorld\tTab", "Null\0Test"];
    let items: Vec<Value> = names
        .iter()
        .map(|id| json!({"id": id, "updatedAt": 1}))
        .collect();

    let merged = merge_collection(&[], &items, &recipes_schema());

    assert_eq!(ids(&merged), names);
}

#[test]
fn very_long_heavy_field_is_preserved() {
    // 1MB image payload
    let image = "x".repeat(1024 * 1024);
    let server = vec![json!({"id": "r1", "image": image.clone(), "updatedAt": 1})];
    let client = vec![json!({"id": "r1", "instructions": "bake", "updatedAt": 2})];

    let merged = merge_collection(&server, &client, &recipes_schema());

    assert_eq!(merged[0].get("image").unwrap().as_str().unwrap().len(), 1024 * 1024);
}

#[test]
fn whitespace_id_is_a_valid_id() {
    let merged = merge_collection(&[], &[json!({"id": " "})], &recipes_schema());
    assert_eq!(merged.len(), 1);
}

// ============================================================================
// Timestamp Edge Cases
// ============================================================================

#[test]
fn timestamp_boundaries() {
    let server = vec![json!({"id": "a", "v": "server", "updatedAt": u64::MAX})];
    let client = vec![json!({"id": "a", "v": "client", "updatedAt": u64::MAX - 1})];

    let merged = merge_collection(&server, &client, &recipes_schema());

    assert_eq!(merged[0].get("v"), Some(&json!("server")));
}

#[test]
fn string_timestamps_compare_numerically() {
    let server = vec![json!({"id": "a", "v": "server", "updatedAt": "900"})];
    let client = vec![json!({"id": "a", "v": "client", "updatedAt": "1000"})];

    let merged = merge_collection(&server, &client, &recipes_schema());

    assert_eq!(merged[0].get("v"), Some(&json!("client")));
}

#[test]
fn garbage_timestamp_loses_to_real_one() {
    let server = vec![json!({"id": "a", "v": "server", "updatedAt": 1})];
    let client = vec![json!({"id": "a", "v": "client", "updatedAt": "soon"})];

    let merged = merge_collection(&server, &client, &recipes_schema());

    assert_eq!(merged[0].get("v"), Some(&json!("server")));
}

// ============================================================================
// JSON Edge Cases
// ============================================================================

#[test]
fn unknown_fields_pass_through() {
    let complex = json!({
        "id": "r1",
        "number": 42,
        "float": 3.5,
        "null": null,
        "array": [1, 2, 3, "mixed", true, null],
        "object": {"a": 1, "b": "two"},
        "empty_array": [],
        "empty_object": {},
    });

    let merged = merge_collection(&[], &[complex.clone()], &recipes_schema());

    assert_eq!(Value::from(merged[0].clone()), complex);
}

#[test]
fn deeply_nested_content_survives_reconcile() {
    let mut nested = json!({"value": "leaf"});
    for _ in 0..50 {
        nested = json!({"nested": nested});
    }
    let client = recipes_snapshot(vec![json!({"id": "r1", "data": nested.clone()})]);

    let result = reconcile(&CanonicalState::empty(), &client, 1);

    assert_eq!(result.state.recipes[0].get("data"), Some(&nested));
}

#[test]
fn every_malformed_shape_is_dropped() {
    let client = vec![
        json!(null),
        json!(true),
        json!(3.5),
        json!("r1"),
        json!([{"id": "r1"}]),
        json!({}),
        json!({"id": null}),
        json!({"id": 12}),
        json!({"id": ""}),
        json!({"id": {"nested": "r1"}}),
    ];

    let merged = merge_collection(&[], &client, &recipes_schema());

    assert!(merged.is_empty());
}

// ============================================================================
// Ordering Edge Cases
// ============================================================================

#[test]
fn full_server_reorder_beats_client_with_one_stale_edit() {
    // Server: full reorder at t=100. Client: old order, one item edited at t=5.
    let server = vec![
        json!({"id": "C", "updatedAt": 100}),
        json!({"id": "B", "updatedAt": 100}),
        json!({"id": "A", "updatedAt": 100}),
    ];
    let client = vec![
        json!({"id": "A", "updatedAt": 1}),
        json!({"id": "B", "updatedAt": 1}),
        json!({"id": "C", "updatedAt": 5}),
        json!({"id": "N", "updatedAt": 1}),
    ];

    let merged = merge_collection(&server, &client, &recipes_schema());

    assert_eq!(ids(&merged), vec!["C", "B", "A", "N"]);
}

#[test]
fn client_only_ids_are_appended_in_client_order() {
    let server = vec![
        json!({"id": "A", "updatedAt": 100}),
        json!({"id": "B", "updatedAt": 100}),
    ];
    let client = vec![
        json!({"id": "Z", "updatedAt": 1}),
        json!({"id": "B", "updatedAt": 1}),
        json!({"id": "Y", "updatedAt": 1}),
    ];

    let merged = merge_collection(&server, &client, &recipes_schema());

    assert_eq!(ids(&merged), vec!["A", "B", "Z", "Y"]);
}

#[test]
fn reports_expose_authority() {
    let mut server = CanonicalState::empty();
    server.recipes = larder_engine::record::sanitize(&[json!({"id": "A", "updatedAt": 100})]);
    let client = recipes_snapshot(vec![json!({"id": "B", "updatedAt": 1})]);

    let result = reconcile(&server, &client, 1);

    let report = result.report(CollectionKind::Recipes).unwrap();
    assert_eq!(report.authority, Authority::Server);
    assert_eq!(ids(&result.state.recipes), vec!["A", "B"]);
}

// ============================================================================
// Reconciliation Edge Cases
// ============================================================================

#[test]
fn stale_device_cannot_resurrect_deleted_recipe() {
    // Device A deletes r1 and syncs.
    let base = reconcile(
        &CanonicalState::empty(),
        &recipes_snapshot(vec![
            json!({"id": "r1", "updatedAt": 1}),
            json!({"id": "r2", "updatedAt": 1}),
        ]),
        10,
    )
    .state;
    let after_a = reconcile(
        &base,
        &recipes_snapshot(vec![json!({"id": "r2", "updatedAt": 1})])
            .with_deleted(CollectionKind::Recipes, ["r1"]),
        20,
    )
    .state;

    // Device B still has r1, with a newer edit.
    let after_b = reconcile(
        &after_a,
        &recipes_snapshot(vec![
            json!({"id": "r1", "updatedAt": 500}),
            json!({"id": "r2", "updatedAt": 1}),
        ]),
        30,
    )
    .state;

    assert_eq!(ids(&after_b.recipes), vec!["r2"]);
    assert!(after_b.deleted_recipe_ids.contains("r1"));
}

#[test]
fn explicit_create_restores_after_bulk_delete() {
    let mut state = reconcile(
        &CanonicalState::empty(),
        &ClientSnapshot::new().with_deleted(CollectionKind::Groceries, ["g1"]),
        10,
    )
    .state;

    let record = Record::from_value(&json!({"id": "g1", "name": "Flour"})).unwrap();
    state
        .apply(
            Operation::Create {
                kind: CollectionKind::Groceries,
                record,
            },
            20,
        )
        .unwrap();

    // A later bulk sync without tombstones keeps it.
    let next = reconcile(&state, &ClientSnapshot::new(), 30).state;
    assert_eq!(ids(&next.groceries), vec!["g1"]);
    assert!(next.deleted_grocery_ids.is_empty());
}

#[test]
fn empty_client_snapshot_keeps_server_records() {
    let mut server = CanonicalState::empty();
    server.groceries = larder_engine::record::sanitize(&[json!({"id": "g1"}), json!({"id": "g2"})]);

    let result = reconcile(&server, &ClientSnapshot::new(), 5);

    assert_eq!(ids(&result.state.groceries), vec!["g1", "g2"]);
}

#[test]
fn reconciler_is_reusable() {
    let reconciler = Reconciler::new();
    let client = recipes_snapshot(vec![json!({"id": "r1"})]);

    let a = reconciler.reconcile(&CanonicalState::empty(), &client, 1);
    let b = reconciler.reconcile(&CanonicalState::empty(), &client, 1);

    assert_eq!(a, b);
}

// ============================================================================
// Snapshot Edge Cases
// ============================================================================

#[test]
fn reconciled_state_survives_json_roundtrip() {
    let client = recipes_snapshot(vec![
        json!({"id": "r1", "image": "IMG", "updatedAt": 3}),
        json!({"id": "r2"}),
    ])
    .with_deleted(CollectionKind::Recipes, ["gone"]);

    let state = reconcile(&CanonicalState::empty(), &client, 77).state;
    let restored = CanonicalState::from_json(&state.to_json().unwrap()).unwrap();

    assert_eq!(state, restored);
}

#[test]
fn client_snapshot_from_wire_json() {
    let body = r#"{
        "recipes": [{"id": "r1", "title": "Soup", "updatedAt": 1706745600000}],
        "groceries": [null, {"id": "g1", "name": "Milk"}],
        "deletedRecipeIds": ["r0"]
    }"#;

    let snapshot: ClientSnapshot = serde_json::from_str(body).unwrap();
    let result = reconcile(&CanonicalState::empty(), &snapshot, 1706745601000);

    assert_eq!(result.state.recipes.len(), 1);
    assert_eq!(result.state.groceries.len(), 1);
    assert!(result.state.deleted_recipe_ids.contains("r0"));
    assert!(result.state.deleted_grocery_ids.is_empty());
}
