//! Record handlers - single-record reads and writes by id.

use larder_engine::{record::ID_FIELD, CollectionKind, Error, Operation, Record};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::handlers::now_millis;
use crate::store::StoreGateway;

/// All live records of a kind, in canonical order.
pub async fn list_records(store: &StoreGateway, kind: CollectionKind) -> Vec<Record> {
    let mut state = store.read().await;
    std::mem::take(state.items_mut(kind))
}

/// One live record by id.
pub async fn get_record(store: &StoreGateway, kind: CollectionKind, id: &str) -> Result<Record> {
    store
        .read()
        .await
        .get(kind, id)
        .cloned()
        .ok_or_else(|| {
            Error::RecordNotFound {
                kind,
                id: id.to_string(),
            }
            .into()
        })
}

/// Create a record. The server assigns a UUID when the body has no id.
pub async fn create_record(
    store: &StoreGateway,
    kind: CollectionKind,
    body: Value,
) -> Result<Record> {
    let fields = into_fields(body)?;
    let id = match fields.get(ID_FIELD) {
        None | Some(Value::Null) => uuid::Uuid::new_v4().to_string(),
        Some(Value::String(id)) if id.is_empty() => uuid::Uuid::new_v4().to_string(),
        Some(Value::String(id)) => id.clone(),
        Some(_) => return Err(AppError::BadRequest("id must be a string".to_string())),
    };
    let record = Record::new(id, fields)?;

    let (_, applied) = store
        .update(|state| {
            state
                .apply(Operation::Create { kind, record }, now_millis())
                .map_err(AppError::from)
        })
        .await?;

    tracing::info!(kind = %kind, id = %applied.record_id, restored = applied.restored, "Created record");
    record_of(applied.record)
}

/// Replace a record by id, or add it if absent. A tombstoned id is restored.
pub async fn update_record(
    store: &StoreGateway,
    kind: CollectionKind,
    id: &str,
    body: Value,
) -> Result<Record> {
    let record = Record::new(id, into_fields(body)?)?;

    let (_, applied) = store
        .update(|state| {
            state
                .apply(Operation::Update { kind, record }, now_millis())
                .map_err(AppError::from)
        })
        .await?;

    tracing::info!(kind = %kind, id = %applied.record_id, restored = applied.restored, "Updated record");
    record_of(applied.record)
}

/// Delete a record and tombstone its id. Deleting an absent id still
/// records the tombstone.
pub async fn delete_record(store: &StoreGateway, kind: CollectionKind, id: &str) -> Result<()> {
    let (_, applied) = store
        .update(|state| {
            state
                .apply(
                    Operation::Delete {
                        kind,
                        id: id.to_string(),
                    },
                    now_millis(),
                )
                .map_err(AppError::from)
        })
        .await?;

    tracing::info!(kind = %kind, id = %applied.record_id, removed = applied.removed, "Deleted record");
    Ok(())
}

fn into_fields(body: Value) -> Result<Map<String, Value>> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(AppError::BadRequest(
            "record body must be a JSON object".to_string(),
        )),
    }
}

fn record_of(record: Option<Record>) -> Result<Record> {
    record.ok_or_else(|| Error::InvalidRecord("write produced no record".to_string()).into())
}
