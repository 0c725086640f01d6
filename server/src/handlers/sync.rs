//! Sync handlers - snapshot pull and push.

use larder_engine::{CanonicalState, ClientSnapshot, Reconciler, StateSummary};

use crate::error::Result;
use crate::handlers::now_millis;
use crate::store::StoreGateway;

/// Return the current canonical state.
pub async fn handle_pull(store: &StoreGateway) -> CanonicalState {
    store.read().await
}

/// Return counts for the current canonical state.
pub async fn handle_summary(store: &StoreGateway) -> StateSummary {
    StateSummary::from(&store.read().await)
}

/// Reconcile a client snapshot into canonical state and persist the result.
pub async fn handle_push(
    store: &StoreGateway,
    reconciler: &Reconciler,
    snapshot: ClientSnapshot,
) -> Result<CanonicalState> {
    let (state, reports) = store
        .update(|state| {
            let result = reconciler.reconcile(state, &snapshot, now_millis());
            *state = result.state;
            Ok::<_, crate::error::AppError>(result.reports)
        })
        .await?;

    for report in &reports {
        if report.dropped > 0 {
            tracing::debug!(
                kind = %report.kind,
                dropped = report.dropped,
                "Dropped malformed client records"
            );
        }
        tracing::info!(
            kind = %report.kind,
            merged = report.merged,
            tombstoned = report.tombstoned,
            authority = ?report.authority,
            "Reconciled collection"
        );
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use larder_engine::CollectionKind;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn push_persists_and_pull_returns_it() {
        let store = StoreGateway::new(Arc::new(MemoryBackend::new()));
        let snapshot = ClientSnapshot::new()
            .with_items(CollectionKind::Recipes, vec![json!({"id": "r1", "title": "Soup"})])
            .with_deleted(CollectionKind::Groceries, ["g1"]);

        let pushed = handle_push(&store, &Reconciler::new(), snapshot).await.unwrap();
        let pulled = handle_pull(&store).await;

        assert_eq!(pushed, pulled);
        assert_eq!(pulled.recipes.len(), 1);
        assert!(pulled.deleted_grocery_ids.contains("g1"));
        assert!(pulled.last_updated > 0);

        let summary = handle_summary(&store).await;
        assert_eq!(summary.recipe_count, 1);
        assert_eq!(summary.tombstone_count, 1);
    }
}
