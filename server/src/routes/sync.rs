//! Sync endpoint routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use larder_engine::{CanonicalState, ClientSnapshot, StateSummary};

use crate::error::Result;
use crate::handlers::{handle_pull, handle_push, handle_summary};
use crate::AppState;

/// Create sync routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync", get(pull_handler).post(push_handler))
        .route("/sync/summary", get(summary_handler))
}

/// POST /sync - Reconcile a client snapshot.
async fn push_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ClientSnapshot>, JsonRejection>,
) -> Result<Json<CanonicalState>> {
    let Json(snapshot) = payload?;
    let canonical = handle_push(&state.store, &state.reconciler, snapshot).await?;
    Ok(Json(canonical))
}

/// GET /sync - Current canonical state.
async fn pull_handler(State(state): State<AppState>) -> Json<CanonicalState> {
    Json(handle_pull(&state.store).await)
}

/// GET /sync/summary - Counts only.
async fn summary_handler(State(state): State<AppState>) -> Json<StateSummary> {
    Json(handle_summary(&state.store).await)
}
