//! HTTP route definitions.

mod health;
mod records;
mod sync;

use crate::error::{AppError, Result};
use crate::AppState;
use axum::Router;
use larder_engine::CollectionKind;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(sync::routes())
        .merge(records::routes())
}

/// Parse a `{kind}` path segment.
fn parse_kind(raw: &str) -> Result<CollectionKind> {
    raw.parse().map_err(AppError::BadRequest)
}
