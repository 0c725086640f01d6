//! Single-record routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use larder_engine::Record;
use serde_json::Value;

use super::parse_kind;
use crate::error::Result;
use crate::handlers::{create_record, delete_record, get_record, list_records, update_record};
use crate::AppState;

type JsonBody = std::result::Result<Json<Value>, JsonRejection>;

/// Create record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/collections/{kind}", get(list_handler).post(create_handler))
        .route(
            "/collections/{kind}/{id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
}

/// GET /collections/{kind}
async fn list_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<Record>>> {
    let kind = parse_kind(&kind)?;
    Ok(Json(list_records(&state.store, kind).await))
}

/// POST /collections/{kind}
async fn create_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Record>)> {
    let kind = parse_kind(&kind)?;
    let Json(body) = body?;
    let record = create_record(&state.store, kind, body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /collections/{kind}/{id}
async fn get_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<Record>> {
    let kind = parse_kind(&kind)?;
    Ok(Json(get_record(&state.store, kind, &id).await?))
}

/// PUT /collections/{kind}/{id}
async fn update_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    body: JsonBody,
) -> Result<Json<Record>> {
    let kind = parse_kind(&kind)?;
    let Json(body) = body?;
    Ok(Json(update_record(&state.store, kind, &id, body).await?))
}

/// DELETE /collections/{kind}/{id}
async fn delete_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let kind = parse_kind(&kind)?;
    delete_record(&state.store, kind, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
