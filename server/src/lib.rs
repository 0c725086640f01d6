//! Larder Server - snapshot sync server for recipes and groceries.
//!
//! Clients push their full view of each collection to `POST /sync`; the server
//! reconciles it with the persisted canonical state using `larder-engine` and
//! returns the result. Single-record endpoints live under `/collections`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use larder_engine::Reconciler;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::store::StoreGateway;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreGateway>,
    pub reconciler: Arc<Reconciler>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: StoreGateway, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            reconciler: Arc::new(Reconciler::new()),
            config: Arc::new(config),
        }
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(DefaultBodyLimit::max(state.config.max_body_bytes)),
        )
        .with_state(state)
}
