//! Assembles the Axum [`Router`] from all handler modules.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    config::NodeConfig,
    handlers::{groups, organizations, podcasts, AppState},
    storage::Storage,
};

/// Build the complete application router with shared state.
pub fn build_router(storage: Arc<dyn Storage>, config: NodeConfig) -> Router {
    let state = AppState { storage, config };

    Router::new()
        // Organizations
        .route("/api/org", post(organizations::create))
        .route("/api/org/{slug}", get(organizations::get))
        // Groups
        .route("/api/group", post(groups::create))
        .route("/api/group/{slug}", get(groups::get))
        // Podcasts
        .route("/api/podcast", post(podcasts::create))
        .route("/api/podcast/{slug}", get(podcasts::get))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
