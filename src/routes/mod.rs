/// Application routes configuration
use crate::handlers::{get_moon, get_object, get_position, get_targets, health, list_catalog, AppState};
use axum::{routing::get, Router};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Planning
        .route("/targets", get(get_targets))
        .route("/moon", get(get_moon))
        .route("/position", get(get_position))
        // Catalog
        .route("/catalog", get(list_catalog))
        .route("/catalog/:id", get(get_object))
        .with_state(state)
}
