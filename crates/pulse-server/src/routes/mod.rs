//! HTTP route handlers — matches the existing dashboard API surface.

pub mod analyse;
pub mod collections;
pub mod narrative;
pub mod status;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(status::routes())
        .merge(collections::routes())
        .merge(analyse::routes())
        .merge(narrative::routes())
}

/// Standard error envelope: `{ "error": ..., "detail": ... }`.
pub fn error_response(
    status: StatusCode,
    error: &str,
    detail: impl std::fmt::Display,
) -> (StatusCode, Json<serde_json::Value>) {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "detail": detail.to_string(),
        })),
    )
}
