//! Status and server info routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(get_status))
}

/// GET /api/status — service health and store counts.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let stats = state.store.get_stats().ok();
    let narrative_enabled = state.narrative.read().resolve_access().is_enabled();

    Json(serde_json::json!({
        "status": "healthy",
        "service": "socialpulse",
        "collections": stats.as_ref().map(|s| s.collections).unwrap_or(0),
        "documents": stats.as_ref().map(|s| s.documents).unwrap_or(0),
        "analyzedDocuments": stats.as_ref().map(|s| s.analyzed_documents).unwrap_or(0),
        "narrativeEnabled": narrative_enabled,
        "port": state.config.port,
    }))
}
