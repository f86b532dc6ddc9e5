//! Narrative provider configuration routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::warn;

use super::error_response;
use crate::state::AppState;
use pulse_narrate::{test_api_key, NarrativeConfigUpdate, TestKeyRequest};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/narrative/config",
            get(get_config).put(update_config),
        )
        .route("/narrative/config/test", post(test_key))
}

/// GET /api/narrative/config — current provider config, keys masked.
async fn get_config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let response = state.narrative.read().to_response();
    Json(serde_json::to_value(response).unwrap_or_default())
}

/// PUT /api/narrative/config — merge an update and persist it.
async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<NarrativeConfigUpdate>,
) -> impl IntoResponse {
    let response = {
        let mut config = state.narrative.write();
        config.apply_update(&update);
        if let Err(e) = config.save() {
            warn!("Failed to persist narrative config: {}", e);
        }
        config.to_response()
    };

    match serde_json::to_value(response) {
        Ok(v) => (StatusCode::OK, Json(v)),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Serialization failed", e),
    }
}

/// POST /api/narrative/config/test — probe a key without saving it.
async fn test_key(Json(req): Json<TestKeyRequest>) -> Json<serde_json::Value> {
    match test_api_key(&req.provider, &req.api_key).await {
        Ok(()) => Json(serde_json::json!({ "valid": true, "provider": req.provider })),
        Err(e) => Json(serde_json::json!({
            "valid": false,
            "provider": req.provider,
            "error": e,
        })),
    }
}
