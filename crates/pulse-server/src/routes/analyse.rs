//! The analysis route: local pipeline, optional narrative fetch, persist.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{info, warn};

use super::error_response;
use crate::state::AppState;
use pulse_analyze::{compose_record, run_local};
use pulse_narrate::{build_prompt, extract_json, normalize, NarrativeFetcher};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/analyse/{keyword}", post(analyse_collection))
}

/// POST /api/analyse/{keyword} — run the full pipeline over a collection
/// and write the result onto every document.
async fn analyse_collection(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
) -> impl IntoResponse {
    let keyword = keyword.trim().to_string();
    if keyword.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Invalid keyword",
            "keyword must not be blank",
        );
    }

    let stored = match state.store.get_documents(&keyword) {
        Ok(docs) => docs,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Store read failed", e),
    };
    if stored.is_empty() {
        return error_response(
            StatusCode::NOT_FOUND,
            "No documents found",
            format!("collection '{}' is empty or does not exist", keyword),
        );
    }

    let docs: Vec<_> = stored.iter().map(|d| d.to_social()).collect();
    let local = run_local(&docs);

    // Narrative fetch is best-effort: any failure falls through to the
    // locally composed record. Access is resolved before the await so the
    // config lock is never held across it.
    let access = state.narrative.read().resolve_access();
    let remote = if access.is_enabled() {
        let fetcher = NarrativeFetcher::new(access);
        let prompt = build_prompt(&keyword, &docs);
        match fetcher.fetch(&prompt).await {
            Some(raw) => {
                let parsed = extract_json(&raw).and_then(|v| normalize(&v));
                if parsed.is_none() {
                    warn!("Narrative response for '{}' was unusable", keyword);
                }
                parsed
            }
            None => None,
        }
    } else {
        None
    };

    let record = compose_record(&local, remote);

    let updated = match state.store.apply_analysis(&keyword, &record) {
        Ok(n) => n,
        Err(e) => {
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Persistence failed", e)
        }
    };
    info!(
        "Analyzed '{}': {} documents classified, {} rows updated",
        keyword, local.selected_count, updated
    );

    match serde_json::to_value(&record) {
        Ok(analysis) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "keyword": keyword,
                "analysis": analysis,
            })),
        ),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Serialization failed", e),
    }
}
