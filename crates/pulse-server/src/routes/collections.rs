//! Collection routes — document ingestion, listing, analysis access.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use super::error_response;
use crate::state::AppState;
use pulse_core::SocialDocument;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/collections", get(list_collections))
        .route(
            "/collections/{name}",
            get(get_collection).delete(delete_collection),
        )
        .route("/collections/{name}/documents", post(add_documents))
        .route(
            "/collections/{name}/analysis",
            get(get_analysis).patch(patch_analysis),
        )
}

// ---------------------------------------------------------------
// Collections
// ---------------------------------------------------------------

async fn list_collections(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.list_collections() {
        Ok(collections) => {
            let total = collections.len();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "collections": collections,
                    "total": total,
                })),
            )
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Store read failed", e),
    }
}

async fn get_collection(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.store.get_documents(&name) {
        Ok(docs) if docs.is_empty() => error_response(
            StatusCode::NOT_FOUND,
            "Collection not found",
            format!("collection '{}' is empty or does not exist", name),
        ),
        Ok(docs) => {
            let total = docs.len();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "collection": name,
                    "documents": docs,
                    "total": total,
                })),
            )
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Store read failed", e),
    }
}

async fn delete_collection(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_collection(&name) {
        Ok(0) => error_response(
            StatusCode::NOT_FOUND,
            "Collection not found",
            format!("collection '{}' does not exist", name),
        ),
        Ok(deleted) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "collection": name,
                "deleted": deleted,
            })),
        ),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Delete failed", e),
    }
}

// ---------------------------------------------------------------
// Documents
// ---------------------------------------------------------------

#[derive(Deserialize)]
struct AddDocumentsRequest {
    documents: Vec<SocialDocument>,
}

async fn add_documents(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<AddDocumentsRequest>,
) -> impl IntoResponse {
    if req.documents.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "No documents",
            "request body must contain at least one document",
        );
    }

    match state.store.upsert_documents(&name, &req.documents) {
        Ok(written) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "collection": name,
                "written": written,
            })),
        ),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Ingestion failed", e),
    }
}

// ---------------------------------------------------------------
// Analysis access
// ---------------------------------------------------------------

/// GET /api/collections/{name}/analysis — the stored analysis record.
/// Every document carries the same record, so the first one is canonical.
async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.store.get_analyses(&name) {
        Ok(analyses) => match analyses.into_iter().next() {
            Some(analysis) => (
                StatusCode::OK,
                Json(serde_json::json!({
                    "keyword": name,
                    "analysis": analysis,
                })),
            ),
            None => error_response(
                StatusCode::NOT_FOUND,
                "No analysis found",
                format!("collection '{}' has not been analyzed", name),
            ),
        },
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Store read failed", e),
    }
}

/// PATCH /api/collections/{name}/analysis — merge manual overrides into the
/// stored analysis of every document. Only the `overrides` field changes.
async fn patch_analysis(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(overrides): Json<serde_json::Value>,
) -> impl IntoResponse {
    if !overrides.is_object() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Invalid overrides",
            "request body must be a JSON object",
        );
    }

    match state.store.merge_overrides(&name, &overrides) {
        Ok(0) => error_response(
            StatusCode::NOT_FOUND,
            "Collection not found",
            format!("collection '{}' does not exist", name),
        ),
        Ok(updated) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "collection": name,
                "updatedCount": updated,
            })),
        ),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Update failed", e),
    }
}
