//! API route table.

pub mod documents;
pub mod ingest;
pub mod query;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

/// Build all `/api` routes.
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/query", post(query::query))
        .route("/chat", post(query::chat))
        .route("/upload", post(ingest::upload).layer(DefaultBodyLimit::max(max_upload_size)))
        .route("/embed-documents", post(ingest::embed_documents))
        .route("/documents", get(documents::list_documents))
        .route("/documents/{id}", get(documents::get_document))
        .route("/documents/{id}", delete(documents::delete_document))
        .route("/documents/{id}/preview", get(documents::preview_document))
        .route("/info", get(info))
}

/// `GET /api/info` - service banner.
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docqa-server",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document question answering with extractive spans and provenance",
        "endpoints": {
            "POST /api/query": "Answer a question from stored documents",
            "POST /api/chat": "Conversational variant with a lower retrieval bar",
            "POST /api/upload": "Upload a plain-text document",
            "POST /api/embed-documents": "Ingest a batch of pre-extracted documents",
            "GET /api/documents": "List stored documents",
            "GET /api/documents/{id}": "Fetch one document",
            "GET /api/documents/{id}/preview": "Preview with text statistics",
            "DELETE /api/documents/{id}": "Delete a document"
        }
    }))
}
