//! Document management endpoints.

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::{
    text_stats, DocumentListResponse, DocumentPreview, DocumentResponse, DocumentSummary,
};

const PREVIEW_CHARS: usize = 500;

/// `GET /api/documents` - list all stored documents.
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentListResponse>> {
    let chunks = state.store().list().await?;
    let documents: Vec<DocumentSummary> = chunks.iter().map(DocumentSummary::from).collect();
    let total_count = documents.len();

    Ok(Json(DocumentListResponse { documents, total_count }))
}

/// `GET /api/documents/{id}` - fetch one document with its full text.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>> {
    let chunk = state.store().get(&id).await?.ok_or_else(|| ApiError::NotFound(id.clone()))?;

    Ok(Json(DocumentResponse {
        id: chunk.id.clone(),
        source: chunk.source().unwrap_or("unknown").to_string(),
        text: chunk.text,
    }))
}

/// `GET /api/documents/{id}/preview` - first part of the text plus
/// basic text statistics.
pub async fn preview_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentPreview>> {
    let chunk = state.store().get(&id).await?.ok_or_else(|| ApiError::NotFound(id.clone()))?;

    let (text_length, word_count, paragraph_count) = text_stats(&chunk.text);
    let preview: String = chunk.text.chars().take(PREVIEW_CHARS).collect();

    Ok(Json(DocumentPreview {
        id: chunk.id.clone(),
        source: chunk.source().unwrap_or("unknown").to_string(),
        preview,
        text_length,
        word_count,
        paragraph_count,
    }))
}

/// `DELETE /api/documents/{id}` - remove a document from the store.
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let chunk = state.store().get(&id).await?.ok_or_else(|| ApiError::NotFound(id.clone()))?;

    state.store().delete(&id).await?;
    info!(id = %id, "document deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "document_id": id,
        "source": chunk.source().unwrap_or("unknown"),
    })))
}
