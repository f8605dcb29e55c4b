//! Ingestion endpoints: file upload and pre-extracted document batches.

use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use docqa_core::Metadata;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::{text_stats, EmbedDocumentsRequest, EmbedDocumentsResponse, UploadResponse};

/// `POST /api/upload` - upload one file, extract its text, and store it
/// as a single document. Extraction failure ingests nothing.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart body: {e}")))?
        .ok_or_else(|| ApiError::Validation("No file provided".to_string()))?;

    let filename = field
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| ApiError::Validation("Uploaded field has no filename".to_string()))?;
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to read upload: {e}")))?;

    info!(filename = %filename, size = bytes.len(), "processing upload");

    let text = state.extractor().extract(&filename, &bytes)?;
    let (text_length, word_count, paragraph_count) = text_stats(&text);

    let metadata: Metadata = [
        ("source".to_string(), filename.as_str().into()),
        ("text_length".to_string(), (text_length as i64).into()),
        ("word_count".to_string(), (word_count as i64).into()),
        ("paragraph_count".to_string(), (paragraph_count as i64).into()),
        ("uploaded_at".to_string(), Utc::now().to_rfc3339().into()),
    ]
    .into();

    let id = format!("doc_{}", Uuid::new_v4());
    state.store().upsert(Some(vec![id.clone()]), vec![text], Some(vec![metadata])).await?;
    info!(id = %id, filename = %filename, "document stored");

    Ok(Json(UploadResponse { id, filename, text_length }))
}

/// `POST /api/embed-documents` - ingest a batch of pre-extracted
/// documents, best effort.
pub async fn embed_documents(
    State(state): State<AppState>,
    Json(request): Json<EmbedDocumentsRequest>,
) -> Result<Json<EmbedDocumentsResponse>> {
    if request.documents.is_empty() {
        return Err(ApiError::Validation("documents must not be empty".to_string()));
    }

    let report = state.pipeline().ingest_batch(&request.documents).await;
    Ok(Json(EmbedDocumentsResponse::from(report)))
}
