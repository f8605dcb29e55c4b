//! Question answering endpoints.

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::{ChatRequest, ChatResponse, QueryRequest, QueryResponse};

/// `POST /api/query` - answer a question from the stored documents.
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    if request.query.trim().is_empty() {
        return Err(ApiError::Validation("query must not be empty".to_string()));
    }

    let answer = state.pipeline().answer(&request.query).await?;
    info!(has_answer = answer.result.has_answer, sources = answer.sources.len(), "query answered");

    Ok(Json(QueryResponse::from(answer)))
}

/// `POST /api/chat` - conversational variant with a lower retrieval bar.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if request.input.trim().is_empty() {
        return Err(ApiError::Validation("input must not be empty".to_string()));
    }

    let response = state.pipeline().chat(&request.input).await?;
    Ok(Json(ChatResponse { response }))
}
