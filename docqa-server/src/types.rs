//! Request and response bodies for the API.

use serde::{Deserialize, Serialize};

use docqa_core::{BatchReport, Chunk, IngestDocument, QueryAnswer};

/// Body of `POST /api/query`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// The question to answer.
    pub query: String,
}

/// Body returned by `POST /api/query`.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// The extracted answer or a fixed fallback sentence.
    pub response: String,
    /// Logit-sum confidence of the winning span; `0.0` without one.
    pub confidence: f32,
    /// Whether an answer span was actually found.
    pub has_answer: bool,
    /// Originating filenames of the matched chunks.
    pub sources: Vec<String>,
}

impl From<QueryAnswer> for QueryResponse {
    fn from(answer: QueryAnswer) -> Self {
        Self {
            response: answer.result.answer,
            confidence: answer.result.confidence,
            has_answer: answer.result.has_answer,
            sources: answer.sources,
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The chat message.
    pub input: String,
}

/// Body returned by `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The reply text.
    pub response: String,
}

/// Body of `POST /api/embed-documents`.
#[derive(Debug, Deserialize)]
pub struct EmbedDocumentsRequest {
    /// The documents to ingest.
    pub documents: Vec<IngestDocument>,
}

/// Body returned by `POST /api/embed-documents`.
#[derive(Debug, Serialize)]
pub struct EmbedDocumentsResponse {
    /// Documents submitted.
    pub total: usize,
    /// Documents actually stored.
    pub inserted: usize,
    /// Zero-based indices of batches that failed after all retries.
    pub failed_batches: Vec<usize>,
}

impl From<BatchReport> for EmbedDocumentsResponse {
    fn from(report: BatchReport) -> Self {
        Self {
            total: report.total,
            inserted: report.inserted,
            failed_batches: report.failed_batches,
        }
    }
}

/// Body returned by `POST /api/upload`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Generated id of the stored document.
    pub id: String,
    /// Original filename.
    pub filename: String,
    /// Extracted text length in characters.
    pub text_length: usize,
}

/// One stored document in listings.
#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    /// The document id.
    pub id: String,
    /// Originating filename, when recorded at ingestion.
    pub source: String,
    /// Text length in characters.
    pub text_length: usize,
}

impl From<&Chunk> for DocumentSummary {
    fn from(chunk: &Chunk) -> Self {
        Self {
            id: chunk.id.clone(),
            source: chunk.source().unwrap_or("unknown").to_string(),
            text_length: chunk.text.chars().count(),
        }
    }
}

/// Body returned by `GET /api/documents`.
#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    /// The stored documents.
    pub documents: Vec<DocumentSummary>,
    /// Total stored document count.
    pub total_count: usize,
}

/// Body returned by `GET /api/documents/{id}`.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    /// The document id.
    pub id: String,
    /// Originating filename, when recorded at ingestion.
    pub source: String,
    /// The full document text.
    pub text: String,
}

/// Body returned by `GET /api/documents/{id}/preview`.
#[derive(Debug, Serialize)]
pub struct DocumentPreview {
    /// The document id.
    pub id: String,
    /// Originating filename, when recorded at ingestion.
    pub source: String,
    /// The first part of the text.
    pub preview: String,
    /// Text length in characters.
    pub text_length: usize,
    /// Whitespace-separated word count.
    pub word_count: usize,
    /// Non-blank paragraph count.
    pub paragraph_count: usize,
}

/// Character, word, and paragraph counts for a text.
pub fn text_stats(text: &str) -> (usize, usize, usize) {
    let chars = text.chars().count();
    let words = text.split_whitespace().count();
    let paragraphs = text.split('\n').filter(|p| !p.trim().is_empty()).count();
    (chars, words, paragraphs)
}
