//! Data types for chunks, matches, and answers.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fallback answer when the context is empty or too short to score.
pub const NO_CONTEXT_ANSWER: &str = "No context provided to answer the question.";

/// Fallback answer when no valid span was found in any context tile.
pub const NO_ANSWER_FOUND: &str =
    "I couldn't find an answer to your question in the provided documents.";

/// Fallback answer when retrieval produced no chunks at all.
pub const NO_RELEVANT_DOCUMENTS: &str = "No relevant documents found to answer your question.";

/// Fixed chat reply when low-threshold retrieval comes back empty.
pub const CHAT_NO_INFORMATION: &str =
    "I don't have enough information to answer that question based on the uploaded documents.";

/// A scalar metadata value attached to a chunk.
///
/// Metadata maps string keys to scalars only (source filename, word
/// counts, timestamps). Serialized untagged so the JSON shape matches
/// plain scalar fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// A string value.
    Str(String),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
}

impl MetaValue {
    /// Return the string content if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Str(s) => write!(f, "{s}"),
            MetaValue::Int(i) => write!(f, "{i}"),
            MetaValue::Float(x) => write!(f, "{x}"),
            MetaValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Str(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Str(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Int(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Float(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

/// Chunk metadata: string keys mapped to scalar values.
pub type Metadata = HashMap<String, MetaValue>;

/// A stored unit of ingested text, addressable by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Opaque unique identifier. Re-adding the same id overwrites.
    pub id: String,
    /// Raw extracted text.
    pub text: String,
    /// Caller-supplied metadata (source filename, counts, timestamps).
    pub metadata: Metadata,
}

impl Chunk {
    /// Create a chunk with the given id, text, and metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>, metadata: Metadata) -> Self {
        Self { id: id.into(), text: text.into(), metadata }
    }

    /// The `source` metadata value, if present.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(MetaValue::as_str)
    }
}

/// A [`Chunk`] annotated with query-time relevance. Computed per query,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Derived relevance in `[0, 1]` for well-formed embeddings,
    /// computed as `1 - raw_distance`. Higher is more relevant.
    pub similarity: f32,
    /// The untransformed index distance, preserved for diagnostics.
    pub raw_distance: f32,
}

/// The output of span extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    /// The extracted substring, or a fixed fallback sentence.
    pub answer: String,
    /// Model logit sum for the winning span; not a probability.
    /// Higher is better. `0.0` when no span was found.
    pub confidence: f32,
    /// True only if at least one non-empty span was found.
    pub has_answer: bool,
}

impl AnswerResult {
    /// A `has_answer = false` result carrying a fixed fallback message.
    pub fn not_found(answer: impl Into<String>) -> Self {
        Self { answer: answer.into(), confidence: 0.0, has_answer: false }
    }
}

/// An [`AnswerResult`] plus the provenance of the chunks it was
/// extracted from, carried so the boundary layer can report sources
/// without re-querying the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnswer {
    /// The extraction outcome.
    pub result: AnswerResult,
    /// Source identifiers (originating filenames) from matched chunks.
    pub sources: Vec<String>,
}

impl QueryAnswer {
    /// Wrap an extraction outcome with no sources.
    pub fn without_sources(result: AnswerResult) -> Self {
        Self { result, sources: Vec::new() }
    }
}
