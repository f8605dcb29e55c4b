//! Embedding index trait: the external nearest-neighbor collaborator.

use async_trait::async_trait;

use crate::chunk::Metadata;
use crate::error::Result;

/// A record stored in the embedding index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    /// Opaque unique identifier.
    pub id: String,
    /// The indexed text.
    pub text: String,
    /// Metadata carried alongside the text.
    pub metadata: Metadata,
}

/// A query hit: a record paired with its distance to the query.
#[derive(Debug, Clone)]
pub struct IndexHit {
    /// The matching record.
    pub record: IndexRecord,
    /// Index distance; smaller is more similar. Assumed to roughly
    /// correspond to `1 - cosine_similarity`.
    pub distance: f32,
}

/// The contract the pipeline requires from a vector similarity index.
///
/// Implementations take text in and handle embedding internally
/// (text-in, vector-out). This crate does not specify the
/// nearest-neighbor engine itself.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_core::{EmbeddingIndex, InMemoryIndex};
///
/// let index = InMemoryIndex::new(embedder);
/// index.add(&records).await?;
/// let hits = index.query("lease termination", 5).await?;
/// ```
#[async_trait]
pub trait EmbeddingIndex: Send + Sync {
    /// Add or overwrite records, keyed by id.
    async fn add(&self, records: &[IndexRecord]) -> Result<()>;

    /// Return up to `top_k` records ranked by ascending distance.
    /// An empty index yields an empty result, not an error.
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<IndexHit>>;

    /// Point lookup by id. Missing ids are `None`, not an error.
    async fn get(&self, id: &str) -> Result<Option<IndexRecord>>;

    /// Return all stored records, in no particular order.
    async fn get_all(&self) -> Result<Vec<IndexRecord>>;

    /// Delete records by id. Missing ids are ignored.
    async fn delete(&self, ids: &[&str]) -> Result<()>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize>;
}
