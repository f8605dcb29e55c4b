//! In-memory embedding index using cosine distance.
//!
//! [`InMemoryIndex`] embeds stored texts with an [`Embedder`] and keeps
//! them in a `HashMap` behind a `tokio::sync::RwLock`. Suitable for
//! development, testing, and small corpora.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::embedding::Embedder;
use crate::error::Result;
use crate::index::{EmbeddingIndex, IndexHit, IndexRecord};

struct Stored {
    record: IndexRecord,
    embedding: Vec<f32>,
}

/// An in-memory [`EmbeddingIndex`] with upsert semantics.
///
/// `add` with an existing id overwrites the record and its embedding.
/// Queries embed the query text with the same [`Embedder`] and rank by
/// ascending cosine distance (`1 - cosine_similarity`).
pub struct InMemoryIndex {
    embedder: Arc<dyn Embedder>,
    records: RwLock<HashMap<String, Stored>>,
}

impl InMemoryIndex {
    /// Create an empty index over the given embedder.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder, records: RwLock::new(HashMap::new()) }
    }
}

/// Cosine similarity of two vectors. Zero-magnitude vectors score 0.0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl EmbeddingIndex for InMemoryIndex {
    async fn add(&self, records: &[IndexRecord]) -> Result<()> {
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let mut store = self.records.write().await;
        for (record, embedding) in records.iter().zip(embeddings) {
            store.insert(record.id.clone(), Stored { record: record.clone(), embedding });
        }
        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<IndexHit>> {
        let query_embedding = self.embedder.embed(text).await?;

        let store = self.records.read().await;
        let mut hits: Vec<IndexHit> = store
            .values()
            .map(|stored| IndexHit {
                record: stored.record.clone(),
                distance: 1.0 - cosine_similarity(&stored.embedding, &query_embedding),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn get(&self, id: &str) -> Result<Option<IndexRecord>> {
        let store = self.records.read().await;
        Ok(store.get(id).map(|stored| stored.record.clone()))
    }

    async fn get_all(&self) -> Result<Vec<IndexRecord>> {
        let store = self.records.read().await;
        Ok(store.values().map(|stored| stored.record.clone()).collect())
    }

    async fn delete(&self, ids: &[&str]) -> Result<()> {
        let mut store = self.records.write().await;
        for id in ids {
            store.remove(*id);
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let store = self.records.read().await;
        Ok(store.len())
    }
}
