//! Chunk store: validated persistence over the embedding index.

use std::sync::Arc;

use tracing::info;

use crate::chunk::{Chunk, Metadata, MetaValue};
use crate::error::{QaError, Result};
use crate::index::{EmbeddingIndex, IndexHit, IndexRecord};

impl From<IndexRecord> for Chunk {
    fn from(record: IndexRecord) -> Self {
        Chunk { id: record.id, text: record.text, metadata: record.metadata }
    }
}

impl From<&Chunk> for IndexRecord {
    fn from(chunk: &Chunk) -> Self {
        IndexRecord {
            id: chunk.id.clone(),
            text: chunk.text.clone(),
            metadata: chunk.metadata.clone(),
        }
    }
}

/// Persists ingested text chunks keyed by opaque id, delegating vector
/// similarity search to an [`EmbeddingIndex`].
///
/// All mutating operations are immediately visible to subsequent
/// queries. Id uniqueness is enforced by the index: re-adding an id
/// overwrites the chunk.
pub struct ChunkStore {
    index: Arc<dyn EmbeddingIndex>,
}

impl ChunkStore {
    /// Create a store over the given index.
    pub fn new(index: Arc<dyn EmbeddingIndex>) -> Self {
        Self { index }
    }

    /// Add or overwrite chunks.
    ///
    /// `ids` and `metadatas`, when supplied, must be the same length as
    /// `texts`. Missing ids are generated sequentially as `doc_{i}`;
    /// missing metadata defaults to `{"source": "unknown"}`. Returns
    /// the ids the chunks were stored under.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Validation`] if `texts` is empty or the
    /// sequence lengths differ.
    pub async fn upsert(
        &self,
        ids: Option<Vec<String>>,
        texts: Vec<String>,
        metadatas: Option<Vec<Metadata>>,
    ) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Err(QaError::Validation("no texts provided for embedding".to_string()));
        }

        let ids = match ids {
            Some(ids) => {
                if ids.len() != texts.len() {
                    return Err(QaError::Validation(format!(
                        "got {} ids for {} texts",
                        ids.len(),
                        texts.len()
                    )));
                }
                ids
            }
            None => (0..texts.len()).map(|i| format!("doc_{i}")).collect(),
        };

        let metadatas = match metadatas {
            Some(metadatas) => {
                if metadatas.len() != texts.len() {
                    return Err(QaError::Validation(format!(
                        "got {} metadata entries for {} texts",
                        metadatas.len(),
                        texts.len()
                    )));
                }
                metadatas
            }
            None => texts
                .iter()
                .map(|_| {
                    let mut metadata = Metadata::new();
                    metadata.insert("source".to_string(), MetaValue::from("unknown"));
                    metadata
                })
                .collect(),
        };

        let records: Vec<IndexRecord> = ids
            .iter()
            .zip(texts)
            .zip(metadatas)
            .map(|((id, text), metadata)| IndexRecord { id: id.clone(), text, metadata })
            .collect();

        self.index.add(&records).await?;
        info!(count = records.len(), "stored chunks");
        Ok(ids)
    }

    /// Return up to `top_k` hits ranked by ascending distance.
    /// An empty store yields an empty result.
    pub async fn query(&self, text: &str, top_k: usize) -> Result<Vec<IndexHit>> {
        self.index.query(text, top_k).await
    }

    /// Point lookup by id. `None` means the id is not stored.
    pub async fn get(&self, id: &str) -> Result<Option<Chunk>> {
        Ok(self.index.get(id).await?.map(Chunk::from))
    }

    /// All stored chunks, for listing at the boundary.
    pub async fn list(&self) -> Result<Vec<Chunk>> {
        Ok(self.index.get_all().await?.into_iter().map(Chunk::from).collect())
    }

    /// Delete a chunk by id. Deleting a missing id is a no-op.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.index.delete(&[id]).await?;
        info!(id, "deleted chunk");
        Ok(())
    }

    /// Number of stored chunks.
    pub async fn count(&self) -> Result<usize> {
        self.index.count().await
    }
}
