//! Retriever: query-to-ranked-matches over the chunk store.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chunk::{Chunk, Match, MetaValue};
use crate::store::ChunkStore;

/// The result envelope of a retrieval call.
///
/// Store failures do not propagate: they yield an empty match list plus
/// a `degraded` marker. This favors availability over correctness
/// signaling; the caller decides how to surface the degradation.
#[derive(Debug, Default)]
pub struct Retrieval {
    /// Surviving matches, sorted by descending similarity.
    pub matches: Vec<Match>,
    /// Set when the store failed and the match list is empty because
    /// of it, not because nothing was relevant.
    pub degraded: Option<String>,
}

/// Converts a query into a ranked list of candidate chunks above a
/// similarity threshold.
pub struct Retriever {
    store: Arc<ChunkStore>,
}

impl Retriever {
    /// Create a retriever over the given store.
    pub fn new(store: Arc<ChunkStore>) -> Self {
        Self { store }
    }

    /// Retrieve up to `top_k` chunks with `similarity >= threshold`.
    ///
    /// Similarity is derived as `1 - distance` from the index distance.
    /// Out-of-range similarities are not clamped; a negative similarity
    /// falls below any non-negative threshold and is dropped with the
    /// rest. An empty query short-circuits to an empty result without
    /// touching the store.
    pub async fn retrieve(&self, query: &str, top_k: usize, threshold: f32) -> Retrieval {
        if query.is_empty() {
            warn!("empty query provided");
            return Retrieval::default();
        }

        let hits = match self.store.query(query, top_k).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "retrieval degraded: store query failed");
                return Retrieval { matches: Vec::new(), degraded: Some(e.to_string()) };
            }
        };

        let mut matches = Vec::with_capacity(hits.len());
        for hit in hits {
            let similarity = 1.0 - hit.distance;
            if similarity < threshold {
                debug!(
                    id = %hit.record.id,
                    similarity,
                    threshold,
                    "skipping chunk below threshold"
                );
                continue;
            }

            let mut chunk = Chunk::from(hit.record);
            // Some ingestion paths store the text on metadata only.
            if chunk.text.is_empty() {
                if let Some(MetaValue::Str(text)) = chunk.metadata.get("text") {
                    chunk.text = text.clone();
                }
            }

            matches.push(Match { chunk, similarity, raw_distance: hit.distance });
        }

        // Stable sort: ties keep the store's ascending-distance order.
        matches.sort_by(|a, b| {
            b.similarity.partial_cmp(&a.similarity).unwrap_or(std::cmp::Ordering::Equal)
        });

        info!(count = matches.len(), query = %truncate(query, 80), "retrieved chunks");
        Retrieval { matches, degraded: None }
    }
}

/// Truncate a string for log output.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
