//! Property tests for retrieval ordering and threshold filtering.

use std::sync::Arc;

use proptest::prelude::*;

use docqa_core::{ChunkStore, HashedEmbedder, InMemoryIndex, Retriever};

const DIM: usize = 32;

/// Generate a short lowercase document text.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-z]{2,8}( [a-z]{2,8}){0,6}"
}

/// **Property: retrieval ordering and filtering**
/// *For any* set of stored texts, query, top_k, and non-negative
/// threshold, retrieval SHALL return at most top_k matches, each with a
/// similarity at or above the threshold, ordered by descending
/// similarity, with no degradation reported by a healthy store.
mod prop_retrieve_ordering_and_filtering {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn matches_bounded_filtered_and_descending(
            texts in proptest::collection::vec(arb_text(), 1..15),
            query in arb_text(),
            top_k in 1usize..20,
            threshold in 0.0f32..1.0f32,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let retrieval = rt.block_on(async {
                let embedder = Arc::new(HashedEmbedder::new(DIM));
                let store = Arc::new(ChunkStore::new(Arc::new(InMemoryIndex::new(embedder))));
                store.upsert(None, texts.clone(), None).await.unwrap();

                Retriever::new(store).retrieve(&query, top_k, threshold).await
            });

            prop_assert!(retrieval.degraded.is_none());
            prop_assert!(retrieval.matches.len() <= top_k);

            for m in &retrieval.matches {
                prop_assert!(
                    m.similarity >= threshold,
                    "similarity {} below threshold {}",
                    m.similarity,
                    threshold,
                );
            }

            for window in retrieval.matches.windows(2) {
                prop_assert!(
                    window[0].similarity >= window[1].similarity,
                    "matches not in descending order: {} < {}",
                    window[0].similarity,
                    window[1].similarity,
                );
            }
        }
    }
}
