//! Shared application state.

use std::sync::Arc;

use tracing::info;

use docqa_core::{
    ChunkStore, HashedEmbedder, InMemoryIndex, QaConfig, QaPipeline, SpanScorer,
};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::extract::{PlainTextExtractor, TextExtractor};

struct AppStateInner {
    config: ServerConfig,
    pipeline: QaPipeline,
    extractor: Box<dyn TextExtractor>,
}

/// Cloneable handle to the shared pipeline and its collaborators.
///
/// Built once at startup; handlers share it read-mostly, with the only
/// interior locking inside the embedding index.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    /// Build the pipeline behind the given scorer. Any failure here is
    /// fatal to startup.
    pub fn new(config: ServerConfig, scorer: Arc<dyn SpanScorer>) -> Result<Self> {
        let embedder = Arc::new(HashedEmbedder::new(config.embedding_dimensions));
        info!(dimensions = config.embedding_dimensions, "embedder initialized");

        let store = Arc::new(ChunkStore::new(Arc::new(InMemoryIndex::new(embedder))));
        info!("chunk store initialized");

        let pipeline = QaPipeline::builder()
            .config(QaConfig::default())
            .store(store)
            .scorer(scorer)
            .build()?;
        info!("pipeline initialized");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                extractor: Box::new(PlainTextExtractor),
            }),
        })
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// The question-answering pipeline.
    pub fn pipeline(&self) -> &QaPipeline {
        &self.inner.pipeline
    }

    /// The chunk store backing the pipeline.
    pub fn store(&self) -> &Arc<ChunkStore> {
        self.inner.pipeline.store()
    }

    /// The upload text extractor.
    pub fn extractor(&self) -> &dyn TextExtractor {
        self.inner.extractor.as_ref()
    }
}
