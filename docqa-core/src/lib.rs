//! Retrieval-and-extraction pipeline for document question answering.
//!
//! Given a natural-language question, retrieve the most relevant
//! indexed text chunks and locate the best answer substring inside
//! them, with a confidence score and an explicit "no answer" outcome.
//!
//! The pipeline composes four parts behind collaborator traits:
//!
//! - [`ChunkStore`] over an [`EmbeddingIndex`] — persisted chunks with
//!   vector similarity search
//! - [`Retriever`] — query to ranked, threshold-filtered matches
//! - [`SpanExtractor`] over a [`SpanScorer`] — best answer span across
//!   window tiles of the concatenated context
//! - [`QaPipeline`] — the orchestrator, built once at startup
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa_core::{
//!     ChunkStore, HashedEmbedder, InMemoryIndex, QaConfig, QaPipeline,
//! };
//!
//! let embedder = Arc::new(HashedEmbedder::default());
//! let store = Arc::new(ChunkStore::new(Arc::new(InMemoryIndex::new(embedder))));
//! store.upsert(None, vec!["The notice period is 30 days.".into()], None).await?;
//!
//! let pipeline = QaPipeline::builder()
//!     .config(QaConfig::default())
//!     .store(store)
//!     .scorer(scorer)
//!     .build()?;
//!
//! let answer = pipeline.answer("what is the notice period?").await?;
//! ```

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod error;
pub mod extractor;
pub mod index;
pub mod inmemory;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod pipeline;
pub mod retriever;
pub mod store;

pub use chunk::{
    AnswerResult, Chunk, Match, MetaValue, Metadata, QueryAnswer, CHAT_NO_INFORMATION,
    NO_ANSWER_FOUND, NO_CONTEXT_ANSWER, NO_RELEVANT_DOCUMENTS,
};
pub use config::{QaConfig, QaConfigBuilder};
pub use embedding::{Embedder, HashedEmbedder};
pub use error::{QaError, Result, SoftError};
pub use extractor::{SpanExtractor, SpanScorer, WindowScores};
pub use index::{EmbeddingIndex, IndexHit, IndexRecord};
pub use inmemory::InMemoryIndex;
#[cfg(feature = "onnx")]
pub use onnx::{OnnxScorer, OnnxScorerConfig};
pub use pipeline::{BatchReport, IngestDocument, QaPipeline, QaPipelineBuilder};
pub use retriever::{Retrieval, Retriever};
pub use store::ChunkStore;
