//! Query orchestrator: retrieval composed with span extraction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::chunk::{
    AnswerResult, Chunk, Match, Metadata, QueryAnswer, CHAT_NO_INFORMATION, NO_RELEVANT_DOCUMENTS,
};
use crate::config::QaConfig;
use crate::error::{QaError, Result, SoftError};
use crate::extractor::{SpanExtractor, SpanScorer};
use crate::retriever::{truncate, Retriever};
use crate::store::ChunkStore;

/// Log an orchestrator operation at its public boundary, with the key
/// input truncated for size.
fn log_operation(op: &'static str, input: &str) {
    info!(op, input = %truncate(input, 80), "operation invoked");
}

/// A document submitted for batch ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestDocument {
    /// The document text.
    #[serde(alias = "document")]
    pub text: String,
    /// Metadata stored alongside the text.
    #[serde(default)]
    pub metadata: Metadata,
}

/// Outcome of a best-effort batch ingestion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Documents submitted.
    pub total: usize,
    /// Documents actually stored.
    pub inserted: usize,
    /// Zero-based indices of batches that failed after all retries.
    pub failed_batches: Vec<usize>,
}

/// The pipeline: a dependency-injected composition of [`ChunkStore`],
/// [`Retriever`], and [`SpanExtractor`], constructed once at process
/// start and shared read-mostly across query handlers.
///
/// Public operations never let a collaborator error escape unhandled:
/// they log it and return a [`SoftError`] carrying a displayable
/// message. Degraded retrieval and no-answer outcomes are `Ok`.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_core::{QaPipeline, QaConfig};
///
/// let pipeline = QaPipeline::builder()
///     .config(QaConfig::default())
///     .store(store)
///     .scorer(scorer)
///     .build()?;
///
/// let answer = pipeline.answer("what is the notice period?").await?;
/// ```
pub struct QaPipeline {
    config: QaConfig,
    store: Arc<ChunkStore>,
    retriever: Retriever,
    extractor: SpanExtractor,
}

impl std::fmt::Debug for QaPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QaPipeline {
    /// Create a new [`QaPipelineBuilder`].
    pub fn builder() -> QaPipelineBuilder {
        QaPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Return a reference to the chunk store.
    pub fn store(&self) -> &Arc<ChunkStore> {
        &self.store
    }

    /// Answer a question against retrieved chunks.
    ///
    /// Retrieves with the configured `top_k` and threshold, then
    /// extracts. When retrieval yields nothing (empty store, nothing
    /// relevant, or degraded store), returns the fixed "no relevant
    /// documents" outcome without invoking the extractor.
    pub async fn answer(&self, query: &str) -> std::result::Result<QueryAnswer, SoftError> {
        log_operation("answer", query);

        let retrieval = self
            .retriever
            .retrieve(query, self.config.top_k, self.config.similarity_threshold)
            .await;
        if let Some(reason) = &retrieval.degraded {
            warn!(reason, "answering with degraded retrieval");
        }
        self.answer_matches(query, &retrieval.matches).await
    }

    /// Answer a question against caller-provided chunks, bypassing
    /// retrieval. An empty slice yields the "no relevant documents"
    /// outcome.
    pub async fn answer_with(
        &self,
        query: &str,
        chunks: &[Chunk],
    ) -> std::result::Result<QueryAnswer, SoftError> {
        log_operation("answer_with", query);

        let matches: Vec<Match> = chunks
            .iter()
            .map(|chunk| Match { chunk: chunk.clone(), similarity: 1.0, raw_distance: 0.0 })
            .collect();
        self.answer_matches(query, &matches).await
    }

    /// Chat path: lower-threshold retrieval, fixed reply when nothing
    /// is found.
    pub async fn chat(&self, input: &str) -> std::result::Result<String, SoftError> {
        log_operation("chat", input);

        let retrieval = self
            .retriever
            .retrieve(input, self.config.chat_top_k, self.config.chat_similarity_threshold)
            .await;
        if retrieval.matches.is_empty() {
            return Ok(CHAT_NO_INFORMATION.to_string());
        }

        let answer = self.answer_matches(input, &retrieval.matches).await?;
        Ok(answer.result.answer)
    }

    /// Best-effort batch ingestion: fixed-size batches processed
    /// sequentially, each retried up to the configured count, failures
    /// logged and skipped without aborting subsequent batches.
    pub async fn ingest_batch(&self, documents: &[IngestDocument]) -> BatchReport {
        info!(op = "ingest_batch", total = documents.len(), "operation invoked");

        let mut report =
            BatchReport { total: documents.len(), inserted: 0, failed_batches: Vec::new() };

        for (batch_index, batch) in documents.chunks(self.config.ingest_batch_size).enumerate() {
            let ids: Vec<String> =
                batch.iter().map(|_| format!("doc_{}", Uuid::new_v4())).collect();
            let texts: Vec<String> = batch.iter().map(|d| d.text.clone()).collect();
            let metadatas: Vec<Metadata> = batch.iter().map(|d| d.metadata.clone()).collect();

            let mut stored = false;
            for attempt in 1..=self.config.ingest_max_retries {
                match self
                    .store
                    .upsert(Some(ids.clone()), texts.clone(), Some(metadatas.clone()))
                    .await
                {
                    Ok(_) => {
                        info!(batch = batch_index, count = batch.len(), "batch inserted");
                        stored = true;
                        break;
                    }
                    Err(e) => {
                        error!(batch = batch_index, attempt, error = %e, "batch insert failed");
                    }
                }
            }

            if stored {
                report.inserted += batch.len();
            } else {
                error!(batch = batch_index, "all attempts to insert batch failed");
                report.failed_batches.push(batch_index);
            }
        }

        report
    }

    /// Shared tail of the answer paths: concatenate chunk texts in
    /// retrieval order with a blank-line separator, extract, and attach
    /// provenance.
    async fn answer_matches(
        &self,
        query: &str,
        matches: &[Match],
    ) -> std::result::Result<QueryAnswer, SoftError> {
        if matches.is_empty() {
            warn!("no documents available for query");
            return Ok(QueryAnswer::without_sources(AnswerResult::not_found(
                NO_RELEVANT_DOCUMENTS,
            )));
        }

        let combined = matches
            .iter()
            .map(|m| m.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut sources = Vec::new();
        for m in matches {
            if let Some(source) = m.chunk.source() {
                if !sources.iter().any(|s| s == source) {
                    sources.push(source.to_string());
                }
            }
        }

        match self.extractor.extract(query, &combined).await {
            Ok(result) => Ok(QueryAnswer { result, sources }),
            Err(e) => {
                error!(error = %e, "extraction failed");
                Err(SoftError::new("answer", format!("Error processing your question: {e}")))
            }
        }
    }
}

/// Builder for constructing a [`QaPipeline`].
#[derive(Default)]
pub struct QaPipelineBuilder {
    config: Option<QaConfig>,
    store: Option<Arc<ChunkStore>>,
    scorer: Option<Arc<dyn SpanScorer>>,
}

impl QaPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: QaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the chunk store.
    pub fn store(mut self, store: Arc<ChunkStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the span-scoring model collaborator.
    pub fn scorer(mut self, scorer: Arc<dyn SpanScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Build the [`QaPipeline`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] if any required field is missing.
    pub fn build(self) -> Result<QaPipeline> {
        let config = self.config.unwrap_or_default();
        let store =
            self.store.ok_or_else(|| QaError::Config("store is required".to_string()))?;
        let scorer =
            self.scorer.ok_or_else(|| QaError::Config("scorer is required".to_string()))?;

        let retriever = Retriever::new(Arc::clone(&store));
        let extractor = SpanExtractor::new(scorer, &config);

        Ok(QaPipeline { config, store, retriever, extractor })
    }
}
