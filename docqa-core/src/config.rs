//! Configuration for the question-answering pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{QaError, Result};

/// Configuration parameters for the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QaConfig {
    /// Number of chunks to retrieve per query.
    pub top_k: usize,
    /// Minimum derived similarity for a retrieved chunk to be kept.
    pub similarity_threshold: f32,
    /// Number of chunks to retrieve on the chat path.
    pub chat_top_k: usize,
    /// Lower similarity threshold used by the chat path.
    pub chat_similarity_threshold: f32,
    /// Maximum answer span length in tokens.
    pub max_answer_length: usize,
    /// Number of top start/end positions considered per window.
    pub candidate_spans: usize,
    /// Contexts shorter than this are not scored at all.
    pub min_context_chars: usize,
    /// Documents per batch during batch ingestion.
    pub ingest_batch_size: usize,
    /// Attempts per batch before it is skipped.
    pub ingest_max_retries: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            similarity_threshold: 0.7,
            chat_top_k: 3,
            chat_similarity_threshold: 0.4,
            max_answer_length: 100,
            candidate_spans: 10,
            min_context_chars: 5,
            ingest_batch_size: 2,
            ingest_max_retries: 3,
        }
    }
}

impl QaConfig {
    /// Create a new builder for constructing a [`QaConfig`].
    pub fn builder() -> QaConfigBuilder {
        QaConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`QaConfig`].
#[derive(Debug, Clone, Default)]
pub struct QaConfigBuilder {
    config: QaConfig,
}

impl QaConfigBuilder {
    /// Set the number of chunks to retrieve per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity for retrieved chunks.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Set the number of chunks retrieved on the chat path.
    pub fn chat_top_k(mut self, k: usize) -> Self {
        self.config.chat_top_k = k;
        self
    }

    /// Set the chat path similarity threshold.
    pub fn chat_similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.chat_similarity_threshold = threshold;
        self
    }

    /// Set the maximum answer span length in tokens.
    pub fn max_answer_length(mut self, length: usize) -> Self {
        self.config.max_answer_length = length;
        self
    }

    /// Set the number of candidate start/end positions per window.
    pub fn candidate_spans(mut self, k: usize) -> Self {
        self.config.candidate_spans = k;
        self
    }

    /// Set the batch size for batch ingestion.
    pub fn ingest_batch_size(mut self, size: usize) -> Self {
        self.config.ingest_batch_size = size;
        self
    }

    /// Set the retry count for batch ingestion.
    pub fn ingest_max_retries(mut self, retries: usize) -> Self {
        self.config.ingest_max_retries = retries;
        self
    }

    /// Build the [`QaConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] if any count parameter is zero or a
    /// threshold is negative.
    pub fn build(self) -> Result<QaConfig> {
        let config = self.config;
        if config.top_k == 0 || config.chat_top_k == 0 {
            return Err(QaError::Config("top_k must be greater than zero".to_string()));
        }
        if config.similarity_threshold < 0.0 || config.chat_similarity_threshold < 0.0 {
            return Err(QaError::Config("similarity thresholds must be non-negative".to_string()));
        }
        if config.max_answer_length == 0 {
            return Err(QaError::Config("max_answer_length must be greater than zero".to_string()));
        }
        if config.candidate_spans == 0 {
            return Err(QaError::Config("candidate_spans must be greater than zero".to_string()));
        }
        if config.ingest_batch_size == 0 {
            return Err(QaError::Config("ingest_batch_size must be greater than zero".to_string()));
        }
        if config.ingest_max_retries == 0 {
            return Err(QaError::Config(
                "ingest_max_retries must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }
}
