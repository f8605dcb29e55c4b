//! Span extraction: locating the best answer substring in a context.
//!
//! The scoring model is an external collaborator behind [`SpanScorer`];
//! this module owns the window tiling and the span search around it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::chunk::{AnswerResult, NO_ANSWER_FOUND, NO_CONTEXT_ANSWER};
use crate::config::QaConfig;
use crate::error::{QaError, Result};

/// Per-position scores for one fixed-length model window.
///
/// All three vectors have the scorer's window length. `input_ids` is
/// the exact token sequence the scores refer to, so a `(start, end)`
/// pair can be decoded back into answer text.
#[derive(Debug, Clone)]
pub struct WindowScores {
    /// The token ids of the scored window (question + context chunk,
    /// truncated and padded to the window length).
    pub input_ids: Vec<u32>,
    /// Score for each position being the answer start.
    pub start_scores: Vec<f32>,
    /// Score for each position being the answer end.
    pub end_scores: Vec<f32>,
}

/// The extractive question-answering model collaborator.
///
/// `encode`/`decode` are the model's tokenizer (no special tokens on
/// encode, special tokens skipped on decode); `score` is one forward
/// pass over a fixed-length window. Window length and special-token
/// overhead are collaborator-reported constants (512 and 3 for the
/// default model).
#[async_trait]
pub trait SpanScorer: Send + Sync {
    /// Tokenize text without special tokens.
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Decode token ids back to text, skipping model-internal markers.
    fn decode(&self, ids: &[u32]) -> Result<String>;

    /// Fixed model input window length in tokens.
    fn window_len(&self) -> usize;

    /// Tokens consumed by special markers in each window.
    fn special_token_overhead(&self) -> usize;

    /// Score one `question` + `context` window.
    async fn score(&self, question: &str, context: &str) -> Result<WindowScores>;
}

/// Finds the highest-scoring contiguous answer span in a context,
/// tiling contexts longer than the model window.
pub struct SpanExtractor {
    scorer: Arc<dyn SpanScorer>,
    max_answer_length: usize,
    candidate_spans: usize,
    min_context_chars: usize,
}

impl SpanExtractor {
    /// Create an extractor over the given scorer, taking span-search
    /// parameters from the config.
    pub fn new(scorer: Arc<dyn SpanScorer>, config: &QaConfig) -> Self {
        Self {
            scorer,
            max_answer_length: config.max_answer_length,
            candidate_spans: config.candidate_spans,
            min_context_chars: config.min_context_chars,
        }
    }

    /// Extract the best answer span for `question` from `context`.
    ///
    /// Every tile of the context is scored and the single best span
    /// across all tiles wins; there is no per-tile early exit. A longer
    /// context in more tiles linearly increases the chance of any valid
    /// span beating a locally plausible but globally weak one.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Validation`] when the question alone fills
    /// the model window, and propagates scorer failures. `has_answer =
    /// false` outcomes are `Ok`, not errors.
    pub async fn extract(&self, question: &str, context: &str) -> Result<AnswerResult> {
        if context.trim().len() < self.min_context_chars {
            warn!("context is empty or too short");
            return Ok(AnswerResult::not_found(NO_CONTEXT_ANSWER));
        }

        let question_tokens = self.scorer.encode(question)?;
        let budget = self
            .scorer
            .window_len()
            .saturating_sub(question_tokens.len())
            .saturating_sub(self.scorer.special_token_overhead());
        if budget == 0 {
            return Err(QaError::Validation(
                "question leaves no token budget for context".to_string(),
            ));
        }

        let tiles = self.tile_context(context, budget)?;
        info!(tiles = tiles.len(), "split context into tiles");

        let mut best_answer = String::new();
        let mut best_confidence = f32::NEG_INFINITY;

        for (i, tile) in tiles.iter().enumerate() {
            debug!(tile = i + 1, total = tiles.len(), "scoring tile");
            let scores = self.scorer.score(question, tile).await?;

            let starts = top_k_indices(&scores.start_scores, self.candidate_spans);
            let ends = top_k_indices(&scores.end_scores, self.candidate_spans);

            for &start in &starts {
                for &end in &ends {
                    if end < start || end - start + 1 > self.max_answer_length {
                        continue;
                    }
                    let (Some(&start_score), Some(&end_score)) =
                        (scores.start_scores.get(start), scores.end_scores.get(end))
                    else {
                        continue;
                    };
                    let confidence = start_score + end_score;
                    if confidence <= best_confidence {
                        continue;
                    }

                    let Some(span_ids) = scores.input_ids.get(start..=end) else {
                        continue;
                    };
                    let text = self.scorer.decode(span_ids)?;
                    if text.trim().is_empty() {
                        continue;
                    }

                    best_answer = text.trim().to_string();
                    best_confidence = confidence;
                }
            }
        }

        if best_confidence > f32::NEG_INFINITY && !best_answer.is_empty() {
            info!(confidence = best_confidence, "found answer span");
            Ok(AnswerResult {
                answer: best_answer,
                confidence: best_confidence,
                has_answer: true,
            })
        } else {
            warn!("no answer span found in any tile");
            Ok(AnswerResult::not_found(NO_ANSWER_FOUND))
        }
    }

    /// Partition `context` into tiles whose token counts stay within
    /// `budget`, splitting along paragraph boundaries. A tile is
    /// flushed when the next paragraph would overflow it; a single
    /// paragraph larger than the budget still becomes its own tile
    /// (the scorer truncates it). When the paragraph pass produces
    /// nothing, fall back to a hard token split.
    fn tile_context(&self, context: &str, budget: usize) -> Result<Vec<String>> {
        let mut tiles = Vec::new();
        let mut current = String::new();
        let mut current_tokens = 0usize;

        for paragraph in context.split('\n') {
            if paragraph.trim().is_empty() {
                continue;
            }

            let paragraph_tokens = self.scorer.encode(paragraph)?.len();
            if current_tokens + paragraph_tokens > budget && !current.is_empty() {
                tiles.push(std::mem::take(&mut current));
                current.push_str(paragraph);
                current_tokens = paragraph_tokens;
            } else {
                if !current.is_empty() {
                    current.push('\n');
                }
                current.push_str(paragraph);
                current_tokens += paragraph_tokens;
            }
        }
        if !current.is_empty() {
            tiles.push(current);
        }

        if tiles.is_empty() {
            let ids = self.scorer.encode(context)?;
            for window in ids.chunks(budget) {
                tiles.push(self.scorer.decode(window)?);
            }
        }

        Ok(tiles)
    }
}

/// Indices of the `k` highest values, highest first. Ties keep the
/// lower index first.
fn top_k_indices(scores: &[f32], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal)
    });
    indices.truncate(k);
    indices
}
