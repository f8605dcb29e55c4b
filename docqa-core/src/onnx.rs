//! ONNX-backed span scorer.
//!
//! Runs an extractive question-answering model (RoBERTa SQuAD2 export
//! or similar) locally through ONNX Runtime. The model and tokenizer
//! files are provisioned externally and loaded from disk.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use tokenizers::Tokenizer;

use crate::error::{QaError, Result};
use crate::extractor::{SpanScorer, WindowScores};

/// Configuration for [`OnnxScorer`].
#[derive(Debug, Clone)]
pub struct OnnxScorerConfig {
    /// Path to the exported `model.onnx`.
    pub model_path: PathBuf,
    /// Path to the matching `tokenizer.json`.
    pub tokenizer_path: PathBuf,
    /// Fixed model input window in tokens.
    pub window_len: usize,
    /// Tokens consumed by special markers per window.
    pub special_token_overhead: usize,
    /// Intra-op thread count for the ONNX session.
    pub intra_threads: usize,
}

impl Default for OnnxScorerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/model.onnx"),
            tokenizer_path: PathBuf::from("./models/tokenizer.json"),
            window_len: 512,
            special_token_overhead: 3,
            intra_threads: 4,
        }
    }
}

/// A [`SpanScorer`] backed by a local ONNX question-answering model.
///
/// The forward pass is serialized through a mutex; the model is loaded
/// once and shared read-mostly after that.
pub struct OnnxScorer {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    pad_id: u32,
    window_len: usize,
    special_token_overhead: usize,
}

fn scorer_error(message: impl Into<String>) -> QaError {
    QaError::Scorer { model: "onnx".to_string(), message: message.into() }
}

impl OnnxScorer {
    /// Load the model and tokenizer from the configured paths.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Scorer`] if either file is missing or fails
    /// to load. Callers treat this as fatal at startup.
    pub fn new(config: &OnnxScorerConfig) -> Result<Self> {
        tracing::info!(model = %config.model_path.display(), "loading ONNX QA model");

        let session = Session::builder()
            .map_err(|e| scorer_error(format!("failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| scorer_error(format!("failed to set optimization level: {e}")))?
            .with_intra_threads(config.intra_threads)
            .map_err(|e| scorer_error(format!("failed to set threads: {e}")))?
            .commit_from_file(&config.model_path)
            .map_err(|e| scorer_error(format!("failed to load model: {e}")))?;

        let tokenizer = load_tokenizer(&config.tokenizer_path)?;
        let pad_id = tokenizer
            .token_to_id("<pad>")
            .or_else(|| tokenizer.token_to_id("[PAD]"))
            .unwrap_or(0);

        tracing::info!("ONNX QA model loaded");

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            pad_id,
            window_len: config.window_len,
            special_token_overhead: config.special_token_overhead,
        })
    }
}

fn load_tokenizer(path: &Path) -> Result<Tokenizer> {
    Tokenizer::from_file(path)
        .map_err(|e| scorer_error(format!("failed to load tokenizer: {e}")))
}

#[async_trait]
impl SpanScorer for OnnxScorer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| scorer_error(format!("tokenization failed: {e}")))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.tokenizer
            .decode(ids, true)
            .map_err(|e| scorer_error(format!("decoding failed: {e}")))
    }

    fn window_len(&self) -> usize {
        self.window_len
    }

    fn special_token_overhead(&self) -> usize {
        self.special_token_overhead
    }

    async fn score(&self, question: &str, context: &str) -> Result<WindowScores> {
        // Question + context with the model's special-token template,
        // truncated and padded to the fixed window.
        let encoding = self
            .tokenizer
            .encode((question, context), true)
            .map_err(|e| scorer_error(format!("tokenization failed: {e}")))?;

        let mut input_ids: Vec<u32> = encoding.get_ids().to_vec();
        let mut attention_mask: Vec<i64> =
            encoding.get_attention_mask().iter().map(|&m| m as i64).collect();
        input_ids.truncate(self.window_len);
        attention_mask.truncate(self.window_len);
        while input_ids.len() < self.window_len {
            input_ids.push(self.pad_id);
            attention_mask.push(0);
        }

        let ids_i64: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();

        let input_ids_tensor =
            Tensor::from_array((vec![1, self.window_len], ids_i64.into_boxed_slice()))
                .map_err(|e| scorer_error(format!("input tensor creation failed: {e}")))?;
        let attention_mask_tensor =
            Tensor::from_array((vec![1, self.window_len], attention_mask.into_boxed_slice()))
                .map_err(|e| scorer_error(format!("mask tensor creation failed: {e}")))?;

        let inputs = vec![
            ("input_ids", input_ids_tensor.into_dyn()),
            ("attention_mask", attention_mask_tensor.into_dyn()),
        ];

        let mut session = self
            .session
            .lock()
            .map_err(|_| scorer_error("model session poisoned"))?;
        let outputs =
            session.run(inputs).map_err(|e| scorer_error(format!("inference failed: {e}")))?;

        let start_scores = extract_logits(&outputs, "start_logits", 0)?;
        let end_scores = extract_logits(&outputs, "end_logits", 1)?;

        Ok(WindowScores { input_ids, start_scores, end_scores })
    }
}

/// Pull a named logits tensor out of the session outputs, falling back
/// to positional lookup for exports without output names.
fn extract_logits(
    outputs: &ort::session::SessionOutputs<'_>,
    name: &str,
    position: usize,
) -> Result<Vec<f32>> {
    let entries: Vec<_> = outputs.iter().collect();
    let value = entries
        .iter()
        .find(|(n, _)| *n == name)
        .or_else(|| entries.get(position))
        .map(|(_, v)| v)
        .ok_or_else(|| scorer_error(format!("missing output tensor '{name}'")))?;

    let (_, data) = value
        .try_extract_tensor::<f32>()
        .map_err(|e| scorer_error(format!("failed to extract '{name}': {e}")))?;
    Ok(data.to_vec())
}
