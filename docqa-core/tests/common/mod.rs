//! Shared test doubles for the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use docqa_core::error::Result;
use docqa_core::extractor::{SpanScorer, WindowScores};

const PAD: u32 = 0;
const CLS: u32 = 1;
const SEP: u32 = 2;
const FIRST_WORD_ID: u32 = 3;

/// A word-level scorer with a single unambiguous peak at the configured
/// answer phrase.
///
/// Tokens are whitespace-separated words interned into a shared
/// vocabulary; ids below [`FIRST_WORD_ID`] are model-internal markers.
/// `score` builds `[CLS] question [SEP] context [SEP]` padded to the
/// window and places a start/end peak on the answer phrase if it occurs
/// in the window; every other position scores negative infinity, so a
/// window without the phrase yields no acceptable span.
pub struct PeakScorer {
    answer: String,
    window_len: usize,
    vocab: Mutex<(HashMap<String, u32>, Vec<String>)>,
    score_calls: AtomicUsize,
}

impl PeakScorer {
    pub fn new(answer: &str, window_len: usize) -> Self {
        Self {
            answer: answer.to_string(),
            window_len,
            vocab: Mutex::new((HashMap::new(), Vec::new())),
            score_calls: AtomicUsize::new(0),
        }
    }

    /// Number of forward passes performed.
    pub fn score_calls(&self) -> usize {
        self.score_calls.load(Ordering::SeqCst)
    }

    fn intern(&self, text: &str) -> Vec<u32> {
        let mut vocab = self.vocab.lock().unwrap();
        text.split_whitespace()
            .map(|word| {
                if let Some(&id) = vocab.0.get(word) {
                    id
                } else {
                    let id = FIRST_WORD_ID + vocab.1.len() as u32;
                    vocab.0.insert(word.to_string(), id);
                    vocab.1.push(word.to_string());
                    id
                }
            })
            .collect()
    }
}

#[async_trait]
impl SpanScorer for PeakScorer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(self.intern(text))
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        let vocab = self.vocab.lock().unwrap();
        Ok(ids
            .iter()
            .filter(|&&id| id >= FIRST_WORD_ID)
            .filter_map(|&id| vocab.1.get((id - FIRST_WORD_ID) as usize).cloned())
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn window_len(&self) -> usize {
        self.window_len
    }

    fn special_token_overhead(&self) -> usize {
        3
    }

    async fn score(&self, question: &str, context: &str) -> Result<WindowScores> {
        self.score_calls.fetch_add(1, Ordering::SeqCst);

        let mut input_ids = vec![CLS];
        input_ids.extend(self.intern(question));
        input_ids.push(SEP);
        input_ids.extend(self.intern(context));
        input_ids.push(SEP);
        input_ids.truncate(self.window_len);
        while input_ids.len() < self.window_len {
            input_ids.push(PAD);
        }

        let mut start_scores = vec![f32::NEG_INFINITY; self.window_len];
        let mut end_scores = vec![f32::NEG_INFINITY; self.window_len];

        let answer_ids = self.intern(&self.answer);
        if !answer_ids.is_empty() {
            let context_offset = 2 + self.intern(question).len();
            if let Some(pos) = input_ids[context_offset.min(input_ids.len())..]
                .windows(answer_ids.len())
                .position(|window| window == answer_ids.as_slice())
            {
                let start = context_offset + pos;
                let end = start + answer_ids.len() - 1;
                start_scores[start] = 5.0;
                end_scores[end] = 5.0;
            }
        }

        Ok(WindowScores { input_ids, start_scores, end_scores })
    }
}

/// An index wrapper that fails the first `failures` `add` calls, for
/// exercising batch-ingestion retries.
pub struct FlakyIndex {
    inner: docqa_core::InMemoryIndex,
    remaining_failures: AtomicUsize,
}

impl FlakyIndex {
    pub fn new(inner: docqa_core::InMemoryIndex, failures: usize) -> Self {
        Self { inner, remaining_failures: AtomicUsize::new(failures) }
    }
}

#[async_trait]
impl docqa_core::EmbeddingIndex for FlakyIndex {
    async fn add(&self, records: &[docqa_core::IndexRecord]) -> Result<()> {
        if self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(docqa_core::QaError::Index {
                backend: "flaky".to_string(),
                message: "transient insert failure".to_string(),
            });
        }
        self.inner.add(records).await
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<docqa_core::IndexHit>> {
        self.inner.query(text, top_k).await
    }

    async fn get(&self, id: &str) -> Result<Option<docqa_core::IndexRecord>> {
        self.inner.get(id).await
    }

    async fn get_all(&self) -> Result<Vec<docqa_core::IndexRecord>> {
        self.inner.get_all().await
    }

    async fn delete(&self, ids: &[&str]) -> Result<()> {
        self.inner.delete(ids).await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }
}

/// A scorer whose forward pass always fails, for exercising the
/// soft-failure boundary.
pub struct FailingScorer;

#[async_trait]
impl SpanScorer for FailingScorer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text.split_whitespace().map(|_| 0).collect())
    }

    fn decode(&self, _ids: &[u32]) -> Result<String> {
        Ok(String::new())
    }

    fn window_len(&self) -> usize {
        512
    }

    fn special_token_overhead(&self) -> usize {
        3
    }

    async fn score(&self, _question: &str, _context: &str) -> Result<WindowScores> {
        Err(docqa_core::QaError::Scorer {
            model: "failing".to_string(),
            message: "forward pass failed".to_string(),
        })
    }
}
