//! Scriptable model doubles for tests (enabled with the `mock` feature).

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use super::error::EmbeddingError;
use super::nli::{NliError, NliPrediction};
use super::traits::{EntailmentModel, SentenceEncoder};

/// Encoder returning fixed vectors per text, with a fallback vector.
#[derive(Debug, Default)]
pub struct MockEncoder {
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
    fail: bool,
    calls: Mutex<Vec<usize>>,
}

impl MockEncoder {
    pub fn new(default: Vec<f32>) -> Self {
        Self {
            default,
            ..Default::default()
        }
    }

    /// Every text maps to the same unit vector, so all cosine similarities are 1.
    pub fn constant(dim: usize) -> Self {
        let mut v = vec![0.0; dim.max(1)];
        v[0] = 1.0;
        Self::new(v)
    }

    /// Every call fails with `InferenceFailed`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    /// Batch sizes of every `encode` call so far.
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().clone()
    }
}

impl SentenceEncoder for MockEncoder {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.lock().push(texts.len());
        if self.fail {
            return Err(EmbeddingError::InferenceFailed {
                reason: "mock encoder failure".to_string(),
            });
        }
        Ok(texts
            .iter()
            .map(|t| {
                self.vectors
                    .get(*t)
                    .cloned()
                    .unwrap_or_else(|| self.default.clone())
            })
            .collect())
    }
}

/// Entailment model returning scripted predictions per (premise, hypothesis).
#[derive(Debug)]
pub struct MockEntailment {
    predictions: HashMap<(String, String), NliPrediction>,
    default: NliPrediction,
    fail_batches: HashSet<usize>,
    calls: Mutex<Vec<usize>>,
}

impl Default for MockEntailment {
    fn default() -> Self {
        Self::new(NliPrediction::from_probabilities(0.1, 0.8, 0.1))
    }
}

impl MockEntailment {
    pub fn new(default: NliPrediction) -> Self {
        Self {
            predictions: HashMap::new(),
            default,
            fail_batches: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_pair(
        mut self,
        premise: impl Into<String>,
        hypothesis: impl Into<String>,
        prediction: NliPrediction,
    ) -> Self {
        self.predictions
            .insert((premise.into(), hypothesis.into()), prediction);
        self
    }

    /// Makes the `n`th call (0-based) fail.
    pub fn failing_batch(mut self, n: usize) -> Self {
        self.fail_batches.insert(n);
        self
    }

    /// Batch sizes of every `classify` call so far, including failed ones.
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().clone()
    }

    pub fn pairs_seen(&self) -> usize {
        self.calls.lock().iter().sum()
    }
}

impl EntailmentModel for MockEntailment {
    fn classify(&self, pairs: &[(&str, &str)]) -> Result<Vec<NliPrediction>, NliError> {
        let call = {
            let mut calls = self.calls.lock();
            calls.push(pairs.len());
            calls.len() - 1
        };

        if self.fail_batches.contains(&call) {
            return Err(NliError::InferenceFailed {
                reason: format!("mock failure on batch {}", call),
            });
        }

        Ok(pairs
            .iter()
            .map(|(p, h)| {
                self.predictions
                    .get(&(p.to_string(), h.to_string()))
                    .cloned()
                    .unwrap_or_else(|| self.default.clone())
            })
            .collect())
    }
}
