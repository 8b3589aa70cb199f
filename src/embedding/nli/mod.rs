//! Cross-encoder entailment classifier (premise, hypothesis) -> label distribution.

pub mod config;
pub mod error;
pub mod labels;

#[cfg(test)]
mod tests;

pub use config::{NLI_MAX_SEQ_LEN, NliConfig};
pub use error::NliError;
pub use labels::{EntailmentLabel, LabelScore, NliPrediction};

use std::collections::HashSet;
use std::path::Path;

use candle_core::Device;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::SequenceClassifier;
use crate::embedding::device::select_device;
use crate::embedding::traits::EntailmentModel;
use crate::embedding::utils::{batch_tensors, load_batch_tokenizer};

/// Label order used when `config.json` has no `id2label` (MNLI checkpoints).
const DEFAULT_LABELS: [&str; 3] = ["contradiction", "entailment", "neutral"];

const NEGATION_MARKERS: &[&str] = &[
    "not", "no", "never", "without", "cannot", "neither", "nor", "不", "没有", "未", "无", "非",
];

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "have", "has", "had", "do",
    "does", "did", "will", "would", "could", "should", "may", "might", "can", "to", "of", "in",
    "for", "on", "with", "at", "by", "from", "as", "into", "and", "but", "if", "or", "because",
    "this", "that", "these", "those", "it", "its", "we", "our",
];

struct NliModel {
    classifier: SequenceClassifier,
    tokenizer: Tokenizer,
    device: Device,
    labels: Vec<EntailmentLabel>,
}

/// NLI classifier; `classify` returns one full distribution per input pair.
pub struct EntailmentClassifier {
    config: NliConfig,
    model: Option<NliModel>,
}

impl std::fmt::Debug for EntailmentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntailmentClassifier")
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .field(
                "device",
                &self.model.as_ref().map(|m| format!("{:?}", m.device)),
            )
            .finish()
    }
}

impl EntailmentClassifier {
    pub fn load(config: NliConfig) -> Result<Self, NliError> {
        if let Err(msg) = config.validate() {
            return Err(NliError::InvalidConfig { reason: msg });
        }

        let Some(model_dir) = config.model_dir.clone() else {
            warn!("No NLI model path configured, operating in STUB mode (testing only)");
            return Ok(Self {
                config,
                model: None,
            });
        };

        if !model_dir.exists() {
            return Err(NliError::ModelNotFound { path: model_dir });
        }
        for file in ["config.json", "model.safetensors"] {
            if !model_dir.join(file).exists() {
                return Err(NliError::ModelLoadFailed {
                    reason: format!("Missing {} in {}", file, model_dir.display()),
                });
            }
        }

        let device = select_device();
        debug!(?device, "Selected compute device for NLI model");

        let labels = read_labels(&model_dir)?;
        info!(
            model_dir = %model_dir.display(),
            labels = ?labels,
            "Loading NLI model"
        );

        let classifier = SequenceClassifier::load(&model_dir, labels.len(), &device).map_err(|e| {
            NliError::ModelLoadFailed {
                reason: format!("Failed to load sequence classifier: {}", e),
            }
        })?;

        let tokenizer = load_batch_tokenizer(&model_dir, config.max_seq_len).map_err(|e| {
            NliError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        info!("NLI model loaded successfully");

        Ok(Self {
            config,
            model: Some(NliModel {
                classifier,
                tokenizer,
                device,
                labels,
            }),
        })
    }

    pub fn stub() -> Result<Self, NliError> {
        Self::load(NliConfig::stub())
    }

    /// Classifies each (premise, hypothesis) pair in one forward pass.
    pub fn classify_pairs(&self, pairs: &[(&str, &str)]) -> Result<Vec<NliPrediction>, NliError> {
        if pairs.is_empty() {
            return Ok(vec![]);
        }

        debug!(
            pairs = pairs.len(),
            model_loaded = self.is_model_loaded(),
            "Classifying NLI batch"
        );

        match &self.model {
            Some(model) => Self::classify_with_model(model, pairs),
            None => Ok(pairs
                .iter()
                .map(|(premise, hypothesis)| stub_prediction(premise, hypothesis))
                .collect()),
        }
    }

    fn classify_with_model(
        model: &NliModel,
        pairs: &[(&str, &str)],
    ) -> Result<Vec<NliPrediction>, NliError> {
        let encodings = model
            .tokenizer
            .encode_batch(pairs.to_vec(), true)
            .map_err(|e| NliError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        let inputs = batch_tensors(&encodings, &model.device)?;
        let logits = model
            .classifier
            .forward(
                &inputs.input_ids,
                &inputs.token_type_ids,
                Some(&inputs.attention_mask),
            )
            .map_err(|e| NliError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let probabilities = candle_nn::ops::softmax_last_dim(&logits)?.to_vec2::<f32>()?;

        Ok(probabilities
            .into_iter()
            .map(|row| {
                NliPrediction::new(
                    model
                        .labels
                        .iter()
                        .cloned()
                        .zip(row)
                        .map(|(label, score)| LabelScore { label, score })
                        .collect(),
                )
            })
            .collect())
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &NliConfig {
        &self.config
    }

    /// Labels in logit order (empty in stub mode).
    pub fn labels(&self) -> &[EntailmentLabel] {
        self.model.as_ref().map(|m| m.labels.as_slice()).unwrap_or(&[])
    }
}

impl EntailmentModel for EntailmentClassifier {
    fn classify(&self, pairs: &[(&str, &str)]) -> Result<Vec<NliPrediction>, NliError> {
        self.classify_pairs(pairs)
    }
}

/// Reads `id2label` from `config.json`, ordered by label index.
fn read_labels(model_dir: &Path) -> Result<Vec<EntailmentLabel>, NliError> {
    let content = std::fs::read_to_string(model_dir.join("config.json"))?;
    let json: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| NliError::ModelLoadFailed {
            reason: format!("Failed to parse config.json: {}", e),
        })?;

    Ok(labels_from_config(&json))
}

pub(crate) fn labels_from_config(config: &serde_json::Value) -> Vec<EntailmentLabel> {
    let mut indexed: Vec<(usize, &str)> = config
        .get("id2label")
        .and_then(|v| v.as_object())
        .map(|map| {
            map.iter()
                .filter_map(|(idx, label)| Some((idx.parse().ok()?, label.as_str()?)))
                .collect()
        })
        .unwrap_or_default();

    if indexed.is_empty() {
        indexed = DEFAULT_LABELS.iter().copied().enumerate().collect();
    }
    indexed.sort_by_key(|(idx, _)| *idx);

    indexed
        .into_iter()
        .map(|(_, label)| EntailmentLabel::from_model_label(label))
        .collect()
}

fn content_words(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

fn has_negation(text: &str) -> bool {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| NEGATION_MARKERS.contains(&w))
        || NEGATION_MARKERS
            .iter()
            .filter(|m| !m.is_ascii())
            .any(|m| text.contains(m))
}

/// Lexical stand-in for a real model: word overlap drives entailment and a
/// negation mismatch between the two sides reads as contradiction.
fn stub_prediction(premise: &str, hypothesis: &str) -> NliPrediction {
    if has_negation(premise) != has_negation(hypothesis) {
        return NliPrediction::from_probabilities(0.1, 0.2, 0.7);
    }

    let premise_words = content_words(premise);
    let hypothesis_words = content_words(hypothesis);

    let overlap = if hypothesis_words.is_empty() {
        0.0
    } else {
        let matches = hypothesis_words.intersection(&premise_words).count();
        let recall = matches as f32 / hypothesis_words.len() as f32;
        let union = hypothesis_words.union(&premise_words).count().max(1);
        0.6 * recall + 0.4 * (matches as f32 / union as f32)
    };

    let entailment = 0.1 + 0.8 * overlap.clamp(0.0, 1.0);
    let contradiction = 0.05;
    NliPrediction::from_probabilities(entailment, 1.0 - entailment - contradiction, contradiction)
}
