//! Sentence embedder (BERT-family sentence-transformer + tokenizer).
//!
//! Use [`SentenceEmbedderConfig::stub`] for tests/examples without model files.

/// Sentence embedder configuration.
pub mod config;

#[cfg(test)]
mod tests;

pub use config::{SENTENCE_MAX_SEQ_LEN, STUB_EMBEDDING_DIM, SentenceEmbedderConfig};

use std::sync::Arc;

use candle_core::{DType, Device};
use candle_transformers::models::bert::BertModel;
use tracing::{debug, info, warn};

use crate::embedding::bert::{load_encoder, mmap_weights, read_bert_config};
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::traits::SentenceEncoder;
use crate::embedding::utils::{batch_tensors, l2_normalize, load_batch_tokenizer};

enum EmbedderBackend {
    Model {
        model: Arc<BertModel>,
        tokenizer: Arc<tokenizers::Tokenizer>,
        device: Device,
        hidden_size: usize,
    },
    Stub {
        dim: usize,
    },
}

/// Mean-pooled, L2-normalised sentence embeddings (supports stub mode).
///
/// Inference takes `&self` only, so one embedder can serve concurrent callers.
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: SentenceEmbedderConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub { dim } => format!("Stub(dim={})", dim),
                },
            )
            .field("embedding_dim", &self.embedding_dim())
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: SentenceEmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Sentence embedder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EmbedderBackend::Stub {
                    dim: config.stub_dim,
                },
                config,
            });
        }

        let device = select_device();
        debug!(?device, "Selected compute device for sentence embedder");

        let (model, tokenizer, hidden_size) = Self::load_model(&config, &device)?;

        info!(
            model_dir = %config.model_dir.display(),
            hidden_size,
            max_seq_len = config.max_seq_len,
            "Sentence embedder loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                model: Arc::new(model),
                tokenizer: Arc::new(tokenizer),
                device,
                hidden_size,
            },
            config,
        })
    }

    /// Stub embedder with the default dimension.
    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(SentenceEmbedderConfig::stub())
    }

    fn load_model(
        config: &SentenceEmbedderConfig,
        device: &Device,
    ) -> Result<(BertModel, tokenizers::Tokenizer, usize), EmbeddingError> {
        let model_dir = config.model_dir.as_path();

        let bert_config =
            read_bert_config(model_dir).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to read config.json: {}", e),
            })?;

        let vb = mmap_weights(model_dir, device).map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("Failed to map weights: {}", e),
        })?;

        let (model, prefix) =
            load_encoder(&vb, &bert_config).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {}", e),
            })?;
        debug!(prefix, "Encoder weights resolved");

        let tokenizer = load_batch_tokenizer(model_dir, config.max_seq_len).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        Ok((model, tokenizer, bert_config.hidden_size))
    }

    /// Embeds a batch of texts, one unit vector per input.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        match &self.backend {
            EmbedderBackend::Model {
                model,
                tokenizer,
                device,
                ..
            } => self.embed_batch_with_model(texts, model, tokenizer, device),
            EmbedderBackend::Stub { dim } => {
                Ok(texts.iter().map(|text| Self::embed_stub(text, *dim)).collect())
            }
        }
    }

    fn embed_batch_with_model(
        &self,
        texts: &[&str],
        model: &BertModel,
        tokenizer: &tokenizers::Tokenizer,
        device: &Device,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let encodings = tokenizer.encode_batch(texts.to_vec(), true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        debug!(
            batch = texts.len(),
            seq_len = encodings.first().map(|e| e.len()).unwrap_or(0),
            "Embedding batch (transformer forward pass)"
        );

        let inputs = batch_tensors(&encodings, device)?;
        let hidden_states = model.forward(
            &inputs.input_ids,
            &inputs.token_type_ids,
            Some(&inputs.attention_mask),
        )?;

        // Mean pooling over non-padding tokens.
        // hidden_states: [batch, seq_len, hidden]; mask: [batch, seq_len, 1]
        let mask = inputs.attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden_states.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        let pooled = summed.broadcast_div(&counts)?;

        let mut vectors = pooled.to_vec2::<f32>()?;
        for v in &mut vectors {
            l2_normalize(v);
        }
        Ok(vectors)
    }

    fn embed_stub(text: &str, dim: usize) -> Vec<f32> {
        let digest = blake3::hash(text.as_bytes());
        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&digest.as_bytes()[..8]);
        let mut state = u64::from_le_bytes(seed_bytes);

        let mut embedding = Vec::with_capacity(dim);
        for _ in 0..dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        l2_normalize(&mut embedding);
        embedding
    }

    /// Returns the output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        match &self.backend {
            EmbedderBackend::Model { hidden_size, .. } => *hidden_size,
            EmbedderBackend::Stub { dim } => *dim,
        }
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub { .. })
    }

    pub fn config(&self) -> &SentenceEmbedderConfig {
        &self.config
    }
}

impl SentenceEncoder for SentenceEmbedder {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.embed_batch(texts)
    }
}
