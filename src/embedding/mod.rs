//! Model backends and the seams the metrics call through.
//!
//! - [`SentenceEncoder`] / [`EntailmentModel`] are the traits metrics depend on.
//! - [`sentence`] and [`nli`] are the candle-backed implementations.
//! - [`ModelHandles`] bundles whichever backends are available.

/// BERT encoder and sequence-classifier loading.
pub mod bert;
/// Memoising encoder wrapper.
pub mod cache;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Optional backend bundle.
pub mod handles;
/// Entailment (NLI) cross-encoder.
pub mod nli;
/// Sentence embedder.
pub mod sentence;
pub mod traits;
/// Tokenizer/tensor helpers.
pub mod utils;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use cache::CachedEncoder;
pub use error::EmbeddingError;
pub use handles::{ModelHandles, ModelStatus};
pub use nli::{EntailmentClassifier, EntailmentLabel, LabelScore, NliConfig, NliError, NliPrediction};
pub use sentence::{STUB_EMBEDDING_DIM, SentenceEmbedder, SentenceEmbedderConfig};
pub use traits::{EntailmentModel, SentenceEncoder};
pub use utils::cosine_similarity;
