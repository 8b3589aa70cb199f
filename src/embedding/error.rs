use std::path::PathBuf;
use thiserror::Error;

/// Sentence embedder failures.
///
/// Load errors leave the embedder out of [`ModelHandles`](super::ModelHandles);
/// inference errors push binding to the lexical strategy for that call.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("sentence embedder directory not found: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load sentence embedder: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("sentence encoding failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("embedder returned {got} vectors for {expected} texts")]
    CountMismatch { expected: usize, got: usize },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        Self::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        Self::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
