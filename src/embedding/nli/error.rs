use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NliError {
    #[error("NLI model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load NLI model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("NLI inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid NLI configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The backend returned a different number of predictions than pairs.
    #[error("NLI model returned {got} predictions for {expected} pairs")]
    CountMismatch { expected: usize, got: usize },
}

impl From<candle_core::Error> for NliError {
    fn from(err: candle_core::Error) -> Self {
        NliError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for NliError {
    fn from(err: std::io::Error) -> Self {
        NliError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
