use thiserror::Error;

use crate::config::ConfigError;

/// Errors from building a [`ScoringEngine`](super::ScoringEngine) or running it
/// off-thread. Scoring itself is infallible.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("scoring task failed: {reason}")]
    TaskFailed { reason: String },
}
