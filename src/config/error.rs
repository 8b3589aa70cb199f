//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or validating configuration.
///
/// All of these surface at construction time; a built
/// [`ScoringConfig`](super::ScoringConfig) never fails later.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Metric weights must sum to 1.0 within tolerance.
    #[error("metric weights must sum to 1.0 (±{tolerance}), got {sum}")]
    WeightSum { sum: f64, tolerance: f64 },

    #[error("weight for '{metric}' must be between 0.0 and 1.0, got {value}")]
    InvalidWeight { metric: &'static str, value: f64 },

    #[error("threshold '{name}' must be between 0.0 and 1.0, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    /// A size or cap option holds a value the pipeline cannot run with.
    #[error("invalid value for '{name}': {reason}")]
    InvalidLimit { name: &'static str, reason: String },

    #[error("min_claim_length ({min}) cannot exceed max_claim_length ({max})")]
    InvalidClaimLengths { min: usize, max: usize },

    #[error("invalid evidence pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("claim rule for '{claim_type}' has no keywords")]
    EmptyClaimRule { claim_type: String },

    /// An environment override could not be parsed.
    #[error("failed to parse {name}='{value}'")]
    EnvParse { name: &'static str, value: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
