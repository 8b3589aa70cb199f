//! Evidence-grounded automatic scoring for argumentative research papers.
//!
//! # Public API Surface
//!
//! The pipeline is exposed module by module so each stage can be used and
//! tested on its own:
//!
//! ## Scoring
//! - [`ScoringEngine`] - Parse, bind, compute metrics and aggregate
//! - [`ScoreResult`], [`DimensionScores`], [`Diagnostics`] - Output records
//!
//! ## Configuration
//! - [`ScoringOptions`], [`ScoringConfig`] - Options and their validated form
//! - [`ModelConfig`] - Model directories from `AES_*` variables
//!
//! ## Extraction & Binding
//! - [`DocumentParser`], [`ArgumentGraph`], [`Claim`], [`Evidence`]
//! - [`Binder`], [`BindingStrategy`]
//!
//! ## Models
//! - [`ModelHandles`] - Injected embedder and NLI backends
//! - [`SentenceEmbedder`], [`EntailmentClassifier`] - Candle-backed implementations
//! - [`SentenceEncoder`], [`EntailmentModel`] - The traits metrics depend on
//!
//! ## Test/Mock Support
//! Mock backends live in [`embedding::mock`] behind `#[cfg(any(test, feature = "mock"))]`.

pub mod binding;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod extraction;
pub mod metrics;
pub mod scoring;

pub use binding::{Binder, BindingError, BindingStrategy};
pub use config::{ConfigError, MetricWeights, ModelConfig, ScoringConfig, ScoringOptions};
pub use embedding::{
    CachedEncoder, EmbeddingError, EntailmentClassifier, EntailmentLabel, EntailmentModel,
    ModelHandles, ModelStatus, NliConfig, NliError, NliPrediction, SentenceEmbedder,
    SentenceEmbedderConfig, SentenceEncoder,
};
pub use extraction::{
    ArgumentGraph, Claim, ClaimType, DocumentParser, Evidence, EvidenceId, EvidenceSource,
};
pub use metrics::{Metric, MetricOutcome, OutcomeSource, PairStats, QualitativeAdapter};
pub use scoring::{
    Aggregator, ClaimSummary, Diagnostics, DimensionScores, ScoreResult, ScoringEngine,
    ScoringError,
};
