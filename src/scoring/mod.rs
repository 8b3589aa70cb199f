//! End-to-end document scoring.
//!
//! [`ScoringEngine`] wires the parser, binder, metric computers and
//! [`Aggregator`] together and returns a [`ScoreResult`]. Model handles are
//! injected at construction; see [`ModelHandles`](crate::embedding::ModelHandles).

pub mod aggregator;
pub mod engine;
pub mod error;
pub mod types;


pub use aggregator::Aggregator;
pub use engine::ScoringEngine;
pub use error::ScoringError;
pub use types::{ClaimSummary, Diagnostics, DimensionScores, ScoreResult};
