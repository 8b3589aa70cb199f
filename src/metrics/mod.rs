//! Metric computers.
//!
//! The five document metrics implement [`MetricComputer`] and run in
//! [`Metric::DOCUMENT`] order over a bound [`ArgumentGraph`]. The three review
//! metrics come from [`QualitativeAdapter`]. Every computer returns a value in
//! `[0, 1]` and never fails: a missing model yields the metric's documented
//! default, tagged [`OutcomeSource::Defaulted`].

pub mod contradiction;
pub mod coverage;
pub mod qualitative;
pub mod relevance;
pub mod sampling;
pub mod sufficiency;
pub mod support;


pub use contradiction::ContradictionPenalty;
pub use coverage::CitationCoverage;
pub use qualitative::{QualitativeAdapter, QualitativeScores};
pub use relevance::CausalRelevance;
pub use sufficiency::EvidenceSufficiency;
pub use support::SupportStrength;

use std::fmt;

use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::ScoringConfig;
use crate::embedding::{EntailmentModel, ModelHandles, SentenceEncoder};
use crate::extraction::ArgumentGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CitationCoverage,
    CausalRelevance,
    SupportStrength,
    ContradictionPenalty,
    EvidenceSufficiency,
    EndogeneityQuality,
    MethodologyRigor,
    AcademicStandards,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::CitationCoverage,
        Metric::CausalRelevance,
        Metric::SupportStrength,
        Metric::ContradictionPenalty,
        Metric::EvidenceSufficiency,
        Metric::EndogeneityQuality,
        Metric::MethodologyRigor,
        Metric::AcademicStandards,
    ];

    /// Metrics computed from the document itself.
    pub const DOCUMENT: [Metric; 5] = [
        Metric::CitationCoverage,
        Metric::CausalRelevance,
        Metric::SupportStrength,
        Metric::ContradictionPenalty,
        Metric::EvidenceSufficiency,
    ];

    /// Metrics read from an external review.
    pub const REVIEW: [Metric; 3] = [
        Metric::EndogeneityQuality,
        Metric::MethodologyRigor,
        Metric::AcademicStandards,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::CitationCoverage => "citation_coverage",
            Metric::CausalRelevance => "causal_relevance",
            Metric::SupportStrength => "support_strength",
            Metric::ContradictionPenalty => "contradiction_penalty",
            Metric::EvidenceSufficiency => "evidence_sufficiency",
            Metric::EndogeneityQuality => "endogeneity_quality",
            Metric::MethodologyRigor => "methodology_rigor",
            Metric::AcademicStandards => "academic_standards",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a metric value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSource {
    Computed,
    /// Nothing to measure (no claims, no pairs); the metric's "no data" value.
    NoData,
    /// Required model missing or every inference batch failed.
    Defaulted,
}

/// Pairwise NLI bookkeeping for the support and contradiction metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PairStats {
    /// Pairs that existed before capping.
    pub available: usize,
    /// Pairs with a prediction from a successful batch.
    pub evaluated: usize,
    pub truncated: bool,
    pub total_batches: usize,
    pub failed_batches: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricOutcome {
    pub value: f64,
    pub source: OutcomeSource,
    pub pairs: Option<PairStats>,
}

impl MetricOutcome {
    pub fn computed(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            source: OutcomeSource::Computed,
            pairs: None,
        }
    }

    pub fn no_data(value: f64) -> Self {
        Self {
            source: OutcomeSource::NoData,
            ..Self::computed(value)
        }
    }

    pub fn defaulted(value: f64) -> Self {
        Self {
            source: OutcomeSource::Defaulted,
            ..Self::computed(value)
        }
    }

    pub fn with_pairs(mut self, pairs: PairStats) -> Self {
        self.pairs = Some(pairs);
        self
    }
}

/// Read-only inputs shared by all computers for one scoring call.
#[derive(Debug, Clone, Copy)]
pub struct MetricContext<'a> {
    pub config: &'a ScoringConfig,
    pub models: &'a ModelHandles,
}

impl<'a> MetricContext<'a> {
    pub fn new(config: &'a ScoringConfig, models: &'a ModelHandles) -> Self {
        Self { config, models }
    }

    pub fn encoder(&self) -> Option<&'a dyn SentenceEncoder> {
        self.models.embedder()
    }

    /// The NLI backend, or `None` when absent or disabled by configuration.
    pub fn nli(&self) -> Option<&'a dyn EntailmentModel> {
        if self.config.performance().enable_nli {
            self.models.nli()
        } else {
            None
        }
    }

    /// Fresh RNG from the configured seed. Each metric takes its own so results
    /// do not depend on metric order.
    pub fn rng(&self) -> StdRng {
        sampling::seeded_rng(self.config.performance().sampling_seed)
    }
}

/// One document-level metric.
pub trait MetricComputer: Send + Sync {
    fn metric(&self) -> Metric;

    /// Computes the metric and records per-claim values in `derived_scores`.
    fn compute(&self, graph: &mut ArgumentGraph, ctx: &MetricContext<'_>) -> MetricOutcome;
}

/// The five document metrics, in [`Metric::DOCUMENT`] order.
pub fn document_metrics() -> Vec<Box<dyn MetricComputer>> {
    vec![
        Box::new(CitationCoverage),
        Box::new(CausalRelevance),
        Box::new(SupportStrength),
        Box::new(ContradictionPenalty),
        Box::new(EvidenceSufficiency),
    ]
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
