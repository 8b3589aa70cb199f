use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::binding::Binder;
use crate::config::{ModelConfig, ScoringConfig};
use crate::constants::SAMPLED_CLAIMS_LIMIT;
use crate::embedding::ModelHandles;
use crate::extraction::DocumentParser;
use crate::metrics::{
    Metric, MetricComputer, MetricContext, OutcomeSource, PairStats, QualitativeAdapter,
    document_metrics,
};

use super::aggregator::Aggregator;
use super::error::ScoringError;
use super::types::{ClaimSummary, Diagnostics, DimensionScores, ScoreResult};

/// Evidence-grounded document scorer.
///
/// Built once from a validated config and a set of model handles, then shared
/// across calls (and threads). Each call is an independent pipeline: parse,
/// bind, compute the eight metrics, aggregate.
pub struct ScoringEngine {
    config: ScoringConfig,
    models: ModelHandles,
    parser: DocumentParser,
    binder: Binder,
    metrics: Vec<Box<dyn MetricComputer>>,
    adapter: QualitativeAdapter,
    aggregator: Aggregator,
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("models", &self.models)
            .field("weights", self.aggregator.weights())
            .finish()
    }
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig, models: ModelHandles) -> Result<Self, ScoringError> {
        let parser = DocumentParser::new(&config)?;
        let binder = Binder::from_config(&config);
        let aggregator = Aggregator::new(config.weights().clone());

        info!(
            embedder = models.status().embedder,
            nli = models.status().nli,
            "Scoring engine ready"
        );

        Ok(Self {
            config,
            models,
            parser,
            binder,
            metrics: document_metrics(),
            adapter: QualitativeAdapter,
            aggregator,
        })
    }

    /// Engine with default configuration and no models.
    pub fn without_models() -> Result<Self, ScoringError> {
        Self::new(ScoringConfig::default(), ModelHandles::none())
    }

    /// Reads `AES_*` variables for both the scoring options and model paths.
    pub fn from_env() -> Result<Self, ScoringError> {
        let config = ScoringConfig::from_env()?;
        let model_config = ModelConfig::from_env()?;
        model_config.validate()?;
        Self::new(config, ModelHandles::load(&model_config))
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn models(&self) -> &ModelHandles {
        &self.models
    }

    /// Scores `text` with no metadata and no external review.
    pub fn score(&self, text: &str) -> ScoreResult {
        self.score_document(text, None, None)
    }

    /// Scores a document. Never fails: degraded paths are reported in
    /// [`ScoreResult::diagnostics`].
    pub fn score_document(
        &self,
        text: &str,
        metadata: Option<Map<String, Value>>,
        review: Option<&Value>,
    ) -> ScoreResult {
        info!(chars = text.chars().count(), "Scoring document");

        let mut graph = self.parser.parse(text);
        let binding_strategy = self.binder.bind(&mut graph, self.models.embedder());

        let ctx = MetricContext::new(&self.config, &self.models);
        let mut dimension_scores = DimensionScores::default();
        let mut metric_sources = BTreeMap::new();
        let mut support_pairs = PairStats::default();
        let mut contradiction_pairs = PairStats::default();

        for computer in &self.metrics {
            let metric = computer.metric();
            let outcome = computer.compute(&mut graph, &ctx);
            debug!(%metric, value = outcome.value, source = ?outcome.source, "Metric computed");

            dimension_scores.set(metric, outcome.value);
            metric_sources.insert(metric, outcome.source);
            match (metric, outcome.pairs) {
                (Metric::SupportStrength, Some(pairs)) => support_pairs = pairs,
                (Metric::ContradictionPenalty, Some(pairs)) => contradiction_pairs = pairs,
                _ => {}
            }
        }

        let review_scores = self.adapter.extract(review);
        for metric in Metric::REVIEW {
            dimension_scores.set(metric, review_scores.get(metric).unwrap_or(0.0));
            let source = if review_scores.missing.contains(&metric) {
                OutcomeSource::NoData
            } else {
                OutcomeSource::Computed
            };
            metric_sources.insert(metric, source);
        }

        let defaulted_metrics: Vec<Metric> = metric_sources
            .iter()
            .filter(|(_, source)| **source == OutcomeSource::Defaulted)
            .map(|(metric, _)| *metric)
            .collect();
        if !defaulted_metrics.is_empty() {
            warn!(metrics = ?defaulted_metrics, "Metrics fell back to defaults");
        }

        let total_score = self.aggregator.total(&dimension_scores);
        let normalized_score = Aggregator::normalized(total_score);

        let result = ScoreResult {
            total_score,
            normalized_score,
            dimension_scores,
            weights: self.aggregator.weights().clone(),
            claims_count: graph.claims.len(),
            evidences_count: graph.evidences.len(),
            claims_with_evidence: graph.claims_with_evidence(),
            claim_type_distribution: graph.claim_type_distribution(),
            sampled_claims: graph
                .claims
                .iter()
                .take(SAMPLED_CLAIMS_LIMIT)
                .map(ClaimSummary::from_claim)
                .collect(),
            diagnostics: Diagnostics {
                binding_strategy,
                models: self.models.status(),
                metric_sources,
                defaulted_metrics,
                support_pairs,
                contradiction_pairs,
                missing_review_fields: review_scores.missing,
            },
            metadata,
        };

        info!(
            total_score = result.total_score,
            normalized_score = result.normalized_score,
            claims = result.claims_count,
            evidences = result.evidences_count,
            "Scoring complete"
        );

        result
    }

    /// Runs [`score_document`](Self::score_document) on the tokio blocking pool.
    pub async fn score_async(
        self: Arc<Self>,
        text: String,
        metadata: Option<Map<String, Value>>,
        review: Option<Value>,
    ) -> Result<ScoreResult, ScoringError> {
        tokio::task::spawn_blocking(move || self.score_document(&text, metadata, review.as_ref()))
            .await
            .map_err(|e| ScoringError::TaskFailed {
                reason: e.to_string(),
            })
    }
}
