use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::binding::BindingStrategy;
use crate::config::MetricWeights;
use crate::constants::CLAIM_PREVIEW_CHARS;
use crate::embedding::ModelStatus;
use crate::extraction::{Claim, ClaimType};
use crate::metrics::{Metric, OutcomeSource, PairStats};

/// All eight metric values, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DimensionScores {
    pub citation_coverage: f64,
    pub causal_relevance: f64,
    pub support_strength: f64,
    pub contradiction_penalty: f64,
    pub evidence_sufficiency: f64,
    pub endogeneity_quality: f64,
    pub methodology_rigor: f64,
    pub academic_standards: f64,
}

impl DimensionScores {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::CitationCoverage => self.citation_coverage,
            Metric::CausalRelevance => self.causal_relevance,
            Metric::SupportStrength => self.support_strength,
            Metric::ContradictionPenalty => self.contradiction_penalty,
            Metric::EvidenceSufficiency => self.evidence_sufficiency,
            Metric::EndogeneityQuality => self.endogeneity_quality,
            Metric::MethodologyRigor => self.methodology_rigor,
            Metric::AcademicStandards => self.academic_standards,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::CitationCoverage => &mut self.citation_coverage,
            Metric::CausalRelevance => &mut self.causal_relevance,
            Metric::SupportStrength => &mut self.support_strength,
            Metric::ContradictionPenalty => &mut self.contradiction_penalty,
            Metric::EvidenceSufficiency => &mut self.evidence_sufficiency,
            Metric::EndogeneityQuality => &mut self.endogeneity_quality,
            Metric::MethodologyRigor => &mut self.methodology_rigor,
            Metric::AcademicStandards => &mut self.academic_standards,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(|m| (m, self.get(m)))
    }
}

/// Preview of one claim in a [`ScoreResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimSummary {
    pub id: usize,
    /// Claim text, cut to 100 characters plus `...` when longer.
    pub text: String,
    #[serde(rename = "type")]
    pub claim_type: ClaimType,
    pub evidence_count: usize,
    pub scores: BTreeMap<String, f64>,
}

impl ClaimSummary {
    pub fn from_claim(claim: &Claim) -> Self {
        let text = if claim.text.chars().count() > CLAIM_PREVIEW_CHARS {
            let mut cut: String = claim.text.chars().take(CLAIM_PREVIEW_CHARS).collect();
            cut.push_str("...");
            cut
        } else {
            claim.text.clone()
        };

        Self {
            id: claim.id,
            text,
            claim_type: claim.claim_type,
            evidence_count: claim.evidences.len(),
            scores: claim.derived_scores.clone(),
        }
    }
}

/// How the result was produced, including every degraded path taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub binding_strategy: BindingStrategy,
    pub models: ModelStatus,
    pub metric_sources: BTreeMap<Metric, OutcomeSource>,
    /// Metrics that fell back to their model-unavailable default.
    pub defaulted_metrics: Vec<Metric>,
    pub support_pairs: PairStats,
    pub contradiction_pairs: PairStats,
    /// Review metrics with no usable field (scored 0.0).
    pub missing_review_fields: Vec<Metric>,
}

/// The complete output of one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Weighted sum of all metrics, in `[0, 1]`.
    pub total_score: f64,
    /// `total_score * 100`.
    pub normalized_score: f64,
    pub dimension_scores: DimensionScores,
    pub weights: MetricWeights,
    pub claims_count: usize,
    pub evidences_count: usize,
    pub claims_with_evidence: usize,
    pub claim_type_distribution: BTreeMap<ClaimType, usize>,
    /// The first few claims, for inspection.
    pub sampled_claims: Vec<ClaimSummary>,
    pub diagnostics: Diagnostics,
    /// Caller metadata, echoed back unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl ScoreResult {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
