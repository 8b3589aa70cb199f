use tracing::{debug, warn};

use super::{Metric, MetricComputer, MetricContext, MetricOutcome, mean};
use crate::binding::encode_exact;
use crate::constants::{CAUSAL_RELEVANCE_DEFAULT, RELEVANCE_TOP_K};
use crate::embedding::cosine_similarity;
use crate::extraction::ArgumentGraph;

/// Semantic closeness of each claim to its bound evidence.
///
/// Per claim: mean of the top-2 cosine similarities (or the single one).
/// Document: mean over claims with at least one evidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct CausalRelevance;

impl MetricComputer for CausalRelevance {
    fn metric(&self) -> Metric {
        Metric::CausalRelevance
    }

    fn compute(&self, graph: &mut ArgumentGraph, ctx: &MetricContext<'_>) -> MetricOutcome {
        let Some(encoder) = ctx.encoder() else {
            warn!(
                default = CAUSAL_RELEVANCE_DEFAULT,
                "No sentence encoder, causal relevance uses default"
            );
            return MetricOutcome::defaulted(CAUSAL_RELEVANCE_DEFAULT);
        };

        let qualifying: Vec<usize> = graph
            .claims
            .iter()
            .enumerate()
            .filter(|(_, c)| c.has_evidence())
            .map(|(idx, _)| idx)
            .collect();
        if qualifying.is_empty() {
            return MetricOutcome::no_data(0.0);
        }

        // One batch: qualifying claims first, then every evidence.
        let mut texts: Vec<&str> = qualifying
            .iter()
            .map(|&idx| graph.claims[idx].text.as_str())
            .collect();
        texts.extend(graph.evidences.iter().map(|e| e.text.as_str()));

        let vectors = match encode_exact(encoder, &texts) {
            Ok(vectors) => vectors,
            Err(e) => {
                warn!(error = %e, "Embedding failed, causal relevance uses default");
                return MetricOutcome::defaulted(CAUSAL_RELEVANCE_DEFAULT);
            }
        };
        let (claim_vectors, evidence_vectors) = vectors.split_at(qualifying.len());

        let mut per_claim = Vec::with_capacity(qualifying.len());
        for (&claim_idx, claim_vec) in qualifying.iter().zip(claim_vectors) {
            let mut similarities: Vec<f64> = graph.claims[claim_idx]
                .evidences
                .iter()
                .filter_map(|&id| evidence_vectors.get(id))
                .map(|evidence_vec| cosine_similarity(claim_vec, evidence_vec) as f64)
                .collect();
            similarities.sort_by(|a, b| b.total_cmp(a));
            similarities.truncate(RELEVANCE_TOP_K);

            let score = mean(&similarities).clamp(0.0, 1.0);
            graph.claims[claim_idx].record_score(self.metric().as_str(), score);
            per_claim.push(score);
        }

        let value = mean(&per_claim);
        debug!(value, claims = per_claim.len(), "Causal relevance");
        MetricOutcome::computed(value)
    }
}
