use std::collections::HashSet;

use tracing::debug;

use super::{Metric, MetricComputer, MetricContext, MetricOutcome, mean};
use crate::extraction::ArgumentGraph;

/// Independent evidence count against the per-type need.
///
/// Identical evidence texts count once. A claim type with need 0 scores 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvidenceSufficiency;

impl MetricComputer for EvidenceSufficiency {
    fn metric(&self) -> Metric {
        Metric::EvidenceSufficiency
    }

    fn compute(&self, graph: &mut ArgumentGraph, ctx: &MetricContext<'_>) -> MetricOutcome {
        if graph.claims.is_empty() {
            return MetricOutcome::no_data(0.0);
        }

        let needs = ctx.config.evidence_needs();
        let mut per_claim = Vec::with_capacity(graph.claims.len());

        for idx in 0..graph.claims.len() {
            let claim = &graph.claims[idx];
            let need = needs.for_type(claim.claim_type);
            let score = if need == 0 {
                1.0
            } else {
                let independent: HashSet<&str> = graph
                    .evidence_for(claim)
                    .map(|e| e.text.as_str())
                    .collect();
                (independent.len() as f64 / need as f64).min(1.0)
            };
            graph.claims[idx].record_score(self.metric().as_str(), score);
            per_claim.push(score);
        }

        let value = mean(&per_claim);
        debug!(value, "Evidence sufficiency");
        MetricOutcome::computed(value)
    }
}
