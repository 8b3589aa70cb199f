use tracing::debug;

use super::{Metric, MetricComputer, MetricContext, MetricOutcome, mean};
use crate::extraction::ArgumentGraph;

/// Share of claims backed by enough evidence.
///
/// Weighted mode scores each claim `min(1, n / min_evidences_per_claim)`;
/// threshold mode scores it 1 when `n >= min_evidences_per_claim`, else 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct CitationCoverage;

impl MetricComputer for CitationCoverage {
    fn metric(&self) -> Metric {
        Metric::CitationCoverage
    }

    fn compute(&self, graph: &mut ArgumentGraph, ctx: &MetricContext<'_>) -> MetricOutcome {
        if graph.claims.is_empty() {
            return MetricOutcome::no_data(0.0);
        }

        let options = ctx.config.citation_coverage();
        let required = options.min_evidences_per_claim.max(1) as f64;

        let mut per_claim = Vec::with_capacity(graph.claims.len());
        for claim in &mut graph.claims {
            let count = claim.evidences.len() as f64;
            let score = if options.use_weighted_coverage {
                (count / required).min(1.0)
            } else if count >= required {
                1.0
            } else {
                0.0
            };
            claim.record_score(self.metric().as_str(), score);
            per_claim.push(score);
        }

        let value = mean(&per_claim);
        debug!(
            value,
            weighted = options.use_weighted_coverage,
            "Citation coverage"
        );
        MetricOutcome::computed(value)
    }
}
