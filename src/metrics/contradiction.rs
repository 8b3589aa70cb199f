use tracing::{debug, warn};

use super::sampling::{run_batched, sample_indices};
use super::{Metric, MetricComputer, MetricContext, MetricOutcome, PairStats};
use crate::constants::CONTRADICTION_PENALTY_DEFAULT;
use crate::embedding::EntailmentLabel;
use crate::extraction::ArgumentGraph;

/// One minus the share of evidence pairs (under the same claim) that contradict.
///
/// Claims with more than `max_evidences_per_claim` evidences are sampled down
/// first, then the document-wide pair list is capped at
/// `max_contradiction_pairs`. A pair contradicts when the contradiction
/// probability exceeds `contradiction_threshold`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContradictionPenalty;

impl MetricComputer for ContradictionPenalty {
    fn metric(&self) -> Metric {
        Metric::ContradictionPenalty
    }

    fn compute(&self, graph: &mut ArgumentGraph, ctx: &MetricContext<'_>) -> MetricOutcome {
        let Some(nli) = ctx.nli() else {
            warn!(
                default = CONTRADICTION_PENALTY_DEFAULT,
                "NLI unavailable, contradiction penalty uses default"
            );
            return MetricOutcome::defaulted(CONTRADICTION_PENALTY_DEFAULT);
        };

        let perf = ctx.config.performance();
        let mut rng = ctx.rng();

        // (claim index, first evidence id, second evidence id)
        let mut all_pairs: Vec<(usize, usize, usize)> = Vec::new();
        for (claim_idx, claim) in graph.claims.iter().enumerate() {
            let bound = &claim.evidences;
            if bound.len() < 2 {
                continue;
            }

            let kept: Vec<usize> = if bound.len() > perf.max_evidences_per_claim {
                debug!(
                    claim = claim.id,
                    evidences = bound.len(),
                    cap = perf.max_evidences_per_claim,
                    "Sampling evidences for contradiction check"
                );
                sample_indices(&mut rng, bound.len(), perf.max_evidences_per_claim)
                    .into_iter()
                    .map(|i| bound[i])
                    .collect()
            } else {
                bound.clone()
            };

            for i in 0..kept.len() {
                for j in (i + 1)..kept.len() {
                    all_pairs.push((claim_idx, kept[i], kept[j]));
                }
            }
        }

        let mut stats = PairStats {
            available: all_pairs.len(),
            ..Default::default()
        };
        if all_pairs.is_empty() {
            return MetricOutcome::no_data(1.0).with_pairs(stats);
        }

        let selected: Vec<(usize, usize, usize)> =
            if all_pairs.len() > perf.max_contradiction_pairs {
                stats.truncated = true;
                warn!(
                    available = all_pairs.len(),
                    cap = perf.max_contradiction_pairs,
                    "Contradiction pairs exceed cap, sampling"
                );
                sample_indices(&mut rng, all_pairs.len(), perf.max_contradiction_pairs)
                    .into_iter()
                    .map(|i| all_pairs[i])
                    .collect()
            } else {
                all_pairs
            };

        let texts: Vec<(&str, &str)> = selected
            .iter()
            .map(|&(_, a, b)| {
                (
                    graph.evidences[a].text.as_str(),
                    graph.evidences[b].text.as_str(),
                )
            })
            .collect();

        let run = run_batched(nli, &texts, perf.nli_batch_size);
        stats.total_batches = run.total_batches;
        stats.failed_batches = run.failed_batches;
        stats.evaluated = run.predictions.len();

        if run.all_failed() {
            warn!(
                batches = run.total_batches,
                "Every NLI batch failed, contradiction penalty uses default"
            );
            return MetricOutcome::defaulted(CONTRADICTION_PENALTY_DEFAULT).with_pairs(stats);
        }

        let threshold = ctx.config.thresholds().contradiction_threshold;
        // (contradicting, evaluated) per claim
        let mut per_claim = vec![(0usize, 0usize); graph.claims.len()];
        let mut contradicting = 0usize;
        for (pair_idx, prediction) in &run.predictions {
            let (claim_idx, _, _) = selected[*pair_idx];
            let conflict = prediction.probability(&EntailmentLabel::Contradiction) > threshold;
            per_claim[claim_idx].1 += 1;
            if conflict {
                per_claim[claim_idx].0 += 1;
                contradicting += 1;
            }
        }

        for (claim, &(hits, total)) in graph.claims.iter_mut().zip(&per_claim) {
            if total > 0 {
                claim.record_score(self.metric().as_str(), 1.0 - hits as f64 / total as f64);
            }
        }

        let value = 1.0 - contradicting as f64 / stats.evaluated as f64;
        debug!(
            value,
            contradicting,
            evaluated = stats.evaluated,
            available = stats.available,
            "Contradiction penalty"
        );
        MetricOutcome::computed(value).with_pairs(stats)
    }
}
