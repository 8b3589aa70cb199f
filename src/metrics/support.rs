use tracing::{debug, warn};

use super::sampling::{run_batched, sample_indices};
use super::{Metric, MetricComputer, MetricContext, MetricOutcome, PairStats, mean};
use crate::constants::{SUPPORT_STRENGTH_DEFAULT, UNKNOWN_LABEL_SUPPORT_SCORE};
use crate::embedding::{EntailmentLabel, NliPrediction};
use crate::extraction::ArgumentGraph;

/// How strongly bound evidence entails its claim.
///
/// Each (evidence, claim) pair is classified with the evidence as premise.
/// The top label maps to a score: entailment keeps its confidence, neutral
/// keeps `neutral_support_score` times its confidence, contradiction scores 0
/// and any other label scores 0.3.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupportStrength;

pub(crate) fn pair_support(prediction: &NliPrediction, neutral_factor: f32) -> f64 {
    let Some(top) = prediction.top() else {
        return UNKNOWN_LABEL_SUPPORT_SCORE as f64;
    };
    let score = match top.label {
        EntailmentLabel::Entailment => top.score,
        EntailmentLabel::Neutral => neutral_factor * top.score,
        EntailmentLabel::Contradiction => 0.0,
        EntailmentLabel::Other(_) => UNKNOWN_LABEL_SUPPORT_SCORE,
    };
    (score as f64).clamp(0.0, 1.0)
}

impl MetricComputer for SupportStrength {
    fn metric(&self) -> Metric {
        Metric::SupportStrength
    }

    fn compute(&self, graph: &mut ArgumentGraph, ctx: &MetricContext<'_>) -> MetricOutcome {
        let Some(nli) = ctx.nli() else {
            warn!(
                default = SUPPORT_STRENGTH_DEFAULT,
                "NLI unavailable, support strength uses default"
            );
            return MetricOutcome::defaulted(SUPPORT_STRENGTH_DEFAULT);
        };

        let perf = ctx.config.performance();

        // (claim index, evidence id) for every binding.
        let all_pairs: Vec<(usize, usize)> = graph
            .claims
            .iter()
            .enumerate()
            .flat_map(|(idx, claim)| claim.evidences.iter().map(move |&e| (idx, e)))
            .collect();

        let mut stats = PairStats {
            available: all_pairs.len(),
            ..Default::default()
        };
        if all_pairs.is_empty() {
            return MetricOutcome::no_data(0.0).with_pairs(stats);
        }

        let selected: Vec<(usize, usize)> = if all_pairs.len() > perf.max_support_pairs {
            stats.truncated = true;
            warn!(
                available = all_pairs.len(),
                cap = perf.max_support_pairs,
                "Support pairs exceed cap, sampling"
            );
            let mut rng = ctx.rng();
            sample_indices(&mut rng, all_pairs.len(), perf.max_support_pairs)
                .into_iter()
                .map(|i| all_pairs[i])
                .collect()
        } else {
            all_pairs
        };

        let texts: Vec<(&str, &str)> = selected
            .iter()
            .map(|&(claim_idx, evidence_id)| {
                (
                    graph.evidences[evidence_id].text.as_str(),
                    graph.claims[claim_idx].text.as_str(),
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
                "Every NLI batch failed, support strength uses default"
            );
            return MetricOutcome::defaulted(SUPPORT_STRENGTH_DEFAULT).with_pairs(stats);
        }

        let neutral_factor = ctx.config.thresholds().neutral_support_score;
        let mut per_claim: Vec<Vec<f64>> = vec![Vec::new(); graph.claims.len()];
        let mut all_scores = Vec::with_capacity(run.predictions.len());
        for (pair_idx, prediction) in &run.predictions {
            let (claim_idx, _) = selected[*pair_idx];
            let score = pair_support(prediction, neutral_factor);
            per_claim[claim_idx].push(score);
            all_scores.push(score);
        }

        for (claim, scores) in graph.claims.iter_mut().zip(&per_claim) {
            if !scores.is_empty() {
                claim.record_score(self.metric().as_str(), mean(scores));
            }
        }

        let value = mean(&all_scores);
        debug!(
            value,
            evaluated = stats.evaluated,
            available = stats.available,
            failed_batches = stats.failed_batches,
            "Support strength"
        );
        MetricOutcome::computed(value).with_pairs(stats)
    }
}
