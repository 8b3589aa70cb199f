use crate::config::MetricWeights;
use crate::metrics::Metric;

use super::types::DimensionScores;

/// Weighted sum of the eight metrics.
#[derive(Debug, Clone)]
pub struct Aggregator {
    weights: MetricWeights,
}

impl Aggregator {
    pub fn new(weights: MetricWeights) -> Self {
        Self { weights }
    }

    /// `Σ weight × metric`, clamped to `[0, 1]` to absorb the weight-sum tolerance.
    pub fn total(&self, scores: &DimensionScores) -> f64 {
        Metric::ALL
            .iter()
            .map(|&m| self.weights.get(m) * scores.get(m))
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }

    pub fn normalized(total: f64) -> f64 {
        total * 100.0
    }

    pub fn weights(&self) -> &MetricWeights {
        &self.weights
    }
}
