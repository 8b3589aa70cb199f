//! Seeded subset sampling and batched NLI execution.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::warn;

use crate::embedding::{EntailmentModel, NliError, NliPrediction};

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Picks `amount` of `0..len` without replacement, returned in ascending order.
/// Returns every index when `amount >= len`.
pub fn sample_indices(rng: &mut StdRng, len: usize, amount: usize) -> Vec<usize> {
    if amount >= len {
        return (0..len).collect();
    }
    let mut picked = rand::seq::index::sample(rng, len, amount).into_vec();
    picked.sort_unstable();
    picked
}

/// Predictions from a batched NLI run. Pairs in failed batches are absent.
#[derive(Debug, Default)]
pub struct BatchRun {
    /// `(pair index, prediction)` for every pair in a successful batch.
    pub predictions: Vec<(usize, NliPrediction)>,
    pub total_batches: usize,
    pub failed_batches: usize,
}

impl BatchRun {
    /// True when there was work to do and none of it succeeded.
    pub fn all_failed(&self) -> bool {
        self.total_batches > 0 && self.failed_batches == self.total_batches
    }
}

/// Classifies `pairs` in chunks of `batch_size`. A failing chunk is logged and
/// skipped; the remaining chunks still run.
pub fn run_batched(
    model: &dyn EntailmentModel,
    pairs: &[(&str, &str)],
    batch_size: usize,
) -> BatchRun {
    let batch_size = batch_size.max(1);
    let mut run = BatchRun::default();

    for (batch_idx, chunk) in pairs.chunks(batch_size).enumerate() {
        run.total_batches += 1;
        let offset = batch_idx * batch_size;

        let outcome = model.classify(chunk).and_then(|predictions| {
            if predictions.len() == chunk.len() {
                Ok(predictions)
            } else {
                Err(NliError::CountMismatch {
                    expected: chunk.len(),
                    got: predictions.len(),
                })
            }
        });

        match outcome {
            Ok(predictions) => {
                run.predictions.extend(
                    predictions
                        .into_iter()
                        .enumerate()
                        .map(|(i, p)| (offset + i, p)),
                );
            }
            Err(e) => {
                run.failed_batches += 1;
                warn!(batch = batch_idx, pairs = chunk.len(), error = %e, "NLI batch failed, skipping");
            }
        }
    }

    run
}
