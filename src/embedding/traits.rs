use super::error::EmbeddingError;
use super::nli::{NliError, NliPrediction};

/// Text to fixed-size vector encoder.
///
/// Implementations must return exactly one vector per input, in input order.
pub trait SentenceEncoder: Send + Sync {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// (premise, hypothesis) classifier returning a label distribution per pair.
pub trait EntailmentModel: Send + Sync {
    fn classify(&self, pairs: &[(&str, &str)]) -> Result<Vec<NliPrediction>, NliError>;
}
