//! Claim/evidence binding.
//!
//! Strategies are tried in order and the first that succeeds wins:
//! 1. [`BindingStrategy::Embedding`]: cosine similarity above the configured threshold.
//! 2. [`BindingStrategy::Lexical`]: substring / leading-token overlap. This is a
//!    degraded mode used only when no encoder is usable, and it is reported in
//!    the result diagnostics.


use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ScoringConfig;
use crate::constants::LEXICAL_BINDING_TOKENS;
use crate::embedding::{EmbeddingError, SentenceEncoder, cosine_similarity};
use crate::extraction::ArgumentGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingStrategy {
    Embedding,
    Lexical,
}

impl BindingStrategy {
    pub const ORDER: [BindingStrategy; 2] = [BindingStrategy::Embedding, BindingStrategy::Lexical];
}

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("no sentence encoder available")]
    EncoderUnavailable,

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

/// Links claims to the evidence that plausibly supports them.
#[derive(Debug, Clone)]
pub struct Binder {
    similarity_threshold: f32,
    lexical_tokens: usize,
}

impl Binder {
    pub fn new(similarity_threshold: f32) -> Self {
        Self {
            similarity_threshold,
            lexical_tokens: LEXICAL_BINDING_TOKENS,
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.thresholds().claim_evidence_similarity)
    }

    /// Populates every claim's `evidences` and returns the strategy that did it.
    pub fn bind(
        &self,
        graph: &mut ArgumentGraph,
        encoder: Option<&dyn SentenceEncoder>,
    ) -> BindingStrategy {
        for strategy in BindingStrategy::ORDER {
            let attempt = match strategy {
                BindingStrategy::Embedding => self.bind_by_embedding(graph, encoder),
                BindingStrategy::Lexical => {
                    self.bind_lexically(graph);
                    Ok(())
                }
            };

            match attempt {
                Ok(()) => {
                    debug!(
                        ?strategy,
                        claims_with_evidence = graph.claims_with_evidence(),
                        "Binding complete"
                    );
                    return strategy;
                }
                Err(e) => {
                    warn!(?strategy, error = %e, "Binding strategy failed, trying next");
                }
            }
        }

        // Lexical binding cannot fail.
        BindingStrategy::Lexical
    }

    fn bind_by_embedding(
        &self,
        graph: &mut ArgumentGraph,
        encoder: Option<&dyn SentenceEncoder>,
    ) -> Result<(), BindingError> {
        let encoder = encoder.ok_or(BindingError::EncoderUnavailable)?;
        if graph.claims.is_empty() || graph.evidences.is_empty() {
            return Ok(());
        }

        let claim_texts: Vec<&str> = graph.claims.iter().map(|c| c.text.as_str()).collect();
        let evidence_texts: Vec<&str> = graph.evidences.iter().map(|e| e.text.as_str()).collect();

        let claim_vectors = encode_exact(encoder, &claim_texts)?;
        let evidence_vectors = encode_exact(encoder, &evidence_texts)?;

        let mut links = Vec::new();
        for (claim_idx, claim_vec) in claim_vectors.iter().enumerate() {
            for (evidence_id, evidence_vec) in evidence_vectors.iter().enumerate() {
                if cosine_similarity(claim_vec, evidence_vec) > self.similarity_threshold {
                    links.push((claim_idx, evidence_id));
                }
            }
        }

        debug!(
            claims = claim_vectors.len(),
            evidences = evidence_vectors.len(),
            links = links.len(),
            threshold = self.similarity_threshold,
            "Similarity binding"
        );

        for (claim_idx, evidence_id) in links {
            graph.bind(claim_idx, evidence_id);
        }
        Ok(())
    }

    fn bind_lexically(&self, graph: &mut ArgumentGraph) {
        warn!("Binding claims by lexical overlap (no sentence encoder)");

        let mut links = Vec::new();
        for (claim_idx, claim) in graph.claims.iter().enumerate() {
            let lead: Vec<&str> = claim
                .text
                .split_whitespace()
                .take(self.lexical_tokens)
                .collect();

            for evidence in &graph.evidences {
                if claim.text.contains(evidence.text.as_str())
                    || lead.iter().any(|token| evidence.text.contains(token))
                {
                    links.push((claim_idx, evidence.id));
                }
            }
        }

        for (claim_idx, evidence_id) in links {
            graph.bind(claim_idx, evidence_id);
        }
    }
}

/// Encodes `texts`, rejecting a response with the wrong vector count.
pub(crate) fn encode_exact(
    encoder: &dyn SentenceEncoder,
    texts: &[&str],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let vectors = encoder.encode(texts)?;
    if vectors.len() != texts.len() {
        return Err(EmbeddingError::CountMismatch {
            expected: texts.len(),
            got: vectors.len(),
        });
    }
    Ok(vectors)
}
