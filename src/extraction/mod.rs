//! Claim and evidence extraction.
//!
//! - [`TextSegmenter`] splits text into claim candidates.
//! - [`ClaimClassifier`] assigns each candidate a [`ClaimType`] from an ordered rule table.
//! - [`EvidenceExtractor`] finds citation, data and result spans.
//!
//! [`DocumentParser`] runs all three and returns an unbound [`ArgumentGraph`].

pub mod classifier;
pub mod evidence;
pub mod segmenter;
pub mod types;

#[cfg(test)]
mod tests;

pub use classifier::ClaimClassifier;
pub use evidence::EvidenceExtractor;
pub use segmenter::{TextSegmenter, split_sentences};
pub use types::{ArgumentGraph, Claim, ClaimType, Evidence, EvidenceId, EvidenceSource};

use tracing::debug;

use crate::config::{ConfigError, ScoringConfig};

/// Turns raw document text into claims and evidence.
#[derive(Debug, Clone)]
pub struct DocumentParser {
    segmenter: TextSegmenter,
    classifier: ClaimClassifier,
    extractor: EvidenceExtractor,
}

impl DocumentParser {
    pub fn new(config: &ScoringConfig) -> Result<Self, ConfigError> {
        let text = config.text_processing();
        Ok(Self {
            segmenter: TextSegmenter::new(text.min_claim_length, text.max_claim_length),
            classifier: ClaimClassifier::new(config.claim_keywords().to_vec()),
            extractor: EvidenceExtractor::new(config.evidence_patterns(), text.min_evidence_length)?,
        })
    }

    pub fn extract_claims(&self, text: &str) -> Vec<Claim> {
        self.segmenter
            .segment(text)
            .into_iter()
            .enumerate()
            .map(|(id, unit)| Claim::new(id, unit, self.classifier.classify(unit)))
            .collect()
    }

    pub fn extract_evidences(&self, text: &str) -> Vec<Evidence> {
        self.extractor.extract(text)
    }

    pub fn parse(&self, text: &str) -> ArgumentGraph {
        let claims = self.extract_claims(text);
        let evidences = self.extract_evidences(text);

        debug!(
            claims = claims.len(),
            evidences = evidences.len(),
            "Parsed document"
        );

        ArgumentGraph::new(claims, evidences)
    }
}
