use crate::config::ClaimRule;

use super::types::ClaimType;

/// Case-insensitive for ASCII keywords, verbatim otherwise.
///
/// `lowered` must be `text.to_lowercase()`; callers checking many keywords
/// against the same text compute it once.
pub(crate) fn contains_keyword(text: &str, lowered: &str, keyword: &str) -> bool {
    if keyword.is_ascii() {
        lowered.contains(&keyword.to_ascii_lowercase())
    } else {
        text.contains(keyword)
    }
}

pub(crate) fn contains_any(text: &str, lowered: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|kw| contains_keyword(text, lowered, kw))
}

/// Ordered rule table mapping keyword hits to a [`ClaimType`].
///
/// Rules are evaluated in order and the first hit wins, so precedence lives in
/// the table rather than in control flow. No hit means [`ClaimType::General`].
#[derive(Debug, Clone)]
pub struct ClaimClassifier {
    rules: Vec<ClaimRule>,
}

impl ClaimClassifier {
    pub fn new(rules: Vec<ClaimRule>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, text: &str) -> ClaimType {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| contains_any(text, &lowered, &rule.keywords))
            .map(|rule| rule.claim_type)
            .unwrap_or(ClaimType::General)
    }

    pub fn rules(&self) -> &[ClaimRule] {
        &self.rules
    }
}
