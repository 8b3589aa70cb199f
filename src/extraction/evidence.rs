use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use crate::config::{ConfigError, EvidencePatterns, compile_pattern};

use super::classifier::contains_any;
use super::segmenter::split_sentences;
use super::types::{Evidence, EvidenceSource};

/// Pulls citation, data and result spans out of a document.
#[derive(Debug, Clone)]
pub struct EvidenceExtractor {
    citation: Vec<Regex>,
    numeric: Regex,
    data_keywords: Vec<String>,
    result_keywords: Vec<String>,
    min_chars: usize,
}

impl EvidenceExtractor {
    pub fn new(patterns: &EvidencePatterns, min_chars: usize) -> Result<Self, ConfigError> {
        let citation = patterns
            .citation
            .iter()
            .map(|p| compile_pattern(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            citation,
            numeric: compile_pattern(&patterns.numeric)?,
            data_keywords: patterns.data_keywords.clone(),
            result_keywords: patterns.result_keywords.clone(),
            min_chars,
        })
    }

    /// Runs the citation, data and result passes, in that order, then drops
    /// exact-text duplicates (first occurrence wins). Ids are reassigned so each
    /// evidence id equals its position in the returned list.
    pub fn extract(&self, text: &str) -> Vec<Evidence> {
        let mut found: Vec<(String, EvidenceSource)> = self
            .citation_spans(text)
            .into_iter()
            .map(|(start, end)| (text[start..end].to_string(), EvidenceSource::Citation))
            .collect();

        let sentences: Vec<&str> = split_sentences(text)
            .into_iter()
            .filter(|s| s.chars().count() >= self.min_chars)
            .collect();

        for sentence in &sentences {
            let lowered = sentence.to_lowercase();
            if self.has_data_number(sentence)
                && contains_any(sentence, &lowered, &self.data_keywords)
            {
                found.push((sentence.to_string(), EvidenceSource::Data));
            }
        }

        for sentence in &sentences {
            let lowered = sentence.to_lowercase();
            if contains_any(sentence, &lowered, &self.result_keywords) {
                found.push((sentence.to_string(), EvidenceSource::Result));
            }
        }

        let extracted = found.len();
        let mut seen = HashSet::new();
        let evidences: Vec<Evidence> = found
            .into_iter()
            .filter(|(text, _)| seen.insert(text.clone()))
            .enumerate()
            .map(|(id, (text, source))| Evidence::new(id, text, source))
            .collect();

        debug!(
            extracted,
            unique = evidences.len(),
            "Evidence extraction complete"
        );

        evidences
    }

    /// Citation matches from every pattern, in text order. Where matches
    /// overlap, the earliest-starting one wins, then the longest.
    fn citation_spans(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans: Vec<(usize, usize)> = self
            .citation
            .iter()
            .flat_map(|regex| regex.find_iter(text).map(|m| (m.start(), m.end())))
            .collect();
        spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut kept: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
        for span in spans {
            match kept.last() {
                Some(&(_, end)) if span.0 < end => {}
                _ => kept.push(span),
            }
        }
        kept
    }

    /// Numeric check for the data pass, ignoring years inside citations.
    fn has_data_number(&self, sentence: &str) -> bool {
        let mut rest = String::with_capacity(sentence.len());
        let mut last = 0;
        for (start, end) in self.citation_spans(sentence) {
            rest.push_str(&sentence[last..start]);
            rest.push(' ');
            last = end;
        }
        rest.push_str(&sentence[last..]);
        self.numeric.is_match(&rest)
    }
}
