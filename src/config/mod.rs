//! Scoring configuration.
//!
//! [`ScoringOptions`] is the plain, serde-friendly bag of every recognised option with
//! documented defaults. [`ScoringConfig`] is the validated, immutable form the engine
//! consumes: weights, thresholds, caps and regexes are all checked once in
//! [`ScoringConfig::new`], never per scoring call.
//!
//! Both can be overridden from `AES_*` environment variables, and [`ModelConfig`]
//! locates the model directories the same way.

pub mod error;
pub mod keywords;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTRADICTION_THRESHOLD, DEFAULT_EMBEDDING_CACHE_CAPACITY, DEFAULT_MAX_CLAIM_LENGTH,
    DEFAULT_MAX_CONTRADICTION_PAIRS, DEFAULT_MAX_EVIDENCES_PER_CLAIM, DEFAULT_MAX_SUPPORT_PAIRS,
    DEFAULT_MIN_CLAIM_LENGTH, DEFAULT_MIN_EVIDENCE_LENGTH, DEFAULT_MIN_EVIDENCES_PER_CLAIM,
    DEFAULT_NEUTRAL_SUPPORT_SCORE, DEFAULT_NLI_BATCH_SIZE, DEFAULT_SAMPLING_SEED,
    DEFAULT_SIMILARITY_THRESHOLD, WEIGHT_SUM_TOLERANCE,
};
use crate::extraction::ClaimType;
use crate::metrics::Metric;

/// Weight per metric. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
    pub citation_coverage: f64,
    pub causal_relevance: f64,
    pub support_strength: f64,
    pub contradiction_penalty: f64,
    pub evidence_sufficiency: f64,
    pub endogeneity_quality: f64,
    pub methodology_rigor: f64,
    pub academic_standards: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            citation_coverage: 0.15,
            causal_relevance: 0.15,
            support_strength: 0.20,
            contradiction_penalty: 0.15,
            evidence_sufficiency: 0.15,
            endogeneity_quality: 0.07,
            methodology_rigor: 0.07,
            academic_standards: 0.06,
        }
    }
}

impl MetricWeights {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::CitationCoverage => self.citation_coverage,
            Metric::CausalRelevance => self.causal_relevance,
            Metric::SupportStrength => self.support_strength,
            Metric::ContradictionPenalty => self.contradiction_penalty,
            Metric::EvidenceSufficiency => self.evidence_sufficiency,
            Metric::EndogeneityQuality => self.endogeneity_quality,
            Metric::MethodologyRigor => self.methodology_rigor,
            Metric::AcademicStandards => self.academic_standards,
        }
    }

    pub fn sum(&self) -> f64 {
        Metric::ALL.iter().map(|m| self.get(*m)).sum()
    }
}

/// Independent pieces of evidence each claim type needs for full sufficiency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceNeeds {
    pub background: usize,
    pub general: usize,
    pub hypothesis: usize,
    pub conclusion: usize,
    pub mechanism: usize,
}

impl Default for EvidenceNeeds {
    fn default() -> Self {
        Self {
            background: 0,
            general: 1,
            hypothesis: 3,
            conclusion: 3,
            mechanism: 2,
        }
    }
}

impl EvidenceNeeds {
    pub fn for_type(&self, claim_type: ClaimType) -> usize {
        match claim_type {
            ClaimType::Background => self.background,
            ClaimType::General => self.general,
            ClaimType::Hypothesis => self.hypothesis,
            ClaimType::Conclusion => self.conclusion,
            ClaimType::Mechanism => self.mechanism,
        }
    }
}

/// One row of the ordered claim classification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRule {
    pub claim_type: ClaimType,
    pub keywords: Vec<String>,
}

impl ClaimRule {
    pub fn new(claim_type: ClaimType, keywords: Vec<String>) -> Self {
        Self {
            claim_type,
            keywords,
        }
    }
}

/// Regexes and keyword lists driving evidence extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidencePatterns {
    /// Citation regexes, matched against the full text.
    pub citation: Vec<String>,
    /// What counts as a numeric token for the data pass.
    pub numeric: String,
    pub data_keywords: Vec<String>,
    pub result_keywords: Vec<String>,
}

impl Default for EvidencePatterns {
    fn default() -> Self {
        keywords::default_evidence_patterns()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum cosine similarity for a claim/evidence binding.
    pub claim_evidence_similarity: f32,
    /// Contradiction probability above which an evidence pair counts as conflicting.
    pub contradiction_threshold: f32,
    /// Multiplier applied to a "neutral" NLI confidence when scoring support.
    ///
    /// Academic prose often supports a claim indirectly, so neutral is partial
    /// support rather than none. Set to 0.0 to treat neutral as unsupported.
    pub neutral_support_score: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            claim_evidence_similarity: DEFAULT_SIMILARITY_THRESHOLD,
            contradiction_threshold: DEFAULT_CONTRADICTION_THRESHOLD,
            neutral_support_score: DEFAULT_NEUTRAL_SUPPORT_SCORE,
        }
    }
}

/// Batch size and the hard caps on pairwise NLI work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceOptions {
    pub nli_batch_size: usize,
    pub max_support_pairs: usize,
    pub max_contradiction_pairs: usize,
    pub max_evidences_per_claim: usize,
    /// When false, NLI-backed metrics report their defaults without inference.
    pub enable_nli: bool,
    /// Seed for the subset sampling used when a cap is exceeded.
    pub sampling_seed: u64,
}

impl Default for PerformanceOptions {
    fn default() -> Self {
        Self {
            nli_batch_size: DEFAULT_NLI_BATCH_SIZE,
            max_support_pairs: DEFAULT_MAX_SUPPORT_PAIRS,
            max_contradiction_pairs: DEFAULT_MAX_CONTRADICTION_PAIRS,
            max_evidences_per_claim: DEFAULT_MAX_EVIDENCES_PER_CLAIM,
            enable_nli: true,
            sampling_seed: DEFAULT_SAMPLING_SEED,
        }
    }
}

/// Length bounds, in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProcessing {
    pub min_claim_length: usize,
    pub max_claim_length: usize,
    pub min_evidence_length: usize,
}

impl Default for TextProcessing {
    fn default() -> Self {
        Self {
            min_claim_length: DEFAULT_MIN_CLAIM_LENGTH,
            max_claim_length: DEFAULT_MAX_CLAIM_LENGTH,
            min_evidence_length: DEFAULT_MIN_EVIDENCE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageOptions {
    /// Evidence count at which a claim is fully covered.
    pub min_evidences_per_claim: usize,
    /// Weighted mode credits partial coverage; threshold mode counts covered claims.
    pub use_weighted_coverage: bool,
}

impl Default for CoverageOptions {
    fn default() -> Self {
        Self {
            min_evidences_per_claim: DEFAULT_MIN_EVIDENCES_PER_CLAIM,
            use_weighted_coverage: true,
        }
    }
}

/// Every recognised scoring option, unvalidated.
///
/// Deserializes from JSON with any subset of fields present; missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringOptions {
    pub weights: MetricWeights,
    pub evidence_needs: EvidenceNeeds,
    pub claim_keywords: Vec<ClaimRule>,
    pub evidence_patterns: EvidencePatterns,
    pub thresholds: Thresholds,
    pub performance: PerformanceOptions,
    pub text_processing: TextProcessing,
    pub citation_coverage: CoverageOptions,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
            evidence_needs: EvidenceNeeds::default(),
            claim_keywords: keywords::default_claim_rules(),
            evidence_patterns: EvidencePatterns::default(),
            thresholds: Thresholds::default(),
            performance: PerformanceOptions::default(),
            text_processing: TextProcessing::default(),
            citation_coverage: CoverageOptions::default(),
        }
    }
}

impl ScoringOptions {
    const ENV_SIMILARITY_THRESHOLD: &'static str = "AES_SIMILARITY_THRESHOLD";
    const ENV_CONTRADICTION_THRESHOLD: &'static str = "AES_CONTRADICTION_THRESHOLD";
    const ENV_NEUTRAL_SUPPORT_SCORE: &'static str = "AES_NEUTRAL_SUPPORT_SCORE";
    const ENV_NLI_BATCH_SIZE: &'static str = "AES_NLI_BATCH_SIZE";
    const ENV_MAX_SUPPORT_PAIRS: &'static str = "AES_MAX_SUPPORT_PAIRS";
    const ENV_MAX_CONTRADICTION_PAIRS: &'static str = "AES_MAX_CONTRADICTION_PAIRS";
    const ENV_MAX_EVIDENCES_PER_CLAIM: &'static str = "AES_MAX_EVIDENCES_PER_CLAIM";
    const ENV_ENABLE_NLI: &'static str = "AES_ENABLE_NLI";
    const ENV_SAMPLING_SEED: &'static str = "AES_SAMPLING_SEED";

    /// Loads defaults, then applies `AES_*` overrides. Malformed values are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = Self::default();

        let thresholds = &mut options.thresholds;
        override_from_env(
            Self::ENV_SIMILARITY_THRESHOLD,
            &mut thresholds.claim_evidence_similarity,
        )?;
        override_from_env(
            Self::ENV_CONTRADICTION_THRESHOLD,
            &mut thresholds.contradiction_threshold,
        )?;
        override_from_env(
            Self::ENV_NEUTRAL_SUPPORT_SCORE,
            &mut thresholds.neutral_support_score,
        )?;

        let perf = &mut options.performance;
        override_from_env(Self::ENV_NLI_BATCH_SIZE, &mut perf.nli_batch_size)?;
        override_from_env(Self::ENV_MAX_SUPPORT_PAIRS, &mut perf.max_support_pairs)?;
        override_from_env(
            Self::ENV_MAX_CONTRADICTION_PAIRS,
            &mut perf.max_contradiction_pairs,
        )?;
        override_from_env(
            Self::ENV_MAX_EVIDENCES_PER_CLAIM,
            &mut perf.max_evidences_per_claim,
        )?;
        override_from_env(Self::ENV_ENABLE_NLI, &mut perf.enable_nli)?;
        override_from_env(Self::ENV_SAMPLING_SEED, &mut perf.sampling_seed)?;

        Ok(options)
    }

    /// Validates these options into a [`ScoringConfig`].
    pub fn build(self) -> Result<ScoringConfig, ConfigError> {
        ScoringConfig::new(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for metric in Metric::ALL {
            let value = self.weights.get(metric);
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidWeight {
                    metric: metric.as_str(),
                    value,
                });
            }
        }

        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        let thresholds = [
            (
                "claim_evidence_similarity",
                self.thresholds.claim_evidence_similarity,
            ),
            (
                "contradiction_threshold",
                self.thresholds.contradiction_threshold,
            ),
            ("neutral_support_score", self.thresholds.neutral_support_score),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }

        if self.performance.nli_batch_size == 0 {
            return Err(ConfigError::InvalidLimit {
                name: "nli_batch_size",
                reason: "must be > 0".to_string(),
            });
        }
        for (name, cap) in [
            ("max_support_pairs", self.performance.max_support_pairs),
            ("max_contradiction_pairs", self.performance.max_contradiction_pairs),
        ] {
            if cap == 0 {
                return Err(ConfigError::InvalidLimit {
                    name,
                    reason: "must be > 0".to_string(),
                });
            }
        }
        if self.performance.max_evidences_per_claim < 2 {
            return Err(ConfigError::InvalidLimit {
                name: "max_evidences_per_claim",
                reason: format!(
                    "must be >= 2 to form evidence pairs, got {}",
                    self.performance.max_evidences_per_claim
                ),
            });
        }
        if self.citation_coverage.min_evidences_per_claim == 0 {
            return Err(ConfigError::InvalidLimit {
                name: "min_evidences_per_claim",
                reason: "must be > 0".to_string(),
            });
        }

        let text = &self.text_processing;
        if text.min_claim_length > text.max_claim_length {
            return Err(ConfigError::InvalidClaimLengths {
                min: text.min_claim_length,
                max: text.max_claim_length,
            });
        }

        if let Some(rule) = self.claim_keywords.iter().find(|r| r.keywords.is_empty()) {
            return Err(ConfigError::EmptyClaimRule {
                claim_type: rule.claim_type.to_string(),
            });
        }

        let patterns = &self.evidence_patterns;
        for pattern in patterns.citation.iter().chain([&patterns.numeric]) {
            compile_pattern(pattern)?;
        }

        Ok(())
    }
}

/// Compiles one configured pattern, mapping failures to [`ConfigError::InvalidPattern`].
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn override_from_env<T: FromStr>(name: &'static str, slot: &mut T) -> Result<(), ConfigError> {
    match env::var(name) {
        Ok(value) => {
            *slot = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvParse { name, value })?;
            Ok(())
        }
        Err(_) => Ok(()),
    }
}

/// Validated, immutable scoring configuration.
///
/// `ScoringConfig::default()` is the validated default option set.
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    options: ScoringOptions,
}

impl ScoringConfig {
    /// Validates `options`. This is the only place configuration can fail.
    pub fn new(options: ScoringOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Shorthand for `ScoringConfig::new(ScoringOptions::from_env()?)`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ScoringOptions::from_env()?)
    }

    pub fn weights(&self) -> &MetricWeights {
        &self.options.weights
    }

    pub fn evidence_needs(&self) -> &EvidenceNeeds {
        &self.options.evidence_needs
    }

    pub fn claim_keywords(&self) -> &[ClaimRule] {
        &self.options.claim_keywords
    }

    pub fn evidence_patterns(&self) -> &EvidencePatterns {
        &self.options.evidence_patterns
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.options.thresholds
    }

    pub fn performance(&self) -> &PerformanceOptions {
        &self.options.performance
    }

    pub fn text_processing(&self) -> &TextProcessing {
        &self.options.text_processing
    }

    pub fn citation_coverage(&self) -> &CoverageOptions {
        &self.options.citation_coverage
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }
}

/// Locations of the model backends, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Sentence-embedding model directory (config.json, model.safetensors, tokenizer.json).
    pub embedder_path: Option<PathBuf>,
    /// NLI classifier directory (same layout, with `id2label` in config.json).
    pub nli_path: Option<PathBuf>,
    /// Max texts kept in the embedding cache. `0` disables the cache.
    pub embedding_cache_capacity: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedder_path: None,
            nli_path: None,
            embedding_cache_capacity: DEFAULT_EMBEDDING_CACHE_CAPACITY,
        }
    }
}

impl ModelConfig {
    const ENV_EMBEDDER_PATH: &'static str = "AES_EMBEDDER_PATH";
    const ENV_NLI_PATH: &'static str = "AES_NLI_PATH";
    const ENV_EMBEDDING_CACHE_CAPACITY: &'static str = "AES_EMBEDDING_CACHE_CAPACITY";

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            embedder_path: Self::parse_optional_path_from_env(Self::ENV_EMBEDDER_PATH),
            nli_path: Self::parse_optional_path_from_env(Self::ENV_NLI_PATH),
            ..Default::default()
        };
        override_from_env(
            Self::ENV_EMBEDDING_CACHE_CAPACITY,
            &mut config.embedding_cache_capacity,
        )?;
        Ok(config)
    }

    /// Checks that configured model directories exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.embedder_path, &self.nli_path].into_iter().flatten() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }
        Ok(())
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}
