//! Cross-cutting, shared constants.
//!
//! Every default here is surfaced through [`ScoringOptions`](crate::config::ScoringOptions);
//! prefer reading the validated [`ScoringConfig`](crate::config::ScoringConfig) over these
//! values at call sites so overrides are honoured.

/// Tolerance for the "weights sum to 1.0" check.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.3;
pub const DEFAULT_CONTRADICTION_THRESHOLD: f32 = 0.5;
/// Fraction of an NLI "neutral" confidence credited as support.
pub const DEFAULT_NEUTRAL_SUPPORT_SCORE: f32 = 0.6;
/// Credit for NLI labels outside entailment / neutral / contradiction.
pub const UNKNOWN_LABEL_SUPPORT_SCORE: f32 = 0.3;

pub const DEFAULT_MIN_CLAIM_LENGTH: usize = 10;
pub const DEFAULT_MAX_CLAIM_LENGTH: usize = 500;
pub const DEFAULT_MIN_EVIDENCE_LENGTH: usize = 5;

pub const DEFAULT_NLI_BATCH_SIZE: usize = 32;
pub const DEFAULT_MAX_SUPPORT_PAIRS: usize = 2_000;
pub const DEFAULT_MAX_CONTRADICTION_PAIRS: usize = 2_000;
pub const DEFAULT_MAX_EVIDENCES_PER_CLAIM: usize = 20;
pub const DEFAULT_SAMPLING_SEED: u64 = 42;

pub const DEFAULT_MIN_EVIDENCES_PER_CLAIM: usize = 4;

/// Number of claims echoed back in `ScoreResult::sampled_claims`.
pub const SAMPLED_CLAIMS_LIMIT: usize = 10;
/// Claim previews longer than this (in characters) are truncated with `...`.
pub const CLAIM_PREVIEW_CHARS: usize = 100;

/// Bound-evidence similarities are averaged over at most this many top hits.
pub const RELEVANCE_TOP_K: usize = 2;
/// Tokens of a claim checked against evidence text by the lexical binder.
pub const LEXICAL_BINDING_TOKENS: usize = 10;

/// Fallback values used when a model backend is missing or every batch failed.
pub const CAUSAL_RELEVANCE_DEFAULT: f64 = 0.5;
pub const SUPPORT_STRENGTH_DEFAULT: f64 = 0.6;
pub const CONTRADICTION_PENALTY_DEFAULT: f64 = 0.8;

/// Qualitative review scores are out of this many points unless a `max_score` is given.
pub const DEFAULT_REVIEW_MAX_SCORE: f64 = 10.0;
pub const REVIEW_GOOD_BAND: f64 = 0.8;
pub const REVIEW_AVERAGE_BAND: f64 = 0.5;

pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 4_096;

/// Max tokens fed to the sentence embedder and the NLI classifier.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;
