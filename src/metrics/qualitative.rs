//! Review-derived metrics.
//!
//! An external reviewer supplies a loosely structured JSON object. Two shapes
//! are understood:
//!
//! ```text
//! nested:  { "qualitative_analysis": { "endogeneity_rating": "good" },
//!            "quantitative_analysis": { "dimension_scores": [
//!                { "dimension": "维度3：模型设计", "total_score": 8 },
//!                { "dimension": "paper quality", "total_score": "6.5", "max_score": 10 } ] } }
//! flat:    { "endogeneity_rating": "average",
//!            "model_design": { "score": 7 }, "paper_quality": 9 }
//! ```
//!
//! Each metric tries its lookups in order and takes the first that succeeds.
//! A metric with no usable field scores 0.0 and is reported as missing.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::Metric;
use crate::constants::{DEFAULT_REVIEW_MAX_SCORE, REVIEW_AVERAGE_BAND, REVIEW_GOOD_BAND};

const MODEL_DESIGN_NAMES: &[&str] = &["模型设计", "model design"];
const PAPER_QUALITY_NAMES: &[&str] = &["论文质量", "paper quality"];

#[derive(Debug, Error)]
enum LookupMiss {
    #[error("not present")]
    Absent,
    #[error("malformed: {0}")]
    Malformed(String),
}

type Lookup = fn(&Value) -> Result<f64, LookupMiss>;

const ENDOGENEITY_LOOKUPS: &[(&str, Lookup)] = &[
    ("qualitative_analysis.endogeneity_rating", nested_endogeneity),
    ("endogeneity_rating", flat_endogeneity),
    ("endogeneity.rating", flat_endogeneity_object),
];

const MODEL_DESIGN_LOOKUPS: &[(&str, Lookup)] = &[
    ("quantitative_analysis.dimension_scores", nested_model_design),
    ("model_design", flat_model_design),
];

const PAPER_QUALITY_LOOKUPS: &[(&str, Lookup)] = &[
    ("quantitative_analysis.dimension_scores", nested_paper_quality),
    ("paper_quality", flat_paper_quality),
];

fn nested_endogeneity(review: &Value) -> Result<f64, LookupMiss> {
    rating(path(review, &["qualitative_analysis", "endogeneity_rating"])?)
}

fn flat_endogeneity(review: &Value) -> Result<f64, LookupMiss> {
    rating(path(review, &["endogeneity_rating"])?)
}

fn flat_endogeneity_object(review: &Value) -> Result<f64, LookupMiss> {
    rating(path(review, &["endogeneity", "rating"])?)
}

fn nested_model_design(review: &Value) -> Result<f64, LookupMiss> {
    dimension_entry(review, MODEL_DESIGN_NAMES)
}

fn flat_model_design(review: &Value) -> Result<f64, LookupMiss> {
    flat_entry(path(review, &["model_design"])?)
}

fn nested_paper_quality(review: &Value) -> Result<f64, LookupMiss> {
    dimension_entry(review, PAPER_QUALITY_NAMES)
}

fn flat_paper_quality(review: &Value) -> Result<f64, LookupMiss> {
    flat_entry(path(review, &["paper_quality"])?)
}

/// The three review metrics plus the ones that could not be found.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QualitativeScores {
    pub endogeneity_quality: f64,
    pub methodology_rigor: f64,
    pub academic_standards: f64,
    pub missing: Vec<Metric>,
}

impl QualitativeScores {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::EndogeneityQuality => Some(self.endogeneity_quality),
            Metric::MethodologyRigor => Some(self.methodology_rigor),
            Metric::AcademicStandards => Some(self.academic_standards),
            _ => None,
        }
    }
}

/// Maps an external review object onto the three review metrics. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualitativeAdapter;

impl QualitativeAdapter {
    pub fn extract(&self, review: Option<&Value>) -> QualitativeScores {
        let Some(review) = review else {
            debug!("No review supplied, review metrics score 0.0");
            return QualitativeScores {
                missing: Metric::REVIEW.to_vec(),
                ..Default::default()
            };
        };

        let mut scores = QualitativeScores::default();
        for (metric, lookups) in [
            (Metric::EndogeneityQuality, ENDOGENEITY_LOOKUPS),
            (Metric::MethodologyRigor, MODEL_DESIGN_LOOKUPS),
            (Metric::AcademicStandards, PAPER_QUALITY_LOOKUPS),
        ] {
            let value = match first_success(metric, review, lookups) {
                Some(value) => value,
                None => {
                    scores.missing.push(metric);
                    0.0
                }
            };
            match metric {
                Metric::EndogeneityQuality => scores.endogeneity_quality = value,
                Metric::MethodologyRigor => scores.methodology_rigor = value,
                _ => scores.academic_standards = value,
            }
        }

        if !scores.missing.is_empty() {
            warn!(missing = ?scores.missing, "Review fields not found, scoring them 0.0");
        }
        scores
    }
}

fn first_success(metric: Metric, review: &Value, lookups: &[(&str, Lookup)]) -> Option<f64> {
    for (name, lookup) in lookups {
        match lookup(review) {
            Ok(value) => {
                debug!(%metric, source = name, value, "Review metric extracted");
                return Some(value);
            }
            Err(miss) => {
                debug!(%metric, source = name, %miss, "Review lookup failed");
            }
        }
    }
    None
}

fn path<'a>(value: &'a Value, keys: &[&str]) -> Result<&'a Value, LookupMiss> {
    keys.iter()
        .try_fold(value, |current, key| current.get(key))
        .filter(|v| !v.is_null())
        .ok_or(LookupMiss::Absent)
}

fn rating(value: &Value) -> Result<f64, LookupMiss> {
    let text = value
        .as_str()
        .ok_or_else(|| LookupMiss::Malformed(format!("expected a rating string, got {value}")))?;
    match text.trim().to_lowercase().as_str() {
        "good" => Ok(1.0),
        "average" => Ok(0.5),
        "poor" => Ok(0.0),
        other => Err(LookupMiss::Malformed(format!("unknown rating {other:?}"))),
    }
}

fn number(value: &Value) -> Result<f64, LookupMiss> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| LookupMiss::Malformed(format!("expected a number, got {value}")))
}

/// Rescales to `[0, 1]` against `max`, then bands: >= 0.8 is 1.0, >= 0.5 is 0.5,
/// anything lower is 0.0.
fn banded(score: f64, max: f64) -> Result<f64, LookupMiss> {
    if max <= 0.0 {
        return Err(LookupMiss::Malformed(format!("max_score must be > 0, got {max}")));
    }
    let ratio = (score / max).clamp(0.0, 1.0);
    Ok(if ratio >= REVIEW_GOOD_BAND {
        1.0
    } else if ratio >= REVIEW_AVERAGE_BAND {
        0.5
    } else {
        0.0
    })
}

/// Scores an object carrying `total_score` or `score`, and optionally `max_score`.
fn scored_object(entry: &Value) -> Result<f64, LookupMiss> {
    let score = path(entry, &["total_score"]).or_else(|_| path(entry, &["score"]))?;
    let max = match path(entry, &["max_score"]) {
        Ok(max) => number(max)?,
        Err(_) => DEFAULT_REVIEW_MAX_SCORE,
    };
    banded(number(score)?, max)
}

fn flat_entry(value: &Value) -> Result<f64, LookupMiss> {
    if value.is_object() {
        scored_object(value)
    } else {
        banded(number(value)?, DEFAULT_REVIEW_MAX_SCORE)
    }
}

fn dimension_entry(review: &Value, names: &[&str]) -> Result<f64, LookupMiss> {
    let dimensions = path(review, &["quantitative_analysis", "dimension_scores"])?
        .as_array()
        .ok_or_else(|| LookupMiss::Malformed("dimension_scores is not a list".to_string()))?;

    let entry = dimensions
        .iter()
        .find(|dim| {
            let label = dim
                .get("dimension")
                .or_else(|| dim.get("name"))
                .and_then(Value::as_str)
                .map(str::to_lowercase)
                .unwrap_or_default();
            names.iter().any(|name| label.contains(name))
        })
        .ok_or(LookupMiss::Absent)?;

    scored_object(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(review: Value) -> QualitativeScores {
        QualitativeAdapter.extract(Some(&review))
    }

    #[test]
    fn test_nested_shape() {
        let scores = extract(json!({
            "qualitative_analysis": {"endogeneity_rating": "Good"},
            "quantitative_analysis": {"dimension_scores": [
                {"dimension": "维度3：模型设计", "total_score": 8},
                {"dimension": "维度5：论文质量", "total_score": 6}
            ]}
        }));
        assert_eq!(scores.endogeneity_quality, 1.0);
        assert_eq!(scores.methodology_rigor, 1.0);
        assert_eq!(scores.academic_standards, 0.5);
        assert!(scores.missing.is_empty());
    }

    #[test]
    fn test_flat_shape() {
        let scores = extract(json!({
            "endogeneity": {"rating": "average"},
            "model_design": {"score": "4.5"},
            "paper_quality": 9
        }));
        assert_eq!(scores.endogeneity_quality, 0.5);
        assert_eq!(scores.methodology_rigor, 0.0);
        assert_eq!(scores.academic_standards, 1.0);
    }

    #[test]
    fn test_english_dimension_names_and_max_score() {
        let scores = extract(json!({
            "endogeneity_rating": "poor",
            "quantitative_analysis": {"dimension_scores": [
                {"name": "Model Design", "total_score": 16, "max_score": 20},
                {"dimension": "Paper Quality", "total_score": 30, "max_score": 20}
            ]}
        }));
        assert_eq!(scores.endogeneity_quality, 0.0);
        assert!(!scores.missing.contains(&Metric::EndogeneityQuality));
        assert_eq!(scores.methodology_rigor, 1.0);
        // Over the maximum clips to 1.0.
        assert_eq!(scores.academic_standards, 1.0);
    }

    #[test]
    fn test_nested_takes_precedence_over_flat() {
        let scores = extract(json!({
            "quantitative_analysis": {"dimension_scores": [
                {"dimension": "模型设计", "total_score": 2}
            ]},
            "model_design": 10
        }));
        assert_eq!(scores.methodology_rigor, 0.0);
    }

    #[test]
    fn test_malformed_fields_default_to_zero() {
        let scores = extract(json!({
            "qualitative_analysis": {"endogeneity_rating": 3},
            "quantitative_analysis": {"dimension_scores": "not a list"},
            "model_design": {"score": "high"},
            "paper_quality": {"score": 9, "max_score": 0}
        }));
        assert_eq!(
            scores,
            QualitativeScores {
                missing: Metric::REVIEW.to_vec(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_no_review() {
        let scores = QualitativeAdapter.extract(None);
        assert_eq!(scores.missing, Metric::REVIEW.to_vec());
        assert_eq!(scores.get(Metric::MethodologyRigor), Some(0.0));
        assert_eq!(scores.get(Metric::SupportStrength), None);
    }

    #[test]
    fn test_non_object_review() {
        let scores = extract(json!(["unexpected"]));
        assert_eq!(scores.missing.len(), 3);
    }
}
