use std::fmt;

/// NLI label, normalised from whatever name the checkpoint's `id2label` uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntailmentLabel {
    Entailment,
    Neutral,
    Contradiction,
    /// A label the checkpoint defines that is none of the three above.
    Other(String),
}

impl EntailmentLabel {
    /// Maps a raw model label by case-insensitive substring
    /// (`"ENTAILMENT"`, `"entailment"`, `"LABEL_entail"` all map to `Entailment`).
    /// Negated forms such as `"not_entailment"` stay [`Other`](Self::Other).
    pub fn from_model_label(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        let squashed: String = lowered.chars().filter(|c| c.is_alphanumeric()).collect();
        if squashed.contains("notentail") || squashed.contains("nonentail") {
            Self::Other(raw.to_string())
        } else if lowered.contains("entail") {
            Self::Entailment
        } else if lowered.contains("neutral") {
            Self::Neutral
        } else if lowered.contains("contradict") {
            Self::Contradiction
        } else {
            Self::Other(raw.to_string())
        }
    }
}

impl fmt::Display for EntailmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entailment => f.write_str("entailment"),
            Self::Neutral => f.write_str("neutral"),
            Self::Contradiction => f.write_str("contradiction"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: EntailmentLabel,
    pub score: f32,
}

/// Full label distribution for one (premise, hypothesis) pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NliPrediction {
    pub scores: Vec<LabelScore>,
}

impl NliPrediction {
    pub fn new(scores: Vec<LabelScore>) -> Self {
        Self { scores }
    }

    /// Builds a three-way prediction from entailment/neutral/contradiction probabilities.
    pub fn from_probabilities(entailment: f32, neutral: f32, contradiction: f32) -> Self {
        Self::new(vec![
            LabelScore {
                label: EntailmentLabel::Entailment,
                score: entailment,
            },
            LabelScore {
                label: EntailmentLabel::Neutral,
                score: neutral,
            },
            LabelScore {
                label: EntailmentLabel::Contradiction,
                score: contradiction,
            },
        ])
    }

    /// Highest-scoring label. Ties keep the earliest entry.
    pub fn top(&self) -> Option<&LabelScore> {
        self.scores.iter().fold(None, |best, candidate| match best {
            Some(b) if b.score >= candidate.score => Some(b),
            _ => Some(candidate),
        })
    }

    /// Probability assigned to `label`, `0.0` if the model has no such label.
    pub fn probability(&self, label: &EntailmentLabel) -> f32 {
        self.scores
            .iter()
            .find(|s| &s.label == label)
            .map(|s| s.score)
            .unwrap_or(0.0)
    }
}
