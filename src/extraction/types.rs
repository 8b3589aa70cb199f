use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Claim taxonomy. Each variant carries its own required-evidence count
/// (see [`EvidenceNeeds`](crate::config::EvidenceNeeds)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    Background,
    General,
    Hypothesis,
    Conclusion,
    Mechanism,
}

impl ClaimType {
    pub const ALL: [ClaimType; 5] = [
        ClaimType::Background,
        ClaimType::General,
        ClaimType::Hypothesis,
        ClaimType::Conclusion,
        ClaimType::Mechanism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Background => "background",
            ClaimType::General => "general",
            ClaimType::Hypothesis => "hypothesis",
            ClaimType::Conclusion => "conclusion",
            ClaimType::Mechanism => "mechanism",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an evidence span came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceSource {
    Citation,
    Data,
    Result,
}

impl EvidenceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceSource::Citation => "citation",
            EvidenceSource::Data => "data",
            EvidenceSource::Result => "result",
        }
    }
}

/// Index of an [`Evidence`] inside its [`ArgumentGraph`].
pub type EvidenceId = usize;

/// An atomic, classified assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub id: usize,
    pub text: String,
    pub claim_type: ClaimType,
    /// Bound evidence, in binding order. The claim owns the relation.
    pub evidences: Vec<EvidenceId>,
    /// Per-claim metric values, filled in by the metric computers.
    pub derived_scores: BTreeMap<String, f64>,
}

impl Claim {
    pub fn new(id: usize, text: impl Into<String>, claim_type: ClaimType) -> Self {
        Self {
            id,
            text: text.into(),
            claim_type,
            evidences: Vec::new(),
            derived_scores: BTreeMap::new(),
        }
    }

    pub fn has_evidence(&self) -> bool {
        !self.evidences.is_empty()
    }

    pub fn record_score(&mut self, metric: &str, value: f64) {
        self.derived_scores.insert(metric.to_string(), value);
    }
}

/// An extracted span that may back one or more claims.
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    pub id: EvidenceId,
    pub text: String,
    pub source_category: EvidenceSource,
    /// First claim that bound this evidence. Diagnostic only.
    pub claim_id: Option<usize>,
}

impl Evidence {
    pub fn new(id: EvidenceId, text: impl Into<String>, source_category: EvidenceSource) -> Self {
        Self {
            id,
            text: text.into(),
            source_category,
            claim_id: None,
        }
    }
}

/// Claims and evidence of one document, plus the binding between them.
///
/// Evidence ids are positions in [`ArgumentGraph::evidences`], so a claim's
/// `evidences` list can be resolved without a lookup table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentGraph {
    pub claims: Vec<Claim>,
    pub evidences: Vec<Evidence>,
}

impl ArgumentGraph {
    pub fn new(claims: Vec<Claim>, evidences: Vec<Evidence>) -> Self {
        Self { claims, evidences }
    }

    /// Resolves the evidence bound to `claim`, in binding order.
    pub fn evidence_for<'a>(&'a self, claim: &'a Claim) -> impl Iterator<Item = &'a Evidence> + 'a {
        claim
            .evidences
            .iter()
            .filter_map(move |&id| self.evidences.get(id))
    }

    /// Adds `evidence_id` to the claim at `claim_idx`, stamping the evidence's
    /// back-reference if no other claim got there first.
    pub fn bind(&mut self, claim_idx: usize, evidence_id: EvidenceId) {
        let Some(claim) = self.claims.get_mut(claim_idx) else {
            return;
        };
        if claim.evidences.contains(&evidence_id) {
            return;
        }
        claim.evidences.push(evidence_id);
        let claim_id = claim.id;
        if let Some(evidence) = self.evidences.get_mut(evidence_id)
            && evidence.claim_id.is_none()
        {
            evidence.claim_id = Some(claim_id);
        }
    }

    pub fn claims_with_evidence(&self) -> usize {
        self.claims.iter().filter(|c| c.has_evidence()).count()
    }

    pub fn claim_type_distribution(&self) -> BTreeMap<ClaimType, usize> {
        let mut distribution = BTreeMap::new();
        for claim in &self.claims {
            *distribution.entry(claim.claim_type).or_insert(0) += 1;
        }
        distribution
    }
}
