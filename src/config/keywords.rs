//! Default keyword tables and evidence patterns.
//!
//! The claim rule table is ordered and evaluated top to bottom; the first rule
//! with a matching keyword decides the claim type, and anything unmatched is
//! `general`. Precedence is therefore:
//!
//! | order | type       | why it goes here                                       |
//! |-------|------------|--------------------------------------------------------|
//! | 1     | hypothesis | hypothesis ids (H1..) also show up inside conclusions  |
//! | 2     | conclusion | findings often name the mechanism they establish       |
//! | 3     | mechanism  | mechanism prose often cites policy/institutional setup |
//! | 4     | background | weakest marker set                                     |
//!
//! ASCII keywords match case-insensitively; CJK keywords match verbatim.

use crate::extraction::ClaimType;

use super::{ClaimRule, EvidencePatterns};

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

pub fn default_claim_rules() -> Vec<ClaimRule> {
    vec![
        ClaimRule::new(
            ClaimType::Hypothesis,
            strings(&[
                "假设", "假定", "命题", "H1", "H2", "H3", "hypothesis", "hypothesize",
                "proposition", "we expect", "we predict",
            ]),
        ),
        ClaimRule::new(
            ClaimType::Conclusion,
            strings(&[
                "结论", "表明", "证明", "发现", "显示", "conclusion", "conclude", "indicate",
                "demonstrate", "we find", "results show", "evidence suggests",
            ]),
        ),
        ClaimRule::new(
            ClaimType::Mechanism,
            strings(&[
                "机制", "路径", "中介", "调节", "影响渠道", "mechanism", "pathway", "mediation",
                "moderation", "channel", "transmission",
            ]),
        ),
        ClaimRule::new(
            ClaimType::Background,
            strings(&[
                "背景", "现状", "政策", "制度", "background", "context", "policy", "institution",
                "history",
            ]),
        ),
    ]
}

/// `(Author, 2020)` in ASCII or full-width brackets.
pub const PARENTHETICAL_CITATION: &str = r"[\(（]([^)）]*\d{4}[^)）]*)[\)）]";
/// `\cite{key}`, `\citep{key}`, `\citet{key}`.
pub const CITE_COMMAND: &str = r"\\cite[pt]?\{[^}]+\}";
/// `Smith et al. (2020)`.
pub const ET_AL_CITATION: &str = r"[A-Z][a-z]+\s+et\s+al\.\s*[\(（]\d{4}[\)）]";

/// A standalone number (optionally decimal or percent). Digits glued to a
/// letter, such as hypothesis ids like `H1`, do not count.
pub const NUMERIC_TOKEN: &str = r"(?:^|[^A-Za-z0-9_])\d+(?:\.\d+)?[%％]?";

pub fn default_evidence_patterns() -> EvidencePatterns {
    EvidencePatterns {
        citation: strings(&[PARENTHETICAL_CITATION, CITE_COMMAND, ET_AL_CITATION]),
        numeric: NUMERIC_TOKEN.to_string(),
        data_keywords: strings(&[
            "数据", "样本", "观测", "企业", "平均", "标准差", "均值", "中位数", "data", "sample",
            "observation", "firm", "average", "standard deviation", "std", "mean", "median",
        ]),
        result_keywords: strings(&[
            "系数", "显著", "p值", "t值", "R²", "回归", "coefficient", "significant",
            "p-value", "t-value", "R-squared", "regression",
        ]),
    }
}
