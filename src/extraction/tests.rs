use super::*;
use crate::config::{ClaimRule, EvidencePatterns, ScoringConfig};

const SCENARIO_A: &str = "假设H1：数字化转型正向影响企业创新。（作者，2020）发现类似结果。";

fn default_extractor() -> EvidenceExtractor {
    EvidenceExtractor::new(&EvidencePatterns::default(), 5).expect("default patterns compile")
}

fn default_classifier() -> ClaimClassifier {
    ClaimClassifier::new(ScoringConfig::default().claim_keywords().to_vec())
}

mod segmenter_tests {
    use super::*;

    #[test]
    fn test_split_mixed_terminators() {
        let units = split_sentences("Growth rose 0.218 points. Policy matters!\n第二句。第三句？");
        assert_eq!(units, vec!["Growth rose 0.218 points", "Policy matters", "第二句", "第三句"]);
    }

    #[test]
    fn test_split_keeps_decimals() {
        let units = split_sentences("The coefficient is 0.25 and robust.");
        assert_eq!(units, vec!["The coefficient is 0.25 and robust"]);
    }

    #[test]
    fn test_split_keeps_abbreviations() {
        let units = split_sentences(
            "We conclude that Smith et al. (2019) report gains. Inputs, e.g. capital, matter. Next.",
        );
        assert_eq!(
            units,
            vec![
                "We conclude that Smith et al. (2019) report gains",
                "Inputs, e.g. capital, matter",
                "Next"
            ]
        );
    }

    #[test]
    fn test_split_abbreviation_needs_word_boundary() {
        let units = split_sentences("Engine revs. Then it stalled. Others vs. rivals.");
        assert_eq!(units, vec!["Engine revs", "Then it stalled", "Others vs. rivals"]);
    }

    #[test]
    fn test_split_empty_and_whitespace() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n\n  ").is_empty());
    }

    #[test]
    fn test_segment_length_bounds_count_characters() {
        let segmenter = TextSegmenter::new(10, 500);
        let units = segmenter.segment("短句。这是一个足够长的句子用于测试。");
        assert_eq!(units, vec!["这是一个足够长的句子用于测试"]);
    }

    #[test]
    fn test_segment_rejects_overlong_units() {
        let segmenter = TextSegmenter::new(1, 20);
        let long = "x".repeat(21);
        let text = format!("short unit. {long}.");
        assert_eq!(segmenter.segment(&text), vec!["short unit"]);
    }
}

mod classifier_tests {
    use super::*;

    #[test]
    fn test_hypothesis_beats_conclusion() {
        let classifier = default_classifier();
        assert_eq!(classifier.classify("结论：H1得到了数据支持"), ClaimType::Hypothesis);
    }

    #[test]
    fn test_rule_order_is_data() {
        let classifier = ClaimClassifier::new(vec![
            ClaimRule::new(ClaimType::Conclusion, vec!["结论".to_string()]),
            ClaimRule::new(ClaimType::Hypothesis, vec!["H1".to_string()]),
        ]);
        assert_eq!(classifier.classify("结论：H1得到了数据支持"), ClaimType::Conclusion);
    }

    #[test]
    fn test_english_markers_case_insensitive() {
        let classifier = default_classifier();
        assert_eq!(
            classifier.classify("We find that leverage lowers investment"),
            ClaimType::Conclusion
        );
        assert_eq!(
            classifier.classify("The POLICY context shaped the reform"),
            ClaimType::Background
        );
        assert_eq!(
            classifier.classify("Credit constraints act through a lending channel"),
            ClaimType::Mechanism
        );
    }

    #[test]
    fn test_unmatched_is_general() {
        let classifier = default_classifier();
        assert_eq!(classifier.classify("Firms grew quickly last year"), ClaimType::General);
    }
}

mod evidence_tests {
    use super::*;

    #[test]
    fn test_three_categories() {
        let text = "已有研究表明数字化能够提升创新（张三，2020）。样本包含2156个观测值。回归系数为0.218，在1%水平上显著。";
        let evidences = default_extractor().extract(text);

        let summary: Vec<(&str, EvidenceSource)> = evidences
            .iter()
            .map(|e| (e.text.as_str(), e.source_category))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("（张三，2020）", EvidenceSource::Citation),
                ("样本包含2156个观测值", EvidenceSource::Data),
                ("回归系数为0.218，在1%水平上显著", EvidenceSource::Result),
            ]
        );
        for (idx, evidence) in evidences.iter().enumerate() {
            assert_eq!(evidence.id, idx);
            assert!(evidence.claim_id.is_none());
        }
    }

    #[test]
    fn test_dedup_keeps_first_category() {
        let evidences = default_extractor().extract("样本均值为3.5，回归系数显著。");
        assert_eq!(evidences.len(), 1);
        assert_eq!(evidences[0].source_category, EvidenceSource::Data);
    }

    #[test]
    fn test_repeated_citation_counted_once() {
        let evidences =
            default_extractor().extract("Prior work agrees (Smith, 2019). Others agree (Smith, 2019).");
        let citations: Vec<_> = evidences
            .iter()
            .filter(|e| e.source_category == EvidenceSource::Citation)
            .collect();
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].text, "(Smith, 2019)");
    }

    #[test]
    fn test_cite_command_and_et_al() {
        let evidences = default_extractor()
            .extract(r"Smith et al. (2019) report gains \citep{smith2019} in this setting.");
        let texts: Vec<&str> = evidences.iter().map(|e| e.text.as_str()).collect();
        assert!(texts.contains(&r"\citep{smith2019}"));
        assert!(texts.contains(&"Smith et al. (2019)"));
        assert!(!texts.contains(&"(2019)"));
    }

    #[test]
    fn test_et_al_citation_is_one_evidence() {
        let evidences = default_extractor()
            .extract("Smith et al. (2019) report that digital firms innovate more.");
        let texts: Vec<&str> = evidences.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Smith et al. (2019)"]);
    }

    #[test]
    fn test_citation_year_is_not_data() {
        let evidences = default_extractor().extract("Firm data follow prior work (Lee, 2021).");
        assert!(evidences
            .iter()
            .all(|e| e.source_category == EvidenceSource::Citation));
    }

    #[test]
    fn test_data_number_outside_citation_still_counts() {
        let evidences =
            default_extractor().extract("The sample has 1200 firms (Lee, 2021).");
        assert!(evidences
            .iter()
            .any(|e| e.source_category == EvidenceSource::Data));
    }

    #[test]
    fn test_hypothesis_ids_are_not_numbers() {
        let evidences = default_extractor().extract("假设H1：数字化转型正向影响企业创新。");
        assert!(evidences.is_empty());
    }

    #[test]
    fn test_scenario_a_yields_single_citation() {
        let evidences = default_extractor().extract(SCENARIO_A);
        assert_eq!(evidences.len(), 1);
        assert_eq!(evidences[0].text, "（作者，2020）");
        assert_eq!(evidences[0].source_category, EvidenceSource::Citation);
    }

    #[test]
    fn test_short_sentences_skipped() {
        let extractor = EvidenceExtractor::new(&EvidencePatterns::default(), 50).unwrap();
        assert!(extractor.extract("The mean is 3.2 for the sample.").is_empty());
    }
}

mod parser_tests {
    use super::*;

    #[test]
    fn test_scenario_a_claims() {
        let parser = DocumentParser::new(&ScoringConfig::default()).unwrap();
        let graph = parser.parse(SCENARIO_A);

        assert_eq!(graph.claims.len(), 2);
        assert_eq!(graph.claims[0].id, 0);
        assert_eq!(graph.claims[0].claim_type, ClaimType::Hypothesis);
        assert_eq!(graph.claims[1].id, 1);
        assert_eq!(graph.claims[1].claim_type, ClaimType::Conclusion);
        assert!(graph.claims.iter().all(|c| c.evidences.is_empty()));
        assert_eq!(graph.evidences.len(), 1);
    }

    #[test]
    fn test_et_al_sentence_parses_as_one_claim() {
        let parser = DocumentParser::new(&ScoringConfig::default()).unwrap();
        let graph = parser
            .parse("We conclude that Smith et al. (2019) report that digital firms innovate more.");

        assert_eq!(graph.claims.len(), 1);
        assert_eq!(graph.claims[0].claim_type, ClaimType::Conclusion);
        assert_eq!(graph.evidences.len(), 1);
        assert_eq!(graph.evidences[0].text, "Smith et al. (2019)");
    }

    #[test]
    fn test_empty_text() {
        let parser = DocumentParser::new(&ScoringConfig::default()).unwrap();
        let graph = parser.parse("");
        assert!(graph.claims.is_empty());
        assert!(graph.evidences.is_empty());
    }

    #[test]
    fn test_graph_bind_sets_first_binder_only() {
        let mut graph = ArgumentGraph::new(
            vec![
                Claim::new(0, "first claim text", ClaimType::General),
                Claim::new(1, "second claim text", ClaimType::General),
            ],
            vec![Evidence::new(0, "(Lee, 2021)", EvidenceSource::Citation)],
        );

        graph.bind(1, 0);
        graph.bind(0, 0);
        graph.bind(0, 0);

        assert_eq!(graph.claims[0].evidences, vec![0]);
        assert_eq!(graph.claims[1].evidences, vec![0]);
        assert_eq!(graph.evidences[0].claim_id, Some(1));
        assert_eq!(graph.claims_with_evidence(), 2);
    }
}
