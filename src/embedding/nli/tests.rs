use super::*;
use serde_json::json;

mod label_tests {
    use super::*;

    #[test]
    fn test_from_model_label_variants() {
        assert_eq!(
            EntailmentLabel::from_model_label("ENTAILMENT"),
            EntailmentLabel::Entailment
        );
        assert_eq!(
            EntailmentLabel::from_model_label("Neutral"),
            EntailmentLabel::Neutral
        );
        assert_eq!(
            EntailmentLabel::from_model_label("contradiction"),
            EntailmentLabel::Contradiction
        );
        assert_eq!(
            EntailmentLabel::from_model_label("LABEL_3"),
            EntailmentLabel::Other("LABEL_3".to_string())
        );
    }

    #[test]
    fn test_negated_entailment_is_not_entailment() {
        for raw in ["not_entailment", "NOT_ENTAILMENT", "non-entailment"] {
            assert_eq!(
                EntailmentLabel::from_model_label(raw),
                EntailmentLabel::Other(raw.to_string()),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_labels_from_config_orders_by_index() {
        let config = json!({
            "id2label": {"2": "neutral", "0": "ENTAILMENT", "1": "CONTRADICTION"}
        });
        assert_eq!(
            labels_from_config(&config),
            vec![
                EntailmentLabel::Entailment,
                EntailmentLabel::Contradiction,
                EntailmentLabel::Neutral,
            ]
        );
    }

    #[test]
    fn test_labels_from_config_default() {
        assert_eq!(
            labels_from_config(&json!({"hidden_size": 384})),
            vec![
                EntailmentLabel::Contradiction,
                EntailmentLabel::Entailment,
                EntailmentLabel::Neutral,
            ]
        );
    }

    #[test]
    fn test_prediction_top_and_probability() {
        let prediction = NliPrediction::from_probabilities(0.2, 0.7, 0.1);
        let top = prediction.top().unwrap();
        assert_eq!(top.label, EntailmentLabel::Neutral);
        assert!((top.score - 0.7).abs() < 1e-6);
        assert!((prediction.probability(&EntailmentLabel::Contradiction) - 0.1).abs() < 1e-6);
        assert_eq!(
            prediction.probability(&EntailmentLabel::Other("x".to_string())),
            0.0
        );
    }

    #[test]
    fn test_empty_prediction_has_no_top() {
        assert!(NliPrediction::default().top().is_none());
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_default_is_stub() {
        let config = NliConfig::default();
        assert!(config.is_stub());
        assert_eq!(config.max_seq_len, NLI_MAX_SEQ_LEN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_path_rejected() {
        let config = NliConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_seq_len_rejected() {
        assert!(NliConfig::stub().with_max_seq_len(0).validate().is_err());
    }
}

mod classifier_tests {
    use super::*;

    #[test]
    fn test_stub_loads_without_model() {
        let classifier = EntailmentClassifier::stub().unwrap();
        assert!(!classifier.is_model_loaded());
        assert!(classifier.labels().is_empty());
    }

    #[test]
    fn test_missing_model_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = EntailmentClassifier::load(NliConfig::new(dir.path().join("nli")));
        assert!(matches!(result, Err(NliError::ModelNotFound { .. })));
    }

    #[test]
    fn test_missing_weights() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        let result = EntailmentClassifier::load(NliConfig::new(dir.path()));
        assert!(matches!(result, Err(NliError::ModelLoadFailed { .. })));
    }

    #[test]
    fn test_stub_one_prediction_per_pair() {
        let classifier = EntailmentClassifier::stub().unwrap();
        let predictions = classifier
            .classify(&[("a b c", "a b"), ("x", "y"), ("p", "q")])
            .unwrap();
        assert_eq!(predictions.len(), 3);
        for prediction in &predictions {
            let total: f32 = prediction.scores.iter().map(|s| s.score).sum();
            assert!((total - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_stub_overlap_entails() {
        let classifier = EntailmentClassifier::stub().unwrap();
        let predictions = classifier
            .classify_pairs(&[(
                "leverage reduces investment in small firms",
                "leverage reduces investment",
            )])
            .unwrap();
        assert_eq!(
            predictions[0].top().unwrap().label,
            EntailmentLabel::Entailment
        );
    }

    #[test]
    fn test_stub_negation_mismatch_contradicts() {
        let classifier = EntailmentClassifier::stub().unwrap();
        let predictions = classifier
            .classify_pairs(&[("政策提升了创新", "政策没有提升创新")])
            .unwrap();
        assert!(predictions[0].probability(&EntailmentLabel::Contradiction) > 0.5);
    }

    #[test]
    fn test_empty_batch() {
        let classifier = EntailmentClassifier::stub().unwrap();
        assert!(classifier.classify_pairs(&[]).unwrap().is_empty());
    }
}
