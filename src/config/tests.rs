use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_aes_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        for name in [
            "AES_SIMILARITY_THRESHOLD",
            "AES_CONTRADICTION_THRESHOLD",
            "AES_NEUTRAL_SUPPORT_SCORE",
            "AES_NLI_BATCH_SIZE",
            "AES_MAX_SUPPORT_PAIRS",
            "AES_MAX_CONTRADICTION_PAIRS",
            "AES_MAX_EVIDENCES_PER_CLAIM",
            "AES_ENABLE_NLI",
            "AES_SAMPLING_SEED",
            "AES_EMBEDDER_PATH",
            "AES_NLI_PATH",
            "AES_EMBEDDING_CACHE_CAPACITY",
        ] {
            env::remove_var(name);
        }
    }
}

fn build_with(f: impl FnOnce(&mut ScoringOptions)) -> Result<ScoringConfig, ConfigError> {
    let mut options = ScoringOptions::default();
    f(&mut options);
    options.build()
}

#[test]
fn test_default_options() {
    let options = ScoringOptions::default();

    assert!((options.weights.sum() - 1.0).abs() < 1e-9);
    assert_eq!(options.weights.support_strength, 0.20);
    assert_eq!(options.evidence_needs.for_type(ClaimType::Hypothesis), 3);
    assert_eq!(options.evidence_needs.for_type(ClaimType::Background), 0);
    assert_eq!(options.thresholds.claim_evidence_similarity, 0.3);
    assert_eq!(options.thresholds.neutral_support_score, 0.6);
    assert_eq!(options.performance.nli_batch_size, 32);
    assert_eq!(options.performance.sampling_seed, 42);
    assert!(options.performance.enable_nli);
    assert_eq!(options.citation_coverage.min_evidences_per_claim, 4);
    assert!(options.citation_coverage.use_weighted_coverage);
}

#[test]
fn test_default_options_validate() {
    let config = ScoringOptions::default().build().expect("defaults are valid");
    assert_eq!(config.options(), &ScoringOptions::default());
}

#[test]
fn test_default_claim_rule_order() {
    let order: Vec<ClaimType> = ScoringConfig::default()
        .claim_keywords()
        .iter()
        .map(|r| r.claim_type)
        .collect();
    assert_eq!(
        order,
        vec![
            ClaimType::Hypothesis,
            ClaimType::Conclusion,
            ClaimType::Mechanism,
            ClaimType::Background
        ]
    );
}

#[test]
fn test_partial_json_takes_defaults() {
    let options: ScoringOptions = serde_json::from_str(
        r#"{"thresholds": {"contradiction_threshold": 0.7}, "performance": {"enable_nli": false}}"#,
    )
    .expect("partial options deserialize");

    assert_eq!(options.thresholds.contradiction_threshold, 0.7);
    assert_eq!(options.thresholds.claim_evidence_similarity, 0.3);
    assert!(!options.performance.enable_nli);
    assert_eq!(options.performance.nli_batch_size, 32);
    assert_eq!(options.weights, MetricWeights::default());
}

#[test]
fn test_weights_must_sum_to_one() {
    let err = build_with(|o| o.weights.support_strength = 0.5).unwrap_err();
    assert!(matches!(err, ConfigError::WeightSum { .. }));
    assert!(err.to_string().contains("sum to 1.0"));
}

#[test]
fn test_weight_sum_tolerance() {
    assert!(build_with(|o| o.weights.support_strength = 0.2005).is_ok());
}

#[test]
fn test_negative_weight_rejected() {
    let err = build_with(|o| {
        o.weights.citation_coverage = -0.05;
        o.weights.causal_relevance = 0.35;
    })
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidWeight {
            metric: "citation_coverage",
            ..
        }
    ));
}

#[test]
fn test_threshold_out_of_range() {
    let err = build_with(|o| o.thresholds.contradiction_threshold = 1.5).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::ThresholdOutOfRange {
            name: "contradiction_threshold",
            ..
        }
    ));
}

#[test]
fn test_zero_limits_rejected() {
    let cases: [(&str, fn(&mut ScoringOptions)); 4] = [
        ("nli_batch_size", |o| o.performance.nli_batch_size = 0),
        ("max_support_pairs", |o| o.performance.max_support_pairs = 0),
        ("max_contradiction_pairs", |o| {
            o.performance.max_contradiction_pairs = 0
        }),
        ("min_evidences_per_claim", |o| {
            o.citation_coverage.min_evidences_per_claim = 0
        }),
    ];

    for (expected, mutate) in cases {
        let err = build_with(mutate).unwrap_err();
        match err {
            ConfigError::InvalidLimit { name, .. } => assert_eq!(name, expected),
            other => panic!("expected InvalidLimit for {expected}, got {other:?}"),
        }
    }
}

#[test]
fn test_max_evidences_per_claim_needs_a_pair() {
    let err = build_with(|o| o.performance.max_evidences_per_claim = 1).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidLimit {
            name: "max_evidences_per_claim",
            ..
        }
    ));
    assert!(build_with(|o| o.performance.max_evidences_per_claim = 2).is_ok());
}

#[test]
fn test_claim_lengths() {
    let err = build_with(|o| {
        o.text_processing.min_claim_length = 600;
        o.text_processing.max_claim_length = 500;
    })
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidClaimLengths { min: 600, max: 500 }
    ));
}

#[test]
fn test_empty_claim_rule() {
    let err = build_with(|o| {
        o.claim_keywords
            .push(ClaimRule::new(ClaimType::Mechanism, Vec::new()))
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::EmptyClaimRule { .. }));
    assert!(err.to_string().contains("mechanism"));
}

#[test]
fn test_invalid_citation_pattern() {
    let err = build_with(|o| o.evidence_patterns.citation.push("(unclosed".to_string()))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    assert!(err.to_string().contains("(unclosed"));
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_aes_env();

    let options = ScoringOptions::from_env().expect("should parse with defaults");
    assert_eq!(options, ScoringOptions::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_aes_env();

    with_env_vars(
        &[
            ("AES_SIMILARITY_THRESHOLD", "0.45"),
            ("AES_NLI_BATCH_SIZE", " 8 "),
            ("AES_ENABLE_NLI", "false"),
            ("AES_SAMPLING_SEED", "7"),
        ],
        || {
            let config = ScoringConfig::from_env().expect("should parse");
            assert_eq!(config.thresholds().claim_evidence_similarity, 0.45);
            assert_eq!(config.performance().nli_batch_size, 8);
            assert!(!config.performance().enable_nli);
            assert_eq!(config.performance().sampling_seed, 7);
        },
    );
}

#[test]
#[serial]
fn test_from_env_malformed_value() {
    clear_aes_env();

    with_env_vars(&[("AES_MAX_SUPPORT_PAIRS", "lots")], || {
        let err = ScoringOptions::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EnvParse {
                name: "AES_MAX_SUPPORT_PAIRS",
                ..
            }
        ));
        assert!(err.to_string().contains("lots"));
    });
}

#[test]
#[serial]
fn test_from_env_override_still_validated() {
    clear_aes_env();

    with_env_vars(&[("AES_CONTRADICTION_THRESHOLD", "2.0")], || {
        let err = ScoringConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::ThresholdOutOfRange { .. }));
    });
}

#[test]
#[serial]
fn test_model_config_from_env() {
    clear_aes_env();

    with_env_vars(
        &[
            ("AES_EMBEDDER_PATH", "/models/text2vec"),
            ("AES_NLI_PATH", "  "),
            ("AES_EMBEDDING_CACHE_CAPACITY", "0"),
        ],
        || {
            let config = ModelConfig::from_env().expect("should parse");
            assert_eq!(config.embedder_path, Some(PathBuf::from("/models/text2vec")));
            assert!(config.nli_path.is_none());
            assert_eq!(config.embedding_cache_capacity, 0);
        },
    );
}

#[test]
#[serial]
fn test_model_config_defaults() {
    clear_aes_env();

    let config = ModelConfig::from_env().expect("should parse");
    assert!(config.embedder_path.is_none());
    assert!(config.nli_path.is_none());
    assert_eq!(config.embedding_cache_capacity, 4_096);
    assert!(config.validate().is_ok());
}

#[test]
fn test_model_config_missing_path() {
    let config = ModelConfig {
        nli_path: Some(PathBuf::from("/nonexistent/path/to/nli")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { .. }));
    assert!(err.to_string().contains("/nonexistent/path/to/nli"));
}

#[test]
fn test_model_config_path_is_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("model.safetensors");
    std::fs::write(&file, b"").unwrap();

    let config = ModelConfig {
        embedder_path: Some(file),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }));
}

#[test]
fn test_model_config_valid_directories() {
    let dir = tempfile::tempdir().unwrap();
    let config = ModelConfig {
        embedder_path: Some(dir.path().to_path_buf()),
        nli_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}
