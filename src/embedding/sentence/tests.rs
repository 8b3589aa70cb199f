use super::*;
use std::path::PathBuf;

use crate::embedding::utils::cosine_similarity;

mod config_tests {
    use super::*;

    #[test]
    fn test_sentence_config_default() {
        let config = SentenceEmbedderConfig::default();
        assert_eq!(config.max_seq_len, SENTENCE_MAX_SEQ_LEN);
        assert_eq!(config.stub_dim, STUB_EMBEDDING_DIM);
        assert!(!config.testing_stub);
        assert!(config.model_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_sentence_config_new() {
        let config = SentenceEmbedderConfig::new("/models/minilm").with_max_seq_len(128);
        assert_eq!(config.model_dir, PathBuf::from("/models/minilm"));
        assert_eq!(config.max_seq_len, 128);
        assert!(!config.testing_stub);
    }

    #[test]
    fn test_validation_stub_ok() {
        assert!(SentenceEmbedderConfig::stub().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_path_no_stub() {
        let result = SentenceEmbedderConfig::default().validate();
        assert!(matches!(result, Err(EmbeddingError::InvalidConfig { .. })));
    }

    #[test]
    fn test_validation_zero_seq_len() {
        let result = SentenceEmbedderConfig::stub().with_max_seq_len(0).validate();
        assert!(matches!(result, Err(EmbeddingError::InvalidConfig { .. })));
    }

    #[test]
    fn test_validation_missing_weights() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();

        let result = SentenceEmbedderConfig::new(dir.path()).validate();
        match result {
            Err(EmbeddingError::ModelNotFound { path }) => {
                assert!(path.ends_with("model.safetensors"));
            }
            other => panic!("expected ModelNotFound, got {:?}", other),
        }
    }
}

mod stub_tests {
    use super::*;

    #[test]
    fn test_stub_embedder_reports_stub() {
        let embedder = SentenceEmbedder::stub().unwrap();
        assert!(embedder.is_stub());
        assert_eq!(embedder.embedding_dim(), STUB_EMBEDDING_DIM);
        assert!(format!("{:?}", embedder).contains("Stub"));
    }

    #[test]
    fn test_stub_vectors_are_unit_length() {
        let embedder = SentenceEmbedder::stub().unwrap();
        let vectors = embedder.embed_batch(&["企业创新", "firm innovation"]).unwrap();

        assert_eq!(vectors.len(), 2);
        for v in &vectors {
            assert_eq!(v.len(), STUB_EMBEDDING_DIM);
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_stub_is_deterministic() {
        let embedder = SentenceEmbedder::stub().unwrap();
        let a = embedder.embed_batch(&["same text"]).unwrap();
        let b = embedder.embed_batch(&["same text"]).unwrap();
        assert_eq!(a, b);
        assert!((cosine_similarity(&a[0], &b[0]) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stub_different_texts_differ() {
        let embedder = SentenceEmbedder::stub().unwrap();
        let vectors = embedder.embed_batch(&["alpha", "beta"]).unwrap();
        assert_ne!(vectors[0], vectors[1]);
    }

    #[test]
    fn test_empty_batch() {
        let embedder = SentenceEmbedder::stub().unwrap();
        assert!(embedder.embed_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_encode_via_trait() {
        let embedder = SentenceEmbedder::stub().unwrap();
        let encoder: &dyn SentenceEncoder = &embedder;
        assert_eq!(encoder.encode(&["one", "two", "three"]).unwrap().len(), 3);
    }
}

#[test]
fn test_load_missing_model_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = SentenceEmbedder::load(SentenceEmbedderConfig::new(dir.path().join("absent")));
    assert!(matches!(result, Err(EmbeddingError::ModelNotFound { .. })));
}
