use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ModelConfig;

use super::cache::CachedEncoder;
use super::nli::{EntailmentClassifier, NliConfig};
use super::sentence::{SentenceEmbedder, SentenceEmbedderConfig};
use super::traits::{EntailmentModel, SentenceEncoder};

/// Which model backends are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub embedder: bool,
    pub nli: bool,
}

/// The model backends a scoring engine may use. Either may be absent; metrics
/// that need a missing backend report their documented default.
#[derive(Clone, Default)]
pub struct ModelHandles {
    embedder: Option<Arc<dyn SentenceEncoder>>,
    nli: Option<Arc<dyn EntailmentModel>>,
}

impl std::fmt::Debug for ModelHandles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandles")
            .field("embedder", &self.embedder.is_some())
            .field("nli", &self.nli.is_some())
            .finish()
    }
}

impl ModelHandles {
    /// No models: every model-backed metric uses its default.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(
        embedder: Option<Arc<dyn SentenceEncoder>>,
        nli: Option<Arc<dyn EntailmentModel>>,
    ) -> Self {
        Self { embedder, nli }
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn SentenceEncoder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_nli(mut self, nli: Arc<dyn EntailmentModel>) -> Self {
        self.nli = Some(nli);
        self
    }

    /// Loads whatever `config` points at. A backend that fails to load is
    /// logged and left absent; this never fails.
    pub fn load(config: &ModelConfig) -> Self {
        let embedder = config.embedder_path.as_ref().and_then(|path| {
            match SentenceEmbedder::load(SentenceEmbedderConfig::new(path)) {
                Ok(embedder) => {
                    let embedder: Arc<dyn SentenceEncoder> = Arc::new(embedder);
                    if config.embedding_cache_capacity > 0 {
                        Some(Arc::new(CachedEncoder::new(
                            embedder,
                            config.embedding_cache_capacity,
                        )) as Arc<dyn SentenceEncoder>)
                    } else {
                        Some(embedder)
                    }
                }
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "Sentence embedder unavailable");
                    None
                }
            }
        });

        let nli = config.nli_path.as_ref().and_then(|path| {
            match EntailmentClassifier::load(NliConfig::new(path)) {
                Ok(nli) => Some(Arc::new(nli) as Arc<dyn EntailmentModel>),
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "NLI model unavailable");
                    None
                }
            }
        });

        let handles = Self { embedder, nli };
        info!(status = ?handles.status(), "Model handles ready");
        handles
    }

    pub fn embedder(&self) -> Option<&dyn SentenceEncoder> {
        self.embedder.as_deref()
    }

    pub fn nli(&self) -> Option<&dyn EntailmentModel> {
        self.nli.as_deref()
    }

    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            embedder: self.embedder.is_some(),
            nli: self.nli.is_some(),
        }
    }
}
