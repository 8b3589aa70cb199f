use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use super::error::EmbeddingError;
use super::traits::SentenceEncoder;

/// Memoising wrapper around a [`SentenceEncoder`], keyed by the BLAKE3 hash of
/// each text. Misses from one call are encoded together in a single batch.
pub struct CachedEncoder {
    inner: Arc<dyn SentenceEncoder>,
    cache: Cache<[u8; 32], Arc<Vec<f32>>>,
}

impl std::fmt::Debug for CachedEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEncoder")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl CachedEncoder {
    pub fn new(inner: Arc<dyn SentenceEncoder>, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(capacity),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl SentenceEncoder for CachedEncoder {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let keys: Vec<[u8; 32]> = texts
            .iter()
            .map(|t| *blake3::hash(t.as_bytes()).as_bytes())
            .collect();

        let mut out: Vec<Option<Arc<Vec<f32>>>> = keys.iter().map(|k| self.cache.get(k)).collect();

        let missing: Vec<usize> = (0..texts.len()).filter(|&i| out[i].is_none()).collect();
        debug!(
            texts = texts.len(),
            misses = missing.len(),
            "Embedding cache lookup"
        );

        if !missing.is_empty() {
            let batch: Vec<&str> = missing.iter().map(|&i| texts[i]).collect();
            let vectors = self.inner.encode(&batch)?;
            if vectors.len() != batch.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: batch.len(),
                    got: vectors.len(),
                });
            }
            for (&i, vector) in missing.iter().zip(vectors) {
                let vector = Arc::new(vector);
                self.cache.insert(keys[i], Arc::clone(&vector));
                out[i] = Some(vector);
            }
        }

        Ok(out
            .into_iter()
            .map(|v| v.map(|v| v.as_ref().clone()).unwrap_or_default())
            .collect())
    }
}
