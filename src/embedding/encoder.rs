use std::collections::HashSet;
use std::sync::Arc;

use moka::sync::Cache;
use tracing::{debug, info};

use super::client::{EmbeddingClient, InputType};
use super::error::EmbeddingError;
use crate::constants::{DimConfig, DimValidationError, validate_embedding_dim};
use crate::hashing::{hash_query, key_prefix};

/// Embeds query text with a memo keyed by the hash of the exact text.
///
/// Identical strings are embedded once per encoder lifetime (subject to the
/// cache capacity). Whitespace and case are significant.
pub struct QueryEncoder<E> {
    client: E,
    dims: DimConfig,
    cache: Cache<[u8; 32], Arc<Vec<f32>>>,
}

impl<E> std::fmt::Debug for QueryEncoder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEncoder")
            .field("dims", &self.dims)
            .field("cached", &self.cache.entry_count())
            .finish()
    }
}

impl<E: EmbeddingClient> QueryEncoder<E> {
    pub fn new(client: E, dims: DimConfig, capacity: u64) -> Result<Self, EmbeddingError> {
        if dims.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension.into());
        }
        validate_embedding_dim(client.dimension(), dims.embedding_dim)?;

        Ok(Self {
            client,
            dims,
            cache: Cache::builder().max_capacity(capacity).build(),
        })
    }

    pub fn client(&self) -> &E {
        &self.client
    }

    pub fn dims(&self) -> DimConfig {
        self.dims
    }

    /// Returns the vector for `text`, calling the model only on a cache miss.
    pub async fn encode(&self, text: &str) -> Result<Arc<Vec<f32>>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let key = hash_query(text);
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key_prefix(&key), "Query embedding cache hit");
            return Ok(hit);
        }

        let mut vectors = self
            .client
            .embed(&[text.to_string()], InputType::Query)
            .await?;

        let vector = match vectors.pop() {
            Some(v) if vectors.is_empty() => v,
            _ => {
                return Err(EmbeddingError::InvalidResponse {
                    reason: "expected exactly one embedding for query".to_string(),
                });
            }
        };
        validate_embedding_dim(vector.len(), self.dims.embedding_dim)?;

        let vector = Arc::new(vector);
        self.cache.insert(key, Arc::clone(&vector));
        Ok(vector)
    }

    /// Warms the cache for `texts` in batches of `batch_size`.
    ///
    /// Blank, duplicate and already-cached texts are skipped. Returns how
    /// many texts were newly embedded.
    pub async fn prefetch(
        &self,
        texts: &[String],
        batch_size: usize,
    ) -> Result<usize, EmbeddingError> {
        let batch_size = batch_size.max(1);
        let mut seen = HashSet::new();
        let pending: Vec<String> = texts
            .iter()
            .filter(|t| !t.trim().is_empty())
            .filter(|t| seen.insert(t.as_str()))
            .filter(|t| !self.cache.contains_key(&hash_query(t)))
            .cloned()
            .collect();

        if pending.is_empty() {
            return Ok(0);
        }

        info!(
            texts = pending.len(),
            batch_size,
            model = %self.client.model(),
            "Prefetching query embeddings"
        );

        for chunk in pending.chunks(batch_size) {
            let vectors = self.client.embed(chunk, InputType::Query).await?;
            if vectors.len() != chunk.len() {
                return Err(EmbeddingError::InvalidResponse {
                    reason: format!(
                        "expected {} embeddings, got {}",
                        chunk.len(),
                        vectors.len()
                    ),
                });
            }
            for (text, vector) in chunk.iter().zip(vectors) {
                validate_embedding_dim(vector.len(), self.dims.embedding_dim)?;
                self.cache.insert(hash_query(text), Arc::new(vector));
            }
        }

        Ok(pending.len())
    }

    pub fn cached(&self, text: &str) -> Option<Arc<Vec<f32>>> {
        self.cache.get(&hash_query(text))
    }

    pub fn cache_len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}
