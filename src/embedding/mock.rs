use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use super::client::{EmbeddingClient, InputType};
use super::error::EmbeddingError;

const MOCK_MODEL: &str = "mock-embed";

/// Deterministic [`EmbeddingClient`] for tests.
///
/// Unregistered texts get a unit vector derived from their blake3 hash, so the
/// same text always maps to the same vector.
pub struct MockEmbeddingClient {
    dim: usize,
    overrides: RwLock<HashMap<String, Vec<f32>>>,
    failure: RwLock<Option<String>>,
    batches: Mutex<Vec<Vec<String>>>,
    calls: AtomicUsize,
}

impl MockEmbeddingClient {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            overrides: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
            batches: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Pins the vector returned for `text`.
    pub fn set_vector(&self, text: &str, vector: Vec<f32>) {
        self.overrides.write().insert(text.to_string(), vector);
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.write() = Some(message.to_string());
    }

    pub fn recover(&self) {
        *self.failure.write() = None;
    }

    /// Number of `embed` calls made, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Inputs of every successful call, oldest first.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().clone()
    }

    pub fn deterministic_vector(&self, text: &str) -> Vec<f32> {
        let mut reader = blake3::Hasher::new()
            .update(text.as_bytes())
            .finalize_xof();
        let mut bytes = vec![0u8; self.dim * 4];
        reader.fill(&mut bytes);

        let raw: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| {
                let n = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
                (n as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect();

        let norm = raw.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            raw
        } else {
            raw.into_iter().map(|x| x / norm).collect()
        }
    }
}

impl EmbeddingClient for MockEmbeddingClient {
    async fn embed(
        &self,
        texts: &[String],
        _input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = self.failure.read().clone() {
            return Err(EmbeddingError::RequestFailed { reason });
        }

        self.batches.lock().push(texts.to_vec());

        let overrides = self.overrides.read();
        Ok(texts
            .iter()
            .map(|t| {
                overrides
                    .get(t)
                    .cloned()
                    .unwrap_or_else(|| self.deterministic_vector(t))
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn model(&self) -> &str {
        MOCK_MODEL
    }
}
