use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};

use crate::vectordb::{
    CandidateRecord, ScoredCandidate, SearchRequest, VectorDbError, VectorIndex, VectorQuery,
};

const MOCK_INDEX_NAME: &str = "mock_taxonomy";

/// In-memory [`VectorIndex`] with exact cosine search.
///
/// Supports canned results (returned verbatim up to `limit`), injected
/// failures, and text queries via registered text → vector pairs.
pub struct MockVectorIndex {
    dim: usize,
    points: RwLock<Vec<MockPoint>>,
    fixed: RwLock<Option<Vec<ScoredCandidate>>>,
    text_vectors: RwLock<HashMap<String, Vec<f32>>>,
    failure: RwLock<Option<String>>,
    requests: Mutex<Vec<SearchRequest>>,
}

struct MockPoint {
    vector: Vec<f32>,
    record: CandidateRecord,
}

impl MockVectorIndex {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            points: RwLock::new(Vec::new()),
            fixed: RwLock::new(None),
            text_vectors: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns `results` for every search (truncated to the request limit).
    pub fn with_fixed_results(self, results: Vec<ScoredCandidate>) -> Self {
        *self.fixed.write() = Some(results);
        self
    }

    /// Stores a document whose fields are resolved from `payload`.
    pub fn insert(&self, vector: Vec<f32>, payload: HashMap<String, String>) {
        self.points.write().push(MockPoint {
            vector,
            record: CandidateRecord::from_source(&payload),
        });
    }

    /// Maps a text query to the vector server-side inference would produce.
    pub fn register_text(&self, text: &str, vector: Vec<f32>) {
        self.text_vectors.write().insert(text.to_string(), vector);
    }

    /// Makes every subsequent search fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.write() = Some(message.to_string());
    }

    /// Clears an injected failure.
    pub fn recover(&self) {
        *self.failure.write() = None;
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().clone()
    }

    pub fn point_count(&self) -> usize {
        self.points.read().len()
    }

    fn resolve_query(&self, query: &VectorQuery) -> Result<Vec<f32>, VectorDbError> {
        match query {
            VectorQuery::Vector(v) => Ok(v.clone()),
            VectorQuery::Text { text, .. } => {
                self.text_vectors
                    .read()
                    .get(text)
                    .cloned()
                    .ok_or_else(|| VectorDbError::SearchFailed {
                        collection: MOCK_INDEX_NAME.to_string(),
                        message: format!("no inference vector registered for '{}'", text),
                    })
            }
        }
    }
}

impl VectorIndex for MockVectorIndex {
    async fn search(&self, request: SearchRequest) -> Result<Vec<ScoredCandidate>, VectorDbError> {
        self.requests.lock().push(request.clone());

        if let Some(message) = self.failure.read().clone() {
            return Err(VectorDbError::SearchFailed {
                collection: MOCK_INDEX_NAME.to_string(),
                message,
            });
        }

        let limit = request.limit as usize;

        if let Some(fixed) = self.fixed.read().as_ref() {
            return Ok(fixed.iter().take(limit).cloned().collect());
        }

        let query = self.resolve_query(&request.query)?;
        if query.len() != self.dim {
            return Err(VectorDbError::InvalidDimension {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let mut results: Vec<ScoredCandidate> = self
            .points
            .read()
            .iter()
            .map(|p| ScoredCandidate::new(p.record.clone(), cosine_similarity(&query, &p.vector)))
            .collect();

        results.sort_by(|a, b| b.score_or_zero().total_cmp(&a.score_or_zero()));

        results.truncate(limit);
        Ok(results)
    }

    async fn vector_size(&self) -> Result<Option<u64>, VectorDbError> {
        Ok(Some(self.dim as u64))
    }

    fn name(&self) -> &str {
        MOCK_INDEX_NAME
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
