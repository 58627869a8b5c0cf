pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use config::RerankerConfig;
pub use error::RerankerError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRerankClient;

use std::collections::HashSet;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::http::{build_http_client, endpoint, post_json};

/// One rerank call: score every document against `query`, keep `top_k`.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankRequest {
    pub query: String,
    pub documents: Vec<String>,
    pub model: String,
    pub top_k: usize,
}

/// Relevance of the document at `index` in the request.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RerankHit {
    pub index: usize,
    pub relevance_score: f32,
}

/// Cross-encoder relevance scoring service.
pub trait RerankClient: Send + Sync {
    /// Returns hits in no guaranteed order; callers sort.
    fn rerank(
        &self,
        request: &RerankRequest,
    ) -> impl Future<Output = Result<Vec<RerankHit>, RerankerError>> + Send;
}

#[derive(Serialize)]
struct RerankBody<'a> {
    query: &'a str,
    documents: &'a [String],
    model: &'a str,
    top_k: usize,
    return_documents: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RerankResponse {
    data: Vec<RerankHit>,
}

/// Hosted Voyage reranker.
pub struct VoyageReranker {
    http: reqwest::Client,
    url: String,
    config: RerankerConfig,
}

impl std::fmt::Debug for VoyageReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoyageReranker")
            .field("url", &self.url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl VoyageReranker {
    pub fn new(config: RerankerConfig) -> Result<Self, RerankerError> {
        config
            .validate()
            .map_err(|reason| RerankerError::InvalidConfig { reason })?;

        let http = build_http_client(config.timeout)
            .map_err(|reason| RerankerError::InvalidConfig { reason })?;

        Ok(Self {
            url: endpoint(&config.base_url, "rerank"),
            http,
            config,
        })
    }
}

impl RerankClient for VoyageReranker {
    async fn rerank(&self, request: &RerankRequest) -> Result<Vec<RerankHit>, RerankerError> {
        let body = RerankBody {
            query: &request.query,
            documents: &request.documents,
            model: &request.model,
            top_k: request.top_k,
            return_documents: false,
        };

        debug!(
            documents = request.documents.len(),
            top_k = request.top_k,
            model = %request.model,
            "Requesting rerank"
        );

        let response: RerankResponse =
            post_json(&self.http, &self.url, &self.config.api_key, &body).await?;

        check_hits(response.data, request.documents.len(), request.top_k)
    }
}

/// Rejects replies that cannot be mapped back onto the submitted documents.
///
/// Every index must be in range and appear at most once, every score must be
/// finite, and there must be at least `top_k` hits.
pub(crate) fn check_hits(
    hits: Vec<RerankHit>,
    len: usize,
    top_k: usize,
) -> Result<Vec<RerankHit>, RerankerError> {
    let mut seen = HashSet::with_capacity(hits.len());
    for hit in &hits {
        if hit.index >= len {
            return Err(RerankerError::IndexOutOfRange {
                index: hit.index,
                len,
            });
        }
        if !seen.insert(hit.index) {
            return Err(RerankerError::DuplicateIndex { index: hit.index });
        }
        if !hit.relevance_score.is_finite() {
            return Err(RerankerError::InvalidResponse {
                reason: format!("non-finite relevance score for index {}", hit.index),
            });
        }
    }
    let expected = top_k.min(len);
    if hits.len() < expected {
        return Err(RerankerError::TooFewHits {
            expected,
            actual: hits.len(),
        });
    }
    Ok(hits)
}
