use tracing::{debug, warn};

use crate::embedding::reranker::check_hits;
use crate::embedding::{RerankClient, RerankRequest};
use crate::vectordb::{CandidateRecord, ScoredCandidate};

use super::types::{RerankOutcome, RerankedCandidate};

const FINGERPRINT_SEPARATOR: &str = " | ";

/// Text the rerank service sees for a record:
/// `classification | specialization | displayName | code`, blanks omitted.
pub fn fingerprint(record: &CandidateRecord) -> String {
    [
        record.classification.as_deref(),
        record.specialization.as_deref(),
        record.display_name.as_deref(),
        record.code.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(FINGERPRINT_SEPARATOR)
}

pub struct CrossEncoderReranker<R> {
    client: R,
    model: String,
}

impl<R> std::fmt::Debug for CrossEncoderReranker<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoderReranker")
            .field("model", &self.model)
            .finish()
    }
}

impl<R: RerankClient> CrossEncoderReranker<R> {
    pub fn new(client: R, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn client(&self) -> &R {
        &self.client
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Reorders `candidates` by cross-encoder relevance to `query` and keeps
    /// the best `top_n`.
    pub async fn rerank(
        &self,
        query: &str,
        candidates: Vec<ScoredCandidate>,
        top_n: usize,
    ) -> RerankOutcome {
        if candidates.is_empty() || top_n == 0 {
            debug!(candidates = candidates.len(), top_n, "Nothing to rerank");
            return RerankOutcome::Skipped(Vec::new());
        }

        let top_k = top_n.min(candidates.len());
        let request = RerankRequest {
            query: query.to_string(),
            documents: candidates.iter().map(|c| fingerprint(&c.record)).collect(),
            model: self.model.clone(),
            top_k,
        };

        debug!(
            query_len = query.len(),
            num_candidates = candidates.len(),
            top_k,
            "Starting rerank"
        );

        let hits = match self.client.rerank(&request).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!(
                    query = %query,
                    error = %err,
                    "Rerank failed, keeping ANN order"
                );
                return degraded(candidates, top_k, err.to_string());
            }
        };

        let mut hits = match check_hits(hits, candidates.len(), top_k) {
            Ok(hits) => hits,
            Err(err) => {
                warn!(
                    query = %query,
                    error = %err,
                    "Rerank returned an unusable reply, keeping ANN order"
                );
                return degraded(candidates, top_k, err.to_string());
            }
        };

        hits.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        hits.truncate(top_k);

        let mut slots: Vec<Option<ScoredCandidate>> = candidates.into_iter().map(Some).collect();
        let reranked: Vec<RerankedCandidate> = hits
            .into_iter()
            .filter_map(|hit| {
                slots[hit.index]
                    .take()
                    .map(|c| RerankedCandidate::new(c, hit.relevance_score))
            })
            .collect();

        debug!(
            reranked = reranked.len(),
            top_rerank_score = ?reranked.first().and_then(|c| c.rerank_score),
            "Rerank complete"
        );

        RerankOutcome::Reranked(reranked)
    }
}

fn degraded(candidates: Vec<ScoredCandidate>, top_k: usize, reason: String) -> RerankOutcome {
    RerankOutcome::Degraded {
        candidates: candidates
            .into_iter()
            .take(top_k)
            .map(RerankedCandidate::passthrough)
            .collect(),
        reason,
    }
}
