use tracing::{debug, warn};

use super::policy::{CandidatePolicy, RetrievalFilter};
use crate::vectordb::{ScoredCandidate, SearchRequest, VectorDbError, VectorIndex, VectorQuery};

/// Runs ANN searches and applies the post-filters.
pub struct CandidateRetriever<I> {
    index: I,
    policy: CandidatePolicy,
}

impl<I> std::fmt::Debug for CandidateRetriever<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateRetriever")
            .field("policy", &self.policy)
            .finish()
    }
}

impl<I: VectorIndex> CandidateRetriever<I> {
    pub fn new(index: I, policy: CandidatePolicy) -> Self {
        Self { index, policy }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn policy(&self) -> CandidatePolicy {
        self.policy
    }

    /// Returns up to `retrieval_k` candidates in descending score order.
    pub async fn retrieve(
        &self,
        query: VectorQuery,
        retrieval_k: usize,
        filter: &RetrievalFilter,
    ) -> Result<Vec<ScoredCandidate>, VectorDbError> {
        if retrieval_k == 0 {
            return Ok(Vec::new());
        }

        let limit = filter.fetch_limit(retrieval_k);
        let num_candidates = self.policy.num_candidates(retrieval_k).max(limit);

        debug!(
            index = %self.index.name(),
            retrieval_k,
            limit,
            num_candidates,
            filtered = filter.is_active(),
            "Retrieving candidates"
        );

        let raw = self
            .index
            .search(SearchRequest {
                query,
                num_candidates: num_candidates as u64,
                limit: limit as u64,
            })
            .await?;

        let missing = raw.iter().filter(|c| c.score.is_none()).count();
        if missing > 0 {
            warn!(missing, "Index returned candidates without a score");
        }

        let fetched = raw.len();
        let mut candidates: Vec<ScoredCandidate> = if filter.is_active() {
            raw.into_iter().filter(|c| filter.matches(&c.record)).collect()
        } else {
            raw
        };
        candidates.truncate(retrieval_k);

        debug!(fetched, hits = candidates.len(), "Retrieved candidates");
        Ok(candidates)
    }
}
