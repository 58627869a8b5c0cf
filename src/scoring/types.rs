use crate::vectordb::{CandidateRecord, ScoredCandidate};

#[derive(Debug, Clone, PartialEq)]
/// Candidate annotated with its cross-encoder relevance, if reranking ran.
pub struct RerankedCandidate {
    /// The retrieved candidate with its ANN score.
    pub candidate: ScoredCandidate,
    /// Relevance from the rerank service. `None` when reranking was skipped
    /// or failed.
    pub rerank_score: Option<f32>,
}

impl RerankedCandidate {
    pub fn new(candidate: ScoredCandidate, rerank_score: f32) -> Self {
        Self {
            candidate,
            rerank_score: Some(rerank_score),
        }
    }

    /// Wraps a candidate that never went through the rerank service.
    pub fn passthrough(candidate: ScoredCandidate) -> Self {
        Self {
            candidate,
            rerank_score: None,
        }
    }

    pub fn record(&self) -> &CandidateRecord {
        &self.candidate.record
    }

    pub fn score(&self) -> Option<f32> {
        self.candidate.score
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of the rerank stage.
pub enum RerankOutcome {
    /// Service call succeeded; order is by relevance, descending.
    Reranked(Vec<RerankedCandidate>),
    /// Service call failed; candidates keep their gated ANN order.
    Degraded {
        candidates: Vec<RerankedCandidate>,
        reason: String,
    },
    /// No service call was made.
    Skipped(Vec<RerankedCandidate>),
}

impl RerankOutcome {
    pub fn candidates(&self) -> &[RerankedCandidate] {
        match self {
            RerankOutcome::Reranked(candidates)
            | RerankOutcome::Degraded { candidates, .. }
            | RerankOutcome::Skipped(candidates) => candidates,
        }
    }

    pub fn into_candidates(self) -> Vec<RerankedCandidate> {
        match self {
            RerankOutcome::Reranked(candidates)
            | RerankOutcome::Degraded { candidates, .. }
            | RerankOutcome::Skipped(candidates) => candidates,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, RerankOutcome::Degraded { .. })
    }

    /// Returns a short debug string.
    pub fn debug_status(&self) -> &'static str {
        match self {
            RerankOutcome::Reranked(_) => "RERANKED",
            RerankOutcome::Degraded { .. } => "DEGRADED",
            RerankOutcome::Skipped(_) => "SKIPPED",
        }
    }
}

impl std::fmt::Display for RerankOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RerankOutcome::Reranked(c) => write!(f, "RERANKED ({} candidates)", c.len()),
            RerankOutcome::Degraded { candidates, reason } => {
                write!(f, "DEGRADED ({} candidates): {}", candidates.len(), reason)
            }
            RerankOutcome::Skipped(c) => write!(f, "SKIPPED ({} candidates)", c.len()),
        }
    }
}
