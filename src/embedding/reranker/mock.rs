use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use super::{RerankClient, RerankHit, RerankRequest, RerankerError};

/// Scripted [`RerankClient`].
///
/// By default scores each document by its word overlap with the query. Fixed
/// scores (by document position), a verbatim reply, and failures can be
/// injected.
#[derive(Default)]
pub struct MockRerankClient {
    scores: RwLock<Option<Vec<f32>>>,
    reply: RwLock<Option<Vec<RerankHit>>>,
    failure: RwLock<Option<String>>,
    requests: Mutex<Vec<RerankRequest>>,
    calls: AtomicUsize,
}

impl MockRerankClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `scores[i]` as the relevance of document `i`.
    pub fn with_scores(self, scores: Vec<f32>) -> Self {
        *self.scores.write() = Some(scores);
        self
    }

    /// Returns `hits` as-is for every request, unsorted and untruncated.
    pub fn with_reply(self, hits: Vec<RerankHit>) -> Self {
        *self.reply.write() = Some(hits);
        self
    }

    pub fn failing(message: &str) -> Self {
        let mock = Self::default();
        mock.fail_with(message);
        mock
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.write() = Some(message.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RerankRequest> {
        self.requests.lock().clone()
    }
}

impl RerankClient for MockRerankClient {
    async fn rerank(&self, request: &RerankRequest) -> Result<Vec<RerankHit>, RerankerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        if let Some(reason) = self.failure.read().clone() {
            return Err(RerankerError::RequestFailed { reason });
        }

        if let Some(hits) = self.reply.read().clone() {
            return Ok(hits);
        }

        let fixed = self.scores.read().clone();
        let mut hits: Vec<RerankHit> = request
            .documents
            .iter()
            .enumerate()
            .map(|(index, doc)| RerankHit {
                index,
                relevance_score: match &fixed {
                    Some(scores) => scores.get(index).copied().unwrap_or(0.0),
                    None => word_overlap(&request.query, doc),
                },
            })
            .collect();

        hits.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        hits.truncate(request.top_k);
        Ok(hits)
    }
}

fn word_overlap(query: &str, document: &str) -> f32 {
    let doc = document.to_lowercase();
    let words: Vec<String> = query
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    if words.is_empty() {
        return 0.0;
    }
    let matched = words.iter().filter(|w| doc.contains(w.as_str())).count();
    matched as f32 / words.len() as f32
}
