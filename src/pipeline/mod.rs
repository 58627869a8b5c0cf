//! Per-query search pipeline.
//!
//! Stages run strictly in order: encode, retrieve, gate, rerank, assemble.
//! Encoding and retrieval failures abort the query with a [`PipelineError`];
//! rerank failures degrade to ANN order (see [`RerankOutcome`]).

pub mod assembler;
pub mod error;


pub use assembler::{ResultRow, assemble};
pub use error::{PipelineError, Stage};

use tracing::{debug, warn};

use crate::config::{DEFAULT_EMBED_MODEL, DEFAULT_RERANK_MODEL};
use crate::constants::{DEFAULT_FINAL_K, DEFAULT_RETRIEVAL_K, DEFAULT_SCORE_THRESHOLD};
use crate::embedding::{EmbeddingClient, QueryEncoder, RerankClient};
use crate::retrieval::{CandidatePolicy, CandidateRetriever, RetrievalFilter, threshold_gate};
use crate::scoring::{CrossEncoderReranker, RerankOutcome, RerankedCandidate};
use crate::vectordb::{VectorIndex, VectorQuery};

/// Knobs for one pipeline instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Candidates pulled from the index before gating.
    pub retrieval_k: usize,
    /// Results returned per query.
    pub final_k: usize,
    /// Minimum ANN score; `None` disables the gate.
    pub threshold: Option<f32>,
    pub rerank_enabled: bool,
    pub rerank_model: String,
    /// Send raw text to the index's own inference instead of encoding locally.
    pub use_server_side_embedding: bool,
    /// Model named in server-side inference requests.
    pub embed_model: String,
    pub filter: RetrievalFilter,
    pub candidate_policy: CandidatePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retrieval_k: DEFAULT_RETRIEVAL_K,
            final_k: DEFAULT_FINAL_K,
            threshold: Some(DEFAULT_SCORE_THRESHOLD),
            rerank_enabled: true,
            rerank_model: DEFAULT_RERANK_MODEL.to_string(),
            use_server_side_embedding: false,
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            filter: RetrievalFilter::default(),
            candidate_policy: CandidatePolicy::default(),
        }
    }
}

/// What one query produced.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub query: String,
    /// Candidates returned by the index (after post-filters).
    pub retrieved: usize,
    /// Candidates surviving the threshold gate.
    pub gated: usize,
    pub rerank: RerankOutcome,
}

impl QueryOutcome {
    /// Final ordered results, at most `final_k`.
    pub fn results(&self) -> &[RerankedCandidate] {
        self.rerank.candidates()
    }

    pub fn rows(&self) -> Vec<ResultRow> {
        assemble(&self.query, self.results())
    }
}

pub struct SearchPipeline<E, I, R> {
    config: PipelineConfig,
    encoder: Option<QueryEncoder<E>>,
    retriever: CandidateRetriever<I>,
    reranker: Option<CrossEncoderReranker<R>>,
}

impl<E, I, R> std::fmt::Debug for SearchPipeline<E, I, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPipeline")
            .field("config", &self.config)
            .field("encoder", &self.encoder.is_some())
            .field("reranker", &self.reranker.is_some())
            .finish()
    }
}

impl<E, I, R> SearchPipeline<E, I, R>
where
    E: EmbeddingClient,
    I: VectorIndex,
    R: RerankClient,
{
    pub fn new(config: PipelineConfig, index: I) -> Self {
        let retriever = CandidateRetriever::new(index, config.candidate_policy);
        Self {
            config,
            encoder: None,
            retriever,
            reranker: None,
        }
    }

    pub fn with_encoder(mut self, encoder: QueryEncoder<E>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    pub fn with_reranker(mut self, client: R) -> Self {
        self.reranker = Some(CrossEncoderReranker::new(
            client,
            self.config.rerank_model.clone(),
        ));
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn encoder(&self) -> Option<&QueryEncoder<E>> {
        self.encoder.as_ref()
    }

    pub fn index(&self) -> &I {
        self.retriever.index()
    }

    pub fn reranker(&self) -> Option<&CrossEncoderReranker<R>> {
        self.reranker.as_ref()
    }

    /// `num_candidates` the configured `retrieval_k` maps to.
    pub fn num_candidates(&self) -> usize {
        self.config
            .candidate_policy
            .num_candidates(self.config.retrieval_k)
    }

    /// Checks that every enabled stage has a client behind it.
    pub fn ensure_ready(&self) -> Result<(), PipelineError> {
        if !self.config.use_server_side_embedding && self.encoder.is_none() {
            return Err(PipelineError::NotConfigured {
                stage: Stage::Embedding,
            });
        }
        if self.config.rerank_enabled && self.reranker.is_none() {
            return Err(PipelineError::NotConfigured {
                stage: Stage::Rerank,
            });
        }
        Ok(())
    }

    /// Warms the embedding cache for `queries`. No-op with server-side
    /// embedding.
    pub async fn prefetch(
        &self,
        queries: &[String],
        batch_size: usize,
    ) -> Result<usize, PipelineError> {
        if self.config.use_server_side_embedding {
            return Ok(0);
        }
        let Some(encoder) = &self.encoder else {
            return Err(PipelineError::NotConfigured {
                stage: Stage::Embedding,
            });
        };

        encoder
            .prefetch(queries, batch_size)
            .await
            .map_err(|source| PipelineError::Embedding {
                query: format!("<prefetch of {} queries>", queries.len()),
                source,
            })
    }

    /// Runs every stage for `query`.
    pub async fn run(&self, query: &str) -> Result<QueryOutcome, PipelineError> {
        if query.trim().is_empty() {
            return Err(PipelineError::EmptyQuery);
        }
        self.ensure_ready()?;

        let vector_query = self.vector_query(query).await?;

        let candidates = self
            .retriever
            .retrieve(vector_query, self.config.retrieval_k, &self.config.filter)
            .await
            .map_err(|source| PipelineError::Retrieval {
                query: query.to_string(),
                source,
            })?;
        let retrieved = candidates.len();

        let gated = threshold_gate(candidates, self.config.threshold);
        let gated_len = gated.len();

        let rerank = match (&self.reranker, self.config.rerank_enabled) {
            (Some(reranker), true) => reranker.rerank(query, gated, self.config.final_k).await,
            _ => RerankOutcome::Skipped(
                gated
                    .into_iter()
                    .take(self.config.final_k)
                    .map(RerankedCandidate::passthrough)
                    .collect(),
            ),
        };

        if retrieved == 0 {
            warn!(query = %query, "No ANN hits");
        }

        debug!(
            query = %query,
            retrieved,
            gated = gated_len,
            returned = rerank.candidates().len(),
            rerank = rerank.debug_status(),
            "Query complete"
        );

        Ok(QueryOutcome {
            query: query.to_string(),
            retrieved,
            gated: gated_len,
            rerank,
        })
    }

    async fn vector_query(&self, query: &str) -> Result<VectorQuery, PipelineError> {
        if self.config.use_server_side_embedding {
            return Ok(VectorQuery::Text {
                text: query.to_string(),
                model: self.config.embed_model.clone(),
            });
        }

        let encoder = self.encoder.as_ref().ok_or(PipelineError::NotConfigured {
            stage: Stage::Embedding,
        })?;

        let vector = encoder
            .encode(query)
            .await
            .map_err(|source| PipelineError::Embedding {
                query: query.to_string(),
                source,
            })?;

        Ok(VectorQuery::Vector(vector.as_ref().clone()))
    }
}
