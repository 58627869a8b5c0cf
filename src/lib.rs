//! Taxon library crate (used by the `taxon` binary and integration tests).
//!
//! Two-stage semantic search over the provider taxonomy: an ANN query
//! against a Qdrant collection, a score gate, and an optional hosted
//! cross-encoder rerank. The same pipeline drives the labeled Hit@K
//! evaluation and the batch CSV report.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Environment configuration
//! - [`SearchPipeline`], [`PipelineConfig`], [`QueryOutcome`] - Query orchestration
//! - [`PipelineError`], [`Stage`] - Fatal per-query failures
//!
//! ## Embedding & Scoring
//! - [`QueryEncoder`], [`VoyageEmbedder`] - Query embedding with a per-run memo
//! - [`VoyageReranker`], [`CrossEncoderReranker`] - Cross-encoder reranking
//! - [`RerankOutcome`] - Reranked, degraded, or skipped result sets
//!
//! ## Vector Database
//! - [`QdrantIndex`], [`VectorIndex`] - ANN search
//! - [`CandidateRecord`], [`ScoredCandidate`] - Normalized taxonomy records
//!
//! ## Evaluation & Reporting
//! - [`Evaluator`], [`EvalQuery`], [`EvalResult`] - Hit@1 / Hit@3
//! - [`build_report`], [`CsvWriter`] - Batch CSV output
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cli;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod eval;
pub mod hashing;
pub mod pipeline;
pub mod report;
pub mod retrieval;
pub mod scoring;
pub mod vectordb;

pub use config::{Config, ConfigError};
pub use constants::{DimConfig, DimValidationError, validate_embedding_dim};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{MockEmbeddingClient, MockRerankClient};
pub use embedding::{
    EmbeddingClient, EmbeddingError, InputType, QueryEncoder, RerankClient, RerankerConfig,
    RerankerError, VoyageConfig, VoyageEmbedder, VoyageReranker,
};
pub use eval::{EvalQuery, EvalResult, EvalRun, Evaluator, default_eval_queries};
pub use hashing::hash_query;
pub use pipeline::{
    PipelineConfig, PipelineError, QueryOutcome, ResultRow, SearchPipeline, Stage,
};
pub use report::{CsvWriter, ReportError, ReportRun, build_report, write_csv_file};
pub use retrieval::{CandidatePolicy, CandidateRetriever, RetrievalFilter, threshold_gate};
pub use scoring::{CrossEncoderReranker, RerankOutcome, RerankedCandidate};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
pub use vectordb::{
    CandidateRecord, QdrantIndex, ScoredCandidate, VectorDbError, VectorIndex, VectorQuery,
};
