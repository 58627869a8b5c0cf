//! Embedding and reranking services.
//!
//! - [`encoder`] turns query text into vectors with a per-run memo.
//! - [`reranker`] provides cross-encoder scoring used by [`crate::scoring`].

/// Embedding service client.
pub mod client;
/// Cached query encoder.
pub mod encoder;
mod error;
mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Hosted cross-encoder reranker.
pub mod reranker;

#[cfg(test)]
mod tests;

pub use client::{EmbeddingClient, InputType, VoyageConfig, VoyageEmbedder};
pub use encoder::QueryEncoder;
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingClient;
#[cfg(any(test, feature = "mock"))]
pub use reranker::MockRerankClient;
pub use reranker::{
    RerankClient, RerankHit, RerankRequest, RerankerConfig, RerankerError, VoyageReranker,
};
