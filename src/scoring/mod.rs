//! Cross-encoder reranking of gated candidates.
//!
//! Candidates are scored by [`RerankClient`](crate::embedding::RerankClient)
//! against a text fingerprint built from their taxonomy fields. The stage never
//! fails a query: service errors produce [`RerankOutcome::Degraded`] and the
//! caller keeps the ANN order.

pub mod scorer;
pub mod types;


pub use scorer::{CrossEncoderReranker, fingerprint};
pub use types::{RerankOutcome, RerankedCandidate};
