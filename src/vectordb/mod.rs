//! Vector index integration (Qdrant) and taxonomy record model.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{QdrantIndex, VectorIndex, verify_dimension};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorIndex, cosine_similarity};
pub use model::{
    CandidateRecord, FIELD_ALIASES, FieldSource, RecordField, ScoredCandidate, SearchRequest,
    VectorQuery, resolve_field,
};
