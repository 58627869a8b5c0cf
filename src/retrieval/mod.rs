//! ANN candidate retrieval and score gating.

pub mod gate;
pub mod policy;
pub mod retriever;


pub use gate::threshold_gate;
pub use policy::{CandidatePolicy, RetrievalFilter};
pub use retriever::CandidateRetriever;
