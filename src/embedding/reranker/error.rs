use thiserror::Error;

use crate::embedding::http::ServiceCallError;

#[derive(Debug, Error)]
pub enum RerankerError {
    #[error("rerank request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("rerank service returned HTTP {status}: {body}")]
    ServiceStatus { status: u16, body: String },

    #[error("invalid rerank response: {reason}")]
    InvalidResponse { reason: String },

    #[error("rerank result index {index} out of range for {len} documents")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("rerank result index {index} returned more than once")]
    DuplicateIndex { index: usize },

    #[error("rerank returned {actual} results, expected at least {expected}")]
    TooFewHits { expected: usize, actual: usize },

    #[error("invalid reranker configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<ServiceCallError> for RerankerError {
    fn from(err: ServiceCallError) -> Self {
        match err {
            ServiceCallError::Transport(reason) => RerankerError::RequestFailed { reason },
            ServiceCallError::Status { status, body } => {
                RerankerError::ServiceStatus { status, body }
            }
            ServiceCallError::Decode(reason) => RerankerError::InvalidResponse { reason },
        }
    }
}
