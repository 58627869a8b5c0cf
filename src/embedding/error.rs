use thiserror::Error;

use super::http::ServiceCallError;
use crate::constants::DimValidationError;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("embedding service returned HTTP {status}: {body}")]
    ServiceStatus { status: u16, body: String },

    #[error("invalid embedding response: {reason}")]
    InvalidResponse { reason: String },

    #[error("embedding dimension check failed: {0}")]
    Dimension(#[from] DimValidationError),

    #[error("cannot embed empty query text")]
    EmptyInput,

    #[error("invalid embedding configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<ServiceCallError> for EmbeddingError {
    fn from(err: ServiceCallError) -> Self {
        match err {
            ServiceCallError::Transport(reason) => EmbeddingError::RequestFailed { reason },
            ServiceCallError::Status { status, body } => {
                EmbeddingError::ServiceStatus { status, body }
            }
            ServiceCallError::Decode(reason) => EmbeddingError::InvalidResponse { reason },
        }
    }
}
