//! Cross-cutting, shared constants.
//!
//! # Dimension Invariants
//!
//! The query embedding dimension is a pipeline-wide constant: the Voyage
//! `output_dimension`, the Qdrant collection's vector size and every cached
//! vector must agree. It is never inferred from responses.
//!
//! 1. Use [`DimConfig`] to pass the dimension through initialization
//! 2. Use [`validate_embedding_dim`] at module boundaries to catch mismatches early

/// Default query/document embedding dimension (`voyage-3.5`).
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

/// Output dimensions the embedding service can produce.
pub const SUPPORTED_EMBEDDING_DIMS: [usize; 4] = [256, 512, 1024, 2048];

/// Default number of candidates pulled from the index before gating/reranking.
pub const DEFAULT_RETRIEVAL_K: usize = 100;

/// Default number of results kept after reranking.
pub const DEFAULT_FINAL_K: usize = 10;

/// Default minimum vector similarity score.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.70;

/// `num_candidates ≈ multiplier × retrieval_k`.
pub const DEFAULT_NUM_CANDIDATES_MULTIPLIER: usize = 3;

/// Lower bound on the ANN exploration breadth.
pub const DEFAULT_NUM_CANDIDATES_FLOOR: usize = 100;

/// Upper bound on the ANN exploration breadth.
pub const DEFAULT_NUM_CANDIDATES_CAP: usize = 2000;

/// Over-fetch factor applied when a post-filter narrows results.
pub const FILTER_OVERFETCH_FACTOR: usize = 4;

/// Minimum over-fetch when a post-filter narrows results.
pub const FILTER_OVERFETCH_MIN: usize = 100;

/// Queries per embedding request when pre-fetching a batch.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 64;

/// Max memoized query vectors.
pub const DEFAULT_QUERY_CACHE_CAPACITY: u64 = 512;

/// Per-request HTTP timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Runtime dimension configuration shared by the encoder and the index check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration with the specified embedding dimension.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Returns an error if the dimension is zero or not one the service can emit.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        if !SUPPORTED_EMBEDDING_DIMS.contains(&self.embedding_dim) {
            return Err(DimValidationError::Unsupported {
                dim: self.embedding_dim,
            });
        }
        Ok(())
    }

    /// Returns the dimension as the `u64` Qdrant reports vector sizes in.
    pub fn vector_size(&self) -> u64 {
        self.embedding_dim as u64
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// The embedding service cannot produce this dimension.
    Unsupported { dim: usize },
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::Unsupported { dim } => {
                write!(
                    f,
                    "embedding dimension {} is not supported (expected one of {:?})",
                    dim, SUPPORTED_EMBEDDING_DIMS
                )
            }
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use taxon::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// let response_dim = 1024;
/// validate_embedding_dim(response_dim, DEFAULT_EMBEDDING_DIM).unwrap();
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
