//! Configuration error types.

use thiserror::Error;

use crate::constants::DimValidationError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Integer setting could not be parsed.
    #[error("failed to parse {name}='{value}' as an integer: {source}")]
    InvalidInteger {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Float setting could not be parsed.
    #[error("failed to parse {name}='{value}' as a number: {source}")]
    InvalidFloat {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Boolean setting was not one of the accepted spellings.
    #[error("invalid boolean {name}='{value}': expected true/false, 1/0, yes/no or on/off")]
    InvalidBool { name: &'static str, value: String },

    /// A size setting that must be positive was zero.
    #[error("{name} must be greater than zero")]
    ZeroValue { name: &'static str },

    /// `final_k` asked for more results than the retriever will fetch.
    #[error("final_k ({final_k}) must not exceed retrieval_k ({retrieval_k})")]
    FinalKExceedsRetrievalK { final_k: usize, retrieval_k: usize },

    /// Threshold was NaN or infinite.
    #[error("score threshold must be a finite number, got {value}")]
    InvalidThreshold { value: f32 },

    /// The configured embedding dimension is unusable.
    #[error("invalid embedding dimension: {0}")]
    InvalidDimension(#[from] DimValidationError),

    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },
}
