//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `TAXON_*` environment variables;
//! CLI flags in the binary override both.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_FINAL_K, DEFAULT_QUERY_CACHE_CAPACITY,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRIEVAL_K, DEFAULT_SCORE_THRESHOLD, DimConfig,
};
use crate::pipeline::PipelineConfig;
use crate::retrieval::{CandidatePolicy, RetrievalFilter};

/// Default Qdrant URL used when `TAXON_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default collection holding the taxonomy records.
pub const DEFAULT_COLLECTION: &str = "taxonomy251";

/// Default Voyage API base URL.
pub const DEFAULT_VOYAGE_URL: &str = "https://api.voyageai.com/v1";

/// Default query embedding model (must match the document vectors).
pub const DEFAULT_EMBED_MODEL: &str = "voyage-3.5";

/// Default cross-encoder model.
pub const DEFAULT_RERANK_MODEL: &str = "rerank-2";

/// Run configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `TAXON_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Collection searched for candidates. Default: `taxonomy251`.
    pub collection: String,

    /// Named vector to search; `None` uses the collection's default vector.
    pub vector_name: Option<String>,

    /// Voyage API key (`TAXON_VOYAGE_API_KEY`, falling back to `VOYAGE_API_KEY`).
    pub voyage_api_key: Option<String>,

    /// Voyage API base URL.
    pub voyage_url: String,

    /// Embedding model for queries (and for server-side inference).
    pub embed_model: String,

    /// Query vector dimension. Default: `1024`.
    pub embedding_dim: usize,

    /// Cross-encoder model name. Default: `rerank-2`.
    pub rerank_model: String,

    /// Candidates kept from the ANN stage. Default: `100`.
    pub retrieval_k: usize,

    /// Results returned per query. Default: `10`.
    pub final_k: usize,

    /// Minimum ANN score; `None` disables gating. Default: `0.70`.
    pub threshold: Option<f32>,

    /// Whether to call the reranker. Default: `true`.
    pub rerank_enabled: bool,

    /// Send raw query text to the index instead of a client-side vector.
    pub server_side_embedding: bool,

    /// Keep only candidates in this corpus section (e.g. `Individual`).
    pub section: Option<String>,

    /// Keep only candidates whose code starts with this prefix (e.g. `207`).
    pub code_prefix: Option<String>,

    /// Timeout applied to every outbound HTTP request. Default: `30`.
    pub request_timeout_secs: u64,

    /// Max memoized query vectors. Default: `512`.
    pub query_cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            vector_name: None,
            voyage_api_key: None,
            voyage_url: DEFAULT_VOYAGE_URL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            rerank_model: DEFAULT_RERANK_MODEL.to_string(),
            retrieval_k: DEFAULT_RETRIEVAL_K,
            final_k: DEFAULT_FINAL_K,
            threshold: Some(DEFAULT_SCORE_THRESHOLD),
            rerank_enabled: true,
            server_side_embedding: false,
            section: None,
            code_prefix: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            query_cache_capacity: DEFAULT_QUERY_CACHE_CAPACITY,
        }
    }
}

impl Config {
    const ENV_QDRANT_URL: &'static str = "TAXON_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "TAXON_COLLECTION";
    const ENV_VECTOR_NAME: &'static str = "TAXON_VECTOR_NAME";
    const ENV_VOYAGE_API_KEY: &'static str = "TAXON_VOYAGE_API_KEY";
    const ENV_VOYAGE_API_KEY_FALLBACK: &'static str = "VOYAGE_API_KEY";
    const ENV_VOYAGE_URL: &'static str = "TAXON_VOYAGE_URL";
    const ENV_EMBED_MODEL: &'static str = "TAXON_EMBED_MODEL";
    const ENV_EMBED_DIM: &'static str = "TAXON_EMBED_DIM";
    const ENV_RERANK_MODEL: &'static str = "TAXON_RERANK_MODEL";
    const ENV_RETRIEVAL_K: &'static str = "TAXON_RETRIEVAL_K";
    const ENV_FINAL_K: &'static str = "TAXON_FINAL_K";
    const ENV_THRESHOLD: &'static str = "TAXON_THRESHOLD";
    const ENV_RERANK: &'static str = "TAXON_RERANK";
    const ENV_SERVER_EMBEDDING: &'static str = "TAXON_SERVER_EMBEDDING";
    const ENV_SECTION: &'static str = "TAXON_SECTION";
    const ENV_CODE_PREFIX: &'static str = "TAXON_CODE_PREFIX";
    const ENV_REQUEST_TIMEOUT: &'static str = "TAXON_REQUEST_TIMEOUT_SECS";
    const ENV_QUERY_CACHE_CAPACITY: &'static str = "TAXON_QUERY_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let voyage_api_key = Self::parse_optional_string_from_env(Self::ENV_VOYAGE_API_KEY)
            .or_else(|| Self::parse_optional_string_from_env(Self::ENV_VOYAGE_API_KEY_FALLBACK));

        Ok(Self {
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            collection: Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection),
            vector_name: Self::parse_optional_string_from_env(Self::ENV_VECTOR_NAME),
            voyage_api_key,
            voyage_url: Self::parse_string_from_env(Self::ENV_VOYAGE_URL, defaults.voyage_url),
            embed_model: Self::parse_string_from_env(Self::ENV_EMBED_MODEL, defaults.embed_model),
            embedding_dim: Self::parse_usize_from_env(Self::ENV_EMBED_DIM, defaults.embedding_dim)?,
            rerank_model: Self::parse_string_from_env(
                Self::ENV_RERANK_MODEL,
                defaults.rerank_model,
            ),
            retrieval_k: Self::parse_usize_from_env(Self::ENV_RETRIEVAL_K, defaults.retrieval_k)?,
            final_k: Self::parse_usize_from_env(Self::ENV_FINAL_K, defaults.final_k)?,
            threshold: Self::parse_threshold_from_env(defaults.threshold)?,
            rerank_enabled: Self::parse_bool_from_env(Self::ENV_RERANK, defaults.rerank_enabled)?,
            server_side_embedding: Self::parse_bool_from_env(
                Self::ENV_SERVER_EMBEDDING,
                defaults.server_side_embedding,
            )?,
            section: Self::parse_optional_string_from_env(Self::ENV_SECTION),
            code_prefix: Self::parse_optional_string_from_env(Self::ENV_CODE_PREFIX),
            request_timeout_secs: Self::parse_u64_from_env(
                Self::ENV_REQUEST_TIMEOUT,
                defaults.request_timeout_secs,
            )?,
            query_cache_capacity: Self::parse_u64_from_env(
                Self::ENV_QUERY_CACHE_CAPACITY,
                defaults.query_cache_capacity,
            )?,
        })
    }

    /// Validates sizes, the threshold, the dimension and required credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval_k == 0 {
            return Err(ConfigError::ZeroValue {
                name: "retrieval_k",
            });
        }
        if self.final_k == 0 {
            return Err(ConfigError::ZeroValue { name: "final_k" });
        }
        if self.final_k > self.retrieval_k {
            return Err(ConfigError::FinalKExceedsRetrievalK {
                final_k: self.final_k,
                retrieval_k: self.retrieval_k,
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroValue {
                name: "request_timeout_secs",
            });
        }

        if let Some(value) = self.threshold
            && !value.is_finite()
        {
            return Err(ConfigError::InvalidThreshold { value });
        }

        self.dim_config().validate()?;

        if self.needs_voyage() && self.voyage_api_key.is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_VOYAGE_API_KEY,
            });
        }

        Ok(())
    }

    /// True when any stage calls the Voyage API.
    pub fn needs_voyage(&self) -> bool {
        !self.server_side_embedding || self.rerank_enabled
    }

    /// Returns the dimension shared by the encoder and the index.
    pub fn dim_config(&self) -> DimConfig {
        DimConfig::new(self.embedding_dim)
    }

    /// Returns the outbound HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Collapses the retrieval knobs into a [`PipelineConfig`].
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            retrieval_k: self.retrieval_k,
            final_k: self.final_k,
            threshold: self.threshold,
            rerank_enabled: self.rerank_enabled,
            rerank_model: self.rerank_model.clone(),
            use_server_side_embedding: self.server_side_embedding,
            embed_model: self.embed_model.clone(),
            filter: RetrievalFilter {
                section: self.section.clone(),
                code_prefix: self.code_prefix.clone(),
            },
            candidate_policy: CandidatePolicy::default(),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_usize_from_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match Self::parse_optional_string_from_env(name) {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidInteger {
                    name,
                    value,
                    source,
                }),
            None => Ok(default),
        }
    }

    fn parse_u64_from_env(name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match Self::parse_optional_string_from_env(name) {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidInteger {
                    name,
                    value,
                    source,
                }),
            None => Ok(default),
        }
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match Self::parse_optional_string_from_env(name) {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool { name, value }),
            None => Ok(default),
        }
    }

    fn parse_threshold_from_env(default: Option<f32>) -> Result<Option<f32>, ConfigError> {
        match Self::parse_optional_string_from_env(Self::ENV_THRESHOLD) {
            Some(value)
                if value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("off") =>
            {
                Ok(None)
            }
            Some(value) => value
                .parse::<f32>()
                .map(Some)
                .map_err(|source| ConfigError::InvalidFloat {
                    name: Self::ENV_THRESHOLD,
                    value,
                    source,
                }),
            None => Ok(default),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
