use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::EmbeddingError;
use super::http::{build_http_client, endpoint, post_json};

/// Which side of the asymmetric embedding space a text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Query,
    Document,
}

/// Turns text into dense vectors.
pub trait EmbeddingClient: Send + Sync {
    /// Embeds `texts` in order; the output has one vector per input.
    fn embed(
        &self,
        texts: &[String],
        input_type: InputType,
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;

    /// Dimension every returned vector has.
    fn dimension(&self) -> usize;

    fn model(&self) -> &str;
}

/// Connection settings for the Voyage embeddings endpoint.
#[derive(Debug, Clone)]
pub struct VoyageConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub output_dimension: usize,
    pub timeout: Duration,
}

impl VoyageConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("api_key cannot be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }
        if self.output_dimension == 0 {
            return Err("output_dimension must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a [String],
    model: &'a str,
    input_type: InputType,
    output_dimension: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Debug, Deserialize)]
struct EmbedData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

/// Hosted Voyage embedding model.
pub struct VoyageEmbedder {
    http: reqwest::Client,
    url: String,
    config: VoyageConfig,
}

impl std::fmt::Debug for VoyageEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoyageEmbedder")
            .field("url", &self.url)
            .field("model", &self.config.model)
            .field("output_dimension", &self.config.output_dimension)
            .finish()
    }
}

impl VoyageEmbedder {
    pub fn new(config: VoyageConfig) -> Result<Self, EmbeddingError> {
        config
            .validate()
            .map_err(|reason| EmbeddingError::InvalidConfig { reason })?;

        let http = build_http_client(config.timeout)
            .map_err(|reason| EmbeddingError::InvalidConfig { reason })?;

        Ok(Self {
            url: endpoint(&config.base_url, "embeddings"),
            http,
            config,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl EmbeddingClient for VoyageEmbedder {
    async fn embed(
        &self,
        texts: &[String],
        input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbedRequest {
            input: texts,
            model: &self.config.model,
            input_type,
            output_dimension: self.config.output_dimension,
        };

        debug!(
            batch = texts.len(),
            model = %self.config.model,
            ?input_type,
            "Requesting embeddings"
        );

        let response: EmbedResponse =
            post_json(&self.http, &self.url, &self.config.api_key, &request).await?;

        order_embeddings(response, texts.len(), self.config.output_dimension)
    }

    fn dimension(&self) -> usize {
        self.config.output_dimension
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Puts response vectors back into input order and checks count and width.
pub(crate) fn order_embeddings(
    response: EmbedResponse,
    expected_len: usize,
    expected_dim: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if response.data.len() != expected_len {
        return Err(EmbeddingError::InvalidResponse {
            reason: format!(
                "expected {} embeddings, got {}",
                expected_len,
                response.data.len()
            ),
        });
    }

    let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected_len];
    for (position, item) in response.data.into_iter().enumerate() {
        let index = item.index.unwrap_or(position);
        if index >= expected_len {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!("embedding index {} out of range", index),
            });
        }
        if item.embedding.len() != expected_dim {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!(
                    "embedding {} has {} dimensions, expected {}",
                    index,
                    item.embedding.len(),
                    expected_dim
                ),
            });
        }
        if slots[index].replace(item.embedding).is_some() {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!("duplicate embedding index {}", index),
            });
        }
    }

    slots
        .into_iter()
        .map(|slot| {
            slot.ok_or_else(|| EmbeddingError::InvalidResponse {
                reason: "missing embedding in response".to_string(),
            })
        })
        .collect()
}
