use std::time::Duration;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::vectors_config::Config as VectorsConfigKind;
use qdrant_client::qdrant::{Document, Query, QueryPointsBuilder, SearchParamsBuilder};
use tracing::debug;

use super::error::VectorDbError;
use super::model::{ScoredCandidate, SearchRequest, VectorQuery};

#[derive(Clone)]
/// Qdrant-backed vector index over one collection (and optionally one named vector).
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
    collection: String,
    vector_name: Option<String>,
}

impl QdrantIndex {
    /// Creates an index handle for `collection` at `url`.
    pub fn new(
        url: &str,
        collection: &str,
        vector_name: Option<String>,
        timeout: Duration,
    ) -> Result<Self, VectorDbError> {
        let client = Qdrant::from_url(url).timeout(timeout).build().map_err(|e| {
            VectorDbError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
            vector_name,
        })
    }

    /// Returns the underlying Qdrant client.
    pub fn client(&self) -> &Qdrant {
        &self.client
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Runs one nearest-neighbour query and returns candidates in index order.
    pub async fn search(
        &self,
        request: SearchRequest,
    ) -> Result<Vec<ScoredCandidate>, VectorDbError> {
        let query = match request.query {
            VectorQuery::Vector(vector) => Query::new_nearest(vector),
            VectorQuery::Text { text, model } => Query::new_nearest(Document::new(text, model)),
        };

        let mut builder = QueryPointsBuilder::new(self.collection.clone())
            .query(query)
            .limit(request.limit)
            .with_payload(true)
            .params(SearchParamsBuilder::default().hnsw_ef(request.num_candidates));

        if let Some(name) = &self.vector_name {
            builder = builder.using(name.clone());
        }

        let response =
            self.client
                .query(builder)
                .await
                .map_err(|e| VectorDbError::SearchFailed {
                    collection: self.collection.clone(),
                    message: e.to_string(),
                })?;

        debug!(
            collection = %self.collection,
            hits = response.result.len(),
            "Qdrant query complete"
        );

        Ok(response
            .result
            .into_iter()
            .map(ScoredCandidate::from_scored_point)
            .collect())
    }

    /// Returns the configured vector size, or `None` if the collection has no
    /// vector under the configured name.
    pub async fn vector_size(&self) -> Result<Option<u64>, VectorDbError> {
        let exists = self
            .client
            .collection_exists(self.collection.as_str())
            .await
            .map_err(|e| self.inspect_error(e))?;
        if !exists {
            return Err(VectorDbError::CollectionNotFound {
                collection: self.collection.clone(),
            });
        }

        let info = self
            .client
            .collection_info(self.collection.as_str())
            .await
            .map_err(|e| self.inspect_error(e))?;

        let vectors = info
            .result
            .and_then(|i| i.config)
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config);

        Ok(match (vectors, &self.vector_name) {
            (Some(VectorsConfigKind::Params(params)), None) => Some(params.size),
            (Some(VectorsConfigKind::ParamsMap(map)), Some(name)) => {
                map.map.get(name).map(|p| p.size)
            }
            _ => None,
        })
    }

    fn inspect_error(&self, e: qdrant_client::QdrantError) -> VectorDbError {
        VectorDbError::InspectFailed {
            collection: self.collection.clone(),
            message: e.to_string(),
        }
    }
}

/// Minimal async interface used by the retriever.
pub trait VectorIndex: Send + Sync {
    /// Runs one ANN request.
    fn search(
        &self,
        request: SearchRequest,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredCandidate>, VectorDbError>> + Send;

    /// Returns the index's vector size, if known.
    fn vector_size(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<u64>, VectorDbError>> + Send;

    /// Human-readable index name (for logs and errors).
    fn name(&self) -> &str;
}

impl VectorIndex for QdrantIndex {
    async fn search(&self, request: SearchRequest) -> Result<Vec<ScoredCandidate>, VectorDbError> {
        self.search(request).await
    }

    async fn vector_size(&self) -> Result<Option<u64>, VectorDbError> {
        self.vector_size().await
    }

    fn name(&self) -> &str {
        &self.collection
    }
}

/// Checks that `index` stores vectors of `expected` dimensions.
///
/// Returns the reported size, or `None` when the index does not report one.
pub async fn verify_dimension<I: VectorIndex>(
    index: &I,
    expected: usize,
) -> Result<Option<u64>, VectorDbError> {
    let size = index.vector_size().await?;
    if let Some(actual) = size
        && actual != expected as u64
    {
        return Err(VectorDbError::InvalidDimension {
            expected,
            actual: actual as usize,
        });
    }
    debug!(index = %index.name(), expected, ?size, "Verified index dimension");
    Ok(size)
}
