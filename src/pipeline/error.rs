use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

/// Pipeline stage a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Embedding,
    Retrieval,
    Rerank,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::Embedding => "embedding",
            Stage::Retrieval => "retrieval",
            Stage::Rerank => "rerank",
        };
        f.write_str(name)
    }
}

/// A failure that aborts one query.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("query text is empty")]
    EmptyQuery,

    #[error("embedding failed for query '{query}': {source}")]
    Embedding {
        query: String,
        #[source]
        source: EmbeddingError,
    },

    #[error("retrieval failed for query '{query}': {source}")]
    Retrieval {
        query: String,
        #[source]
        source: VectorDbError,
    },

    #[error("{stage} stage is enabled but no client was configured")]
    NotConfigured { stage: Stage },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::EmptyQuery => Stage::Input,
            PipelineError::Embedding { .. } => Stage::Embedding,
            PipelineError::Retrieval { .. } => Stage::Retrieval,
            PipelineError::NotConfigured { stage } => *stage,
        }
    }

    /// The query that failed, when the failure is tied to one.
    pub fn query(&self) -> Option<&str> {
        match self {
            PipelineError::Embedding { query, .. } | PipelineError::Retrieval { query, .. } => {
                Some(query)
            }
            PipelineError::EmptyQuery | PipelineError::NotConfigured { .. } => None,
        }
    }
}
