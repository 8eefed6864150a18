//! Error types for the retrieval engine.

use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur in the retrieval engine.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] openvto_catalog::CatalogError),

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] openvto_embeddings::EmbeddingError),

    /// The query text is blank.
    #[error("query must not be empty")]
    EmptyQuery,

    /// A search backend is not configured.
    #[error("{0} search is not configured")]
    NotConfigured(&'static str),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The search service could not be reached.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The search service answered with an error status.
    #[error("search request failed: HTTP {status} - {body}")]
    Search { status: u16, body: String },

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
