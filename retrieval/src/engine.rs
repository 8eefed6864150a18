//! Search engine implementation.

use std::sync::Arc;

use tracing::{debug, info};

use openvto_catalog::{Catalog, ScoredRow};
use openvto_embeddings::{Embedding, EmbeddingProvider, EmbeddingRequest};

use crate::couchbase::{CouchbaseClient, CouchbaseSearchResponse};
use crate::error::{Result, RetrievalError};

/// Embeds queries and runs them against the configured backends.
///
/// The catalog is an immutable snapshot shared by every search; the engine
/// itself holds no mutable state and can be shared across tasks.
pub struct SearchEngine {
    /// Embedding provider for query text.
    embedder: Arc<dyn EmbeddingProvider>,

    /// Local catalog snapshot.
    catalog: Option<Arc<Catalog>>,

    /// Couchbase vector index.
    couchbase: Option<CouchbaseClient>,
}

impl SearchEngine {
    /// Create an engine with no search backends.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            catalog: None,
            couchbase: None,
        }
    }

    /// Search the given catalog snapshot for local queries.
    pub fn with_catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Send cloud queries to the given Couchbase index.
    pub fn with_couchbase(mut self, client: CouchbaseClient) -> Self {
        self.couchbase = Some(client);
        self
    }

    /// Whether local search is available.
    pub fn has_catalog(&self) -> bool {
        self.catalog.is_some()
    }

    /// Whether Couchbase search is available.
    pub fn has_couchbase(&self) -> bool {
        self.couchbase.is_some()
    }

    /// Convert query text into an embedding.
    pub async fn embed_query(&self, query: &str) -> Result<Embedding> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }

        debug!("Embedding query with {}: {query}", self.embedder.name());
        let response = self.embedder.embed(EmbeddingRequest::new(query)).await?;
        Ok(response.embedding)
    }

    /// Top `k` catalog rows for `query`, best first.
    pub async fn local_search(&self, query: &str, k: usize) -> Result<Vec<ScoredRow>> {
        let catalog = self
            .catalog
            .as_ref()
            .ok_or(RetrievalError::NotConfigured("local"))?;

        let vector = self.embed_query(query).await?;
        let results = catalog.top_k(&vector, k)?;

        info!(
            "Local search returned {} of {} rows for {query:?}",
            results.len(),
            catalog.len()
        );
        Ok(results)
    }

    /// Top `k` Couchbase documents for `query`.
    pub async fn couchbase_search(&self, query: &str, k: usize) -> Result<CouchbaseSearchResponse> {
        let client = self
            .couchbase
            .as_ref()
            .ok_or(RetrievalError::NotConfigured("couchbase"))?;

        let vector = self.embed_query(query).await?;
        client.vector_search(&vector, k).await
    }
}
