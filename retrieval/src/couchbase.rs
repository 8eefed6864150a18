//! Couchbase Search Service client.
//!
//! Issues k-nearest-neighbour queries against a vector index over the REST
//! API: `POST /api/bucket/{bucket}/scope/{scope}/index/{index}/query`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::CouchbaseConfig;
use crate::error::{Result, RetrievalError};

/// Body of a vector search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorSearchRequest {
    /// Stored fields to return with each hit.
    pub fields: Vec<String>,

    /// Nearest-neighbour clauses.
    pub knn: Vec<KnnQuery>,
}

impl VectorSearchRequest {
    /// A single knn clause returning every stored field.
    pub fn new(field: impl Into<String>, vector: Vec<f32>, k: usize) -> Self {
        Self {
            fields: vec!["*".to_string()],
            knn: vec![KnnQuery {
                k,
                field: field.into(),
                vector,
            }],
        }
    }
}

/// One k-nearest-neighbour clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnQuery {
    pub k: usize,
    pub field: String,
    pub vector: Vec<f32>,
}

/// Decoded search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouchbaseSearchResponse {
    /// Per-partition status block.
    pub status: serde_json::Value,

    /// Matching documents, best first.
    pub hits: Vec<CouchbaseHit>,

    /// Total number of matches.
    pub total_hits: u64,
}

/// A matching document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouchbaseHit {
    /// Document key.
    pub id: String,

    /// Similarity score.
    pub score: f64,

    /// Stored fields of the document.
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Client for one Couchbase vector search index.
pub struct CouchbaseClient {
    config: CouchbaseConfig,
    client: reqwest::Client,
}

impl CouchbaseClient {
    /// Create a client, validating the configuration.
    pub fn new(config: CouchbaseConfig) -> Result<Self> {
        if !config.is_complete() {
            return Err(RetrievalError::Config(
                "Couchbase needs user, password, hostname, port, bucket, scope and index"
                    .to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { config, client })
    }

    /// Find the `k` documents nearest to `query` in the configured field.
    pub async fn vector_search(&self, query: &[f32], k: usize) -> Result<CouchbaseSearchResponse> {
        let url = format!("{}{}", self.config.base_url(), self.config.query_path());
        let request = VectorSearchRequest::new(&self.config.field, query.to_vec(), k);

        debug!(
            "Couchbase knn query: url={url} field={} k={k} dimension={}",
            self.config.field,
            query.len()
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&request)
            .send()
            .await
            .map_err(|source| {
                if source.is_connect() {
                    RetrievalError::Connect {
                        url: url.clone(),
                        source,
                    }
                } else {
                    RetrievalError::Http(source)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RetrievalError::Search {
                status: status.as_u16(),
                body,
            });
        }

        let result: CouchbaseSearchResponse = serde_json::from_str(&body)?;
        info!(
            "Couchbase returned {} hits ({} total)",
            result.hits.len(),
            result.total_hits
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{basic_auth, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> CouchbaseConfig {
        CouchbaseConfig {
            username: "user".to_string(),
            password: "secret".to_string(),
            hostname: "localhost".to_string(),
            bucket: "clothes".to_string(),
            scope: "inventory".to_string(),
            index: "search_clothes".to_string(),
            field: "embedding_vector".to_string(),
            base_url: Some(base_url),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_body_shape() {
        let request = VectorSearchRequest::new("embedding_vector", vec![0.25, 0.5], 3);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "fields": ["*"],
                "knn": [{ "k": 3, "field": "embedding_vector", "vector": [0.25, 0.5] }]
            })
        );
    }

    #[test]
    fn test_incomplete_config_rejected() {
        let result = CouchbaseClient::new(CouchbaseConfig::default());
        assert!(matches!(result, Err(RetrievalError::Config(_))));
    }

    #[tokio::test]
    async fn test_vector_search() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bucket/clothes/scope/inventory/index/search_clothes/query"))
            .and(basic_auth("user", "secret"))
            .and(body_json(serde_json::json!({
                "fields": ["*"],
                "knn": [{ "k": 2, "field": "embedding_vector", "vector": [0.25, 0.5] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": { "total": 1, "failed": 0, "successful": 1 },
                "hits": [
                    {
                        "index": "search_clothes_1",
                        "id": "garment::12",
                        "score": 0.91,
                        "fields": { "description": "Blue jeans", "link": "https://x/12.jpg" }
                    },
                    { "id": "garment::7", "score": 0.64 }
                ],
                "total_hits": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CouchbaseClient::new(config(server.uri())).unwrap();
        let response = client.vector_search(&[0.25, 0.5], 2).await.unwrap();

        assert_eq!(response.total_hits, 2);
        assert_eq!(response.hits.len(), 2);
        assert_eq!(response.hits[0].id, "garment::12");
        assert_eq!(
            response.hits[0].fields.get("description"),
            Some(&serde_json::json!("Blue jeans"))
        );
        assert!(response.hits[1].fields.is_empty());
    }

    #[tokio::test]
    async fn test_vector_search_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = CouchbaseClient::new(config(server.uri())).unwrap();
        let err = client.vector_search(&[1.0], 1).await.unwrap_err();

        match err {
            RetrievalError::Search { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_vector_search_unreachable() {
        let client = CouchbaseClient::new(config("http://127.0.0.1:1".to_string())).unwrap();
        let err = client.vector_search(&[1.0], 1).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Connect { .. }));
    }
}
