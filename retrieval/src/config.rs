//! Configuration for the Couchbase search backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Search Service port on Couchbase Capella, which only speaks TLS.
pub const CAPELLA_SEARCH_PORT: u16 = 18094;

/// Connection settings for a Couchbase vector search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouchbaseConfig {
    /// Username for HTTP basic auth.
    pub username: String,

    /// Password for HTTP basic auth.
    #[serde(skip_serializing)]
    pub password: String,

    /// Cluster host name.
    pub hostname: String,

    /// Search Service port.
    pub port: u16,

    /// Bucket holding the garments.
    pub bucket: String,

    /// Scope inside the bucket.
    pub scope: String,

    /// Vector search index name.
    pub index: String,

    /// Document field holding the embedding.
    pub field: String,

    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,

    /// Full base URL, overriding the one derived from host and port.
    pub base_url: Option<String>,

    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl CouchbaseConfig {
    /// Whether every setting needed to issue a query is present.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty()
            && !self.password.is_empty()
            && !self.hostname.is_empty()
            && self.port > 0
            && !self.bucket.is_empty()
            && !self.scope.is_empty()
            && !self.index.is_empty()
    }

    /// Base URL of the Search Service.
    ///
    /// The Capella search port is served over TLS, any other port over
    /// plain HTTP.
    pub fn base_url(&self) -> String {
        if let Some(url) = &self.base_url {
            return url.trim_end_matches('/').to_string();
        }
        let scheme = if self.port == CAPELLA_SEARCH_PORT {
            "https"
        } else {
            "http"
        };
        format!("{scheme}://{}:{}", self.hostname, self.port)
    }

    /// Path of the index query endpoint.
    pub fn query_path(&self) -> String {
        format!(
            "/api/bucket/{}/scope/{}/index/{}/query",
            self.bucket, self.scope, self.index
        )
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CouchbaseConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            hostname: String::new(),
            port: CAPELLA_SEARCH_PORT,
            bucket: String::new(),
            scope: String::new(),
            index: String::new(),
            field: "embedding_vector".to_string(),
            accept_invalid_certs: false,
            base_url: None,
            connect_timeout_secs: 30,
            request_timeout_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete() -> CouchbaseConfig {
        CouchbaseConfig {
            username: "user".to_string(),
            password: "secret".to_string(),
            hostname: "cb.example.cloud.couchbase.com".to_string(),
            bucket: "clothes".to_string(),
            scope: "clothes".to_string(),
            index: "search_clothes".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_complete() {
        assert!(complete().is_complete());
        assert!(!CouchbaseConfig::default().is_complete());

        let mut missing_index = complete();
        missing_index.index.clear();
        assert!(!missing_index.is_complete());
    }

    #[test]
    fn test_capella_port_uses_https() {
        assert_eq!(
            complete().base_url(),
            "https://cb.example.cloud.couchbase.com:18094"
        );
    }

    #[test]
    fn test_other_port_uses_http() {
        let config = CouchbaseConfig {
            hostname: "localhost".to_string(),
            port: 8094,
            ..complete()
        };
        assert_eq!(config.base_url(), "http://localhost:8094");
    }

    #[test]
    fn test_base_url_override() {
        let config = CouchbaseConfig {
            base_url: Some("http://127.0.0.1:9999/".to_string()),
            ..complete()
        };
        assert_eq!(config.base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn test_query_path() {
        assert_eq!(
            complete().query_path(),
            "/api/bucket/clothes/scope/clothes/index/search_clothes/query"
        );
    }
}
