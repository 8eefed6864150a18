//! Shared fixtures: a small catalog file and mocked Ollama, Couchbase and
//! Replicate endpoints.

#![allow(dead_code)]

use std::io::Write;

use openvto_mcp_server::{McpHandler, ServerConfig, build_handler};
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const RESULT_URL: &str = "https://replicate.delivery/xezq/tryon.jpg";
pub const COUCHBASE_QUERY_PATH: &str = "/api/bucket/fashion/scope/catalog/index/garments/query";

pub struct TestEnv {
    pub backend: MockServer,
    pub catalog: NamedTempFile,
    pub config: ServerConfig,
}

impl TestEnv {
    /// Start mocks and write a catalog whose best match for the mocked
    /// query embedding is id 1, then 3, then 2.
    pub async fn start() -> Self {
        let backend = MockServer::start().await;
        mount_backend(&backend).await;

        let mut catalog = NamedTempFile::new().unwrap();
        writeln!(catalog, "filename,link,id,description,embedding_model,vector").unwrap();
        writeln!(
            catalog,
            "1.jpg,https://x/1.jpg,1,\"Red dress, sleeveless\",nomic-embed-text,\"[0.9, 0.1]\""
        )
        .unwrap();
        writeln!(
            catalog,
            "2.jpg,https://x/2.jpg,2,Blue jeans,nomic-embed-text,\"[0.2, 0.8]\""
        )
        .unwrap();
        writeln!(
            catalog,
            "3.jpg,https://x/3.jpg,3,Pink top,nomic-embed-text,\"[0.5, 0.5]\""
        )
        .unwrap();

        let mut config = ServerConfig::default();
        config.embedding.base_url = backend.uri();
        config.local.csv_path = Some(catalog.path().to_path_buf());
        config.couchbase.username = "admin".to_string();
        config.couchbase.password = "secret".to_string();
        config.couchbase.hostname = "localhost".to_string();
        config.couchbase.bucket = "fashion".to_string();
        config.couchbase.scope = "catalog".to_string();
        config.couchbase.index = "garments".to_string();
        config.couchbase.base_url = Some(backend.uri());
        config.replicate.client.api_token = "r8_test".to_string();
        config.replicate.client.base_url = backend.uri();
        config.replicate.human_img = "https://x/person.png".to_string();
        config.replicate.open_browser = false;

        Self {
            backend,
            catalog,
            config,
        }
    }

    pub async fn handler(&self) -> McpHandler {
        build_handler(&self.config).await.unwrap()
    }
}

async fn mount_backend(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Ollama is running"))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "nomic-embed-text:latest",
            "embeddings": [[1.0, 0.0]]
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(COUCHBASE_QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": { "total": 1, "failed": 0, "successful": 1 },
            "total_hits": 1,
            "hits": [
                {
                    "id": "garment::1",
                    "score": 0.93,
                    "fields": { "description": "Red dress", "link": "https://x/1.jpg" }
                }
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "p1",
            "status": "succeeded",
            "output": RESULT_URL
        })))
        .mount(server)
        .await;
}

pub fn request(id: u64, method: &str, params: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

pub fn call_tool(id: u64, name: &str, arguments: serde_json::Value) -> serde_json::Value {
    request(
        id,
        "tools/call",
        serde_json::json!({ "name": name, "arguments": arguments }),
    )
}

/// The text content of a `tools/call` result.
pub fn tool_text(response: &serde_json::Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}
