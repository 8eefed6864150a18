//! Wiring from configuration to a ready handler.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use openvto_catalog::{Catalog, LoadOptions};
use openvto_embeddings::{EmbeddingProvider, OllamaProvider};
use openvto_inference::ReplicateClient;
use openvto_retrieval::{CouchbaseClient, SearchEngine};
use openvto_tools::{ToolExecutor, ToolRegistry};
use tracing::{debug, info, warn};

use crate::config::{Availability, LocalConfig, ServerConfig};
use crate::handler::McpHandler;
use crate::tools::{CouchbaseSearchTool, LocalSearchTool, PerformVtonTool};

/// Build the handler for a configuration, registering the tools it supports.
pub async fn build_handler(config: &ServerConfig) -> anyhow::Result<McpHandler> {
    let registry = build_registry(config).await?;
    let executor =
        ToolExecutor::new(Arc::new(registry)).with_timeout(config.server.tool_timeout());
    Ok(McpHandler::new(executor))
}

/// Register the tools the configuration supports.
///
/// Fails when try-on or every search backend is missing.
pub async fn build_registry(config: &ServerConfig) -> anyhow::Result<ToolRegistry> {
    let availability = config.availability().ensure_usable()?;
    info!("Functionality available: {availability:?}");

    let embedder = OllamaProvider::new()
        .with_base_url(&config.embedding.base_url)
        .with_model(&config.embedding.model)
        .with_timeout(Duration::from_secs(config.embedding.timeout_secs));
    if !embedder.is_running().await {
        warn!(
            "Ollama is not answering at {}; searches will fail until it is started",
            embedder.base_url()
        );
    }

    let mut engine = SearchEngine::new(Arc::new(embedder));
    if availability.local() {
        engine = engine.with_catalog(Arc::new(load_catalog(&config.local)?));
    }
    if availability.couchbase() {
        engine = engine.with_couchbase(CouchbaseClient::new(config.couchbase.clone())?);
    }
    let engine = Arc::new(engine);

    let replicate = Arc::new(ReplicateClient::new(config.replicate.client.clone())?);

    let mut registry = ToolRegistry::new();
    if availability.local() {
        registry.register(Arc::new(LocalSearchTool::new(engine.clone())))?;
    }
    if availability.couchbase() {
        registry.register(Arc::new(CouchbaseSearchTool::new(engine)))?;
    }
    registry.register(Arc::new(
        PerformVtonTool::new(replicate, &config.replicate.human_img)
            .with_open_browser(config.replicate.open_browser),
    ))?;

    info!(
        "Registered tools: {}",
        registry.names().collect::<Vec<_>>().join(", ")
    );
    Ok(registry)
}

fn load_catalog(local: &LocalConfig) -> anyhow::Result<Catalog> {
    let path = local
        .csv_path
        .as_ref()
        .context("local search needs a CSV path")?;

    let mut options = LoadOptions::default().with_delimiter(local.delimiter);
    if !local.has_header {
        options = options.without_header();
    }

    let catalog = Catalog::from_path(path, &options)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    debug!(
        "Catalog dimension {:?}, models {:?}",
        catalog.dimension(),
        catalog.model_tags()
    );
    Ok(catalog)
}
