//! `couchbase_search`: nearest garments in a Couchbase vector index.

use std::sync::Arc;

use async_trait::async_trait;
use openvto_retrieval::SearchEngine;
use openvto_tools::{ToolDefinition, ToolHandler, ToolOutput, ToolSpec};
use tracing::info;

use super::{SearchArgs, k_input, query_input};

pub const NAME: &str = "couchbase_search";

const DESCRIPTION: &str = "Only to be performed if the user asks to perform a search on the Cloud/Couchbase. Performs a vector search on Couchbase for a given query to find the most suitable clothes. Your job is to return the results in a readable format so the user can select which clothes to perform Virtual Try-On on.";

pub struct CouchbaseSearchTool {
    definition: ToolDefinition,
    engine: Arc<SearchEngine>,
}

impl CouchbaseSearchTool {
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        let spec = ToolSpec::new()
            .with_input(query_input())
            .with_input(k_input(1.0));

        Self {
            definition: ToolDefinition::new(NAME, DESCRIPTION).with_spec(spec),
            engine,
        }
    }
}

#[async_trait]
impl ToolHandler for CouchbaseSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, args: serde_json::Value) -> anyhow::Result<ToolOutput> {
        let SearchArgs { query, k } = serde_json::from_value(args)?;
        info!("Received query: {query}, k: {k}");

        let response = self.engine.couchbase_search(&query, k as usize).await?;
        info!(
            "Couchbase returned {} of {} hits",
            response.hits.len(),
            response.total_hits
        );

        Ok(ToolOutput::json(&response.hits)?)
    }
}
