//! `local_search`: nearest garments in the CSV catalog.

use std::sync::Arc;

use async_trait::async_trait;
use openvto_catalog::{ScoredRow, SearchHit};
use openvto_retrieval::SearchEngine;
use openvto_tools::{ToolDefinition, ToolHandler, ToolOutput, ToolSpec};
use tracing::{debug, info};

use super::{SearchArgs, k_input, query_input};

pub const NAME: &str = "local_search";

const DESCRIPTION: &str = "This is the default search tool to search for relevant clothes from a database of CSV file. Performs a vector search over a CSV files for a given query to find the most suitable clothes. Your job is to return the results in a readable format so the user can select which clothes to perform Virtual Try-On on.";

pub struct LocalSearchTool {
    definition: ToolDefinition,
    engine: Arc<SearchEngine>,
}

impl LocalSearchTool {
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        let spec = ToolSpec::new()
            .with_input(query_input())
            .with_input(k_input(0.0));

        Self {
            definition: ToolDefinition::new(NAME, DESCRIPTION).with_spec(spec),
            engine,
        }
    }
}

#[async_trait]
impl ToolHandler for LocalSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, args: serde_json::Value) -> anyhow::Result<ToolOutput> {
        let SearchArgs { query, k } = serde_json::from_value(args)?;
        info!("Received query: {query}, k: {k}");

        let results = self.engine.local_search(&query, k as usize).await?;
        for result in &results {
            debug!("{}", result.summary());
        }

        let hits: Vec<SearchHit> = results.iter().map(ScoredRow::to_hit).collect();
        Ok(ToolOutput::json(&hits)?)
    }
}
