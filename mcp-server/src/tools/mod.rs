//! The MCP tools this server exposes.

pub mod couchbase_search;
pub mod local_search;
pub mod perform_vton;

pub use couchbase_search::CouchbaseSearchTool;
pub use local_search::LocalSearchTool;
pub use perform_vton::PerformVtonTool;

use openvto_tools::{DataType, InputConstraints, ToolInput};
use serde::Deserialize;

/// Default number of search results.
pub const DEFAULT_K: u64 = 5;

const QUERY_DESCRIPTION: &str = "The refined query of the user. If it's something like Blue Jeans, ask the user for more detail and refine the query so that a more richer embedding can be used to perform a semantic search.";

const K_DESCRIPTION: &str = "The top-k results to fetch from semantic search (default: 5).";

/// Arguments shared by the search tools.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    #[serde(default = "default_k")]
    pub k: u64,
}

fn default_k() -> u64 {
    DEFAULT_K
}

fn query_input() -> ToolInput {
    ToolInput::required("query", DataType::String, QUERY_DESCRIPTION)
        .with_constraints(InputConstraints::non_empty())
}

fn k_input(min: f64) -> ToolInput {
    ToolInput::optional("k", DataType::Integer, K_DESCRIPTION)
        .with_default(DEFAULT_K)
        .with_constraints(InputConstraints::at_least(min))
}
