//! MCP server for garment search and virtual try-on.
//!
//! Exposes `local_search`, `couchbase_search` and `perform_vton` to MCP
//! clients over stdio or HTTP. Which tools are registered depends on the
//! configured backends; see [`config::Availability`].

pub mod app;
pub mod cli;
pub mod config;
pub mod handler;
pub mod protocol;
pub mod tools;
pub mod transport;

pub use app::{build_handler, build_registry};
pub use cli::Cli;
pub use config::{Availability, ServerConfig, TransportKind};
pub use handler::McpHandler;
