//! MCP transports.

pub mod http;
pub mod stdio;

pub use stdio::{StdioTransport, TransportError, TransportResult};
