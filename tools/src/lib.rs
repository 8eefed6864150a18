//! # Tools
//!
//! The tool layer behind the MCP `tools/list` and `tools/call` methods.
//!
//! - **Specs**: typed inputs that render to a JSON Schema and validate
//!   call arguments
//! - **Handlers**: async implementations registered under a unique name
//! - **Executor**: looks up, validates and runs a handler under a timeout
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Tool Layer                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  ToolExecutor ──► ToolRegistry ──► dyn ToolHandler       │
//! │       │                                  │               │
//! │       ▼                                  ▼               │
//! │  ExecutionResult                  ToolDefinition/ToolSpec│
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod executor;
pub mod registry;
pub mod spec;
pub mod tool;

pub use error::{Result, ToolError};
pub use executor::{DEFAULT_TOOL_TIMEOUT, ExecutionResult, ToolExecutor};
pub use registry::ToolRegistry;
pub use spec::{DataType, InputConstraints, ToolInput, ToolSpec};
pub use tool::{ToolDefinition, ToolHandler, ToolOutput};
