//! Tool execution engine.
//!
//! The `ToolExecutor` handles running tools with input validation,
//! timeout enforcement and result capture.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, ToolError};
use crate::registry::ToolRegistry;

/// Default limit on a single tool call.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(120);

/// Result of tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether execution succeeded.
    pub success: bool,

    /// Text produced by the tool.
    pub output: String,

    /// Error message if failed.
    pub error: Option<String>,

    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Create a successful result.
    pub fn success(output: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
            duration_ms,
        }
    }

    /// Create a failed result.
    pub fn failure(error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
            duration_ms,
        }
    }

    /// Text to hand back to the client: the output, or the error message.
    pub fn text(&self) -> &str {
        self.error.as_deref().unwrap_or(&self.output)
    }
}

/// Executor for running registered tools.
///
/// The executor handles:
/// - Lookup by name
/// - Default filling and input validation against the tool spec
/// - Timeout enforcement
/// - Result capture
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,

    /// Limit on a single call.
    timeout: Duration,
}

impl ToolExecutor {
    /// Create a new tool executor over a registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The registry tools are looked up in.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute a tool with the given arguments.
    ///
    /// Unknown tools and invalid arguments are errors. A handler that fails
    /// or runs out of time produces a failed `ExecutionResult`.
    pub async fn execute(&self, name: &str, args: serde_json::Value) -> Result<ExecutionResult> {
        let handler = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let mut args = match args {
            serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
            other => other,
        };

        let spec = &handler.definition().spec;
        spec.apply_defaults(&mut args);
        spec.validate_inputs(&args).map_err(ToolError::InvalidInput)?;

        debug!("Executing tool: {name} with inputs: {args}");
        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, handler.call(args)).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(output)) => {
                info!("Tool {name} executed successfully in {duration_ms}ms");
                Ok(ExecutionResult::success(output.text, duration_ms))
            }
            Ok(Err(e)) => {
                warn!("Tool {name} failed: {e:#}");
                Ok(ExecutionResult::failure(format!("{e:#}"), duration_ms))
            }
            Err(_) => {
                warn!("Tool {name} timed out after {}s", self.timeout.as_secs());
                Ok(ExecutionResult::failure(
                    format!("tool {name} timed out after {}s", self.timeout.as_secs()),
                    duration_ms,
                ))
            }
        }
    }
}
