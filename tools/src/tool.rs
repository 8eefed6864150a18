//! Core tool types and the handler trait.
//!
//! A tool is a named, described capability with a typed input spec and an
//! async handler that produces text for the client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::spec::{ToolInput, ToolSpec};

/// The advertised interface of a tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,

    /// Description shown to the model.
    pub description: String,

    /// Tool specification (inputs).
    pub spec: ToolSpec,
}

impl ToolDefinition {
    /// Create a definition with no inputs.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            spec: ToolSpec::default(),
        }
    }

    /// Set the tool specification.
    pub fn with_spec(mut self, spec: ToolSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Add an input parameter.
    pub fn with_input(mut self, input: ToolInput) -> Self {
        self.spec.inputs.push(input);
        self
    }

    /// JSON Schema of the tool arguments.
    pub fn input_schema(&self) -> serde_json::Value {
        self.spec.generate_schema()
    }

    /// Entry for an MCP `tools/list` response.
    pub fn to_mcp_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema()
        })
    }
}

/// Text produced by a tool call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub text: String,
}

impl ToolOutput {
    /// Output carrying plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Output carrying a pretty-printed JSON document.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        Ok(Self {
            text: serde_json::to_string_pretty(value)?,
        })
    }
}

/// An executable tool.
///
/// Arguments reach `call` already validated against the definition's spec,
/// with defaults filled in.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The advertised definition.
    fn definition(&self) -> &ToolDefinition;

    /// Run the tool.
    async fn call(&self, args: serde_json::Value) -> anyhow::Result<ToolOutput>;

    /// Tool name.
    fn name(&self) -> &str {
        &self.definition().name
    }
}
