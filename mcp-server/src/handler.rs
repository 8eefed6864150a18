//! MCP method dispatch.
//!
//! Transport-independent: transports hand raw lines or bodies to
//! [`McpHandler::handle_json`] and write back whatever response it returns.

use openvto_tools::{ToolDefinition, ToolError, ToolExecutor};
use tracing::{debug, info, warn};

use crate::protocol::{
    CallToolParams, JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    MCP_PROTOCOL_VERSION, SERVER_NAME,
};

/// Handles MCP requests against a set of registered tools.
pub struct McpHandler {
    executor: ToolExecutor,
    server_version: String,
}

impl McpHandler {
    pub fn new(executor: ToolExecutor) -> Self {
        Self {
            executor,
            server_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Decode one raw message.
    ///
    /// Malformed input becomes the error response to send back.
    pub fn parse(raw: &str) -> Result<JsonRpcRequest, Box<JsonRpcResponse>> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
            Box::new(JsonRpcResponse::failure(
                serde_json::Value::Null,
                JsonRpcError::parse_error(e),
            ))
        })?;

        let id = value.get("id").cloned().unwrap_or_default();
        let request: JsonRpcRequest = serde_json::from_value(value).map_err(|e| {
            Box::new(JsonRpcResponse::failure(
                id.clone(),
                JsonRpcError::invalid_request(e),
            ))
        })?;

        if request.jsonrpc != JSONRPC_VERSION {
            return Err(Box::new(JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_request(format!(
                    "unsupported jsonrpc version {:?}",
                    request.jsonrpc
                )),
            )));
        }

        Ok(request)
    }

    /// Handle one raw message, returning the response to send, if any.
    pub async fn handle_json(&self, raw: &str) -> Option<JsonRpcResponse> {
        match Self::parse(raw) {
            Ok(request) => self.handle(request).await,
            Err(response) => {
                warn!("Rejected message: {raw}");
                Some(*response)
            }
        }
    }

    /// Handle a decoded message. Notifications yield `None`.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            debug!("Notification: {}", request.method);
            return None;
        };

        debug!("Request {id}: {}", request.method);
        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize(request.params.as_ref())),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match result {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    fn initialize(&self, params: Option<&serde_json::Value>) -> serde_json::Value {
        let client = params
            .and_then(|params| params.get("clientInfo"))
            .and_then(|info| info.get("name"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown");
        info!("Initializing session for client {client}");

        serde_json::json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": self.server_version
            }
        })
    }

    fn list_tools(&self) -> serde_json::Value {
        let tools: Vec<serde_json::Value> = self
            .executor
            .registry()
            .definitions()
            .map(ToolDefinition::to_mcp_json)
            .collect();

        serde_json::json!({ "tools": tools })
    }

    async fn call_tool(
        &self,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("missing params"))?;
        let CallToolParams { name, arguments } =
            serde_json::from_value(params).map_err(JsonRpcError::invalid_params)?;

        info!("Calling tool {name}");
        let result = self
            .executor
            .execute(&name, arguments)
            .await
            .map_err(|e| match e {
                ToolError::NotFound(_) | ToolError::InvalidInput(_) => {
                    JsonRpcError::invalid_params(e)
                }
                other => JsonRpcError::internal(other),
            })?;

        Ok(serde_json::json!({
            "content": [
                {
                    "type": "text",
                    "text": result.text()
                }
            ],
            "isError": !result.success
        }))
    }
}
