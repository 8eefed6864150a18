//! HTTP transport.
//!
//! Each `POST /mcp` carries one JSON-RPC message. Requests are answered with
//! the JSON response; notifications with `202 Accepted` and no body. The
//! `initialize` response carries a fresh `Mcp-Session-Id` that clients echo
//! on later requests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use tokio::net::TcpListener;
use tracing::{Instrument, info, info_span, warn};

use crate::handler::McpHandler;

/// Header carrying the session identifier.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Router serving MCP on `/mcp`.
pub fn router(handler: Arc<McpHandler>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp))
        .with_state(handler)
}

/// Serve MCP over HTTP until interrupted.
pub async fn serve(handler: Arc<McpHandler>, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Serving MCP over HTTP at http://{}/mcp", listener.local_addr()?);

    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP transport stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}

async fn handle_mcp(
    State(handler): State<Arc<McpHandler>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let request = match McpHandler::parse(&body) {
        Ok(request) => request,
        Err(response) => {
            warn!("Rejected message: {body}");
            return Json(*response).into_response();
        }
    };

    let is_initialize = request.method == "initialize";
    let session_id = if is_initialize {
        uuid::Uuid::new_v4().to_string()
    } else {
        headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("none")
            .to_string()
    };

    let span = info_span!("mcp", session = %session_id);
    let Some(response) = handler.handle(request).instrument(span).await else {
        return StatusCode::ACCEPTED.into_response();
    };

    let mut response = Json(response).into_response();
    if is_initialize {
        match HeaderValue::from_str(&session_id) {
            Ok(value) => {
                response.headers_mut().insert(SESSION_HEADER, value);
            }
            Err(e) => warn!("Invalid session id {session_id}: {e}"),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use openvto_tools::{ToolExecutor, ToolRegistry};
    use pretty_assertions::assert_eq;

    async fn spawn_server() -> String {
        let handler = Arc::new(McpHandler::new(ToolExecutor::new(Arc::new(
            ToolRegistry::new(),
        ))));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(handler)).await.unwrap();
        });
        format!("http://{addr}/mcp")
    }

    #[tokio::test]
    async fn test_initialize_assigns_session() {
        let url = spawn_server().await;
        let response = reqwest::Client::new()
            .post(&url)
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {}
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let session = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .unwrap();
        assert!(uuid::Uuid::parse_str(&session).is_ok());

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
    }

    #[tokio::test]
    async fn test_notification_is_accepted() {
        let url = spawn_server().await;
        let response = reqwest::Client::new()
            .post(&url)
            .header(SESSION_HEADER, "abc")
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "method": "notifications/initialized"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
        assert_eq!(response.text().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_parse_error() {
        let url = spawn_server().await;
        let response = reqwest::Client::new()
            .post(&url)
            .body("{oops")
            .send()
            .await
            .unwrap();

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"]["code"], -32700);
        assert_eq!(body["id"], serde_json::Value::Null);
    }
}
