//! Stdio transport.
//!
//! Reads newline-delimited JSON-RPC messages from stdin and writes one line
//! per response to stdout. Logs go to stderr so they never mix with
//! protocol output.

use std::io;
use std::sync::Arc;

use serde::Serialize;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, Stdin, Stdout,
};
use tracing::{info, trace, warn};

use crate::handler::McpHandler;
use crate::protocol::{JsonRpcError, JsonRpcResponse};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line that is not valid UTF-8. The line is consumed.
    #[error("invalid UTF-8 in message: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Line-oriented JSON transport over a reader/writer pair.
pub struct StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    reader: R,
    writer: BufWriter<W>,
}

impl StdioTransport<BufReader<Stdin>, Stdout> {
    /// Create a transport on the process stdin/stdout.
    pub fn new() -> Self {
        Self::from_handles(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl Default for StdioTransport<BufReader<Stdin>, Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a transport from custom reader/writer handles.
    pub fn from_handles(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer: BufWriter::new(writer),
        }
    }

    /// Read the next non-empty line.
    ///
    /// Returns `Ok(None)` at EOF and [`TransportError::Utf8`] for a line that
    /// is not valid UTF-8; reading can continue after either error.
    pub async fn read_raw_message(&mut self) -> TransportResult<Option<String>> {
        loop {
            let mut buf = Vec::new();
            let bytes_read = self.reader.read_until(b'\n', &mut buf).await?;

            if bytes_read == 0 {
                trace!("EOF reached on transport input");
                return Ok(None);
            }

            let line = String::from_utf8(buf)?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            trace!(message = %trimmed, "Received message");
            return Ok(Some(trimmed.to_string()));
        }
    }

    /// Write a message as one line of JSON and flush.
    pub async fn write_message<T>(&mut self, message: &T) -> TransportResult<()>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(message)?;
        trace!(message = %json, "Sending message");

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }

    /// Serve requests one at a time until the input closes.
    pub async fn serve(&mut self, handler: &McpHandler) -> TransportResult<()> {
        loop {
            let line = match self.read_raw_message().await {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(()),
                Err(TransportError::Utf8(e)) => {
                    warn!("Rejected message: {e}");
                    let response =
                        JsonRpcResponse::failure(serde_json::Value::Null, JsonRpcError::parse_error(e));
                    self.write_message(&response).await?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(response) = handler.handle_json(&line).await {
                self.write_message(&response).await?;
            }
        }
    }

    /// Consume the transport, returning the underlying writer.
    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }
}

/// Serve MCP on the process stdin/stdout.
pub async fn run(handler: Arc<McpHandler>) -> TransportResult<()> {
    info!("Serving MCP over stdio");
    StdioTransport::new().serve(&handler).await?;
    info!("Stdin closed, shutting down");
    Ok(())
}
