//! MCP server loop and method routing
//!
//! Routes `initialize`, `tools/list`, and `tools/call` over a
//! [`Transport`](super::transport::Transport). Tool failures are reported as
//! successful JSON-RPC responses carrying `isError: true` in the result;
//! only unknown methods and malformed input produce JSON-RPC errors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use super::registry::ToolRegistry;
use super::transport::{Transport, TransportError};

/// MCP protocol revision implemented by this server
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Identity advertised in the `initialize` response
#[derive(Debug, Clone)]
pub struct ServerIdentity {
    pub name: String,
    pub version: String,
    /// Optional usage instructions surfaced to the client
    pub instructions: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct InitializeParams {
    #[serde(rename = "protocolVersion", default)]
    protocol_version: String,
}

#[derive(Debug, Deserialize, Default)]
struct ToolCallParams {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: Map<String, Value>,
}

/// One text block in a tool result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// Result payload of `tools/call`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<TextContent>,
    #[serde(
        rename = "isError",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_error: bool,
}

impl ToolCallResult {
    fn text(text: impl Into<String>, is_error: bool) -> Self {
        Self {
            content: vec![TextContent {
                content_type: "text".to_string(),
                text: text.into(),
            }],
            is_error,
        }
    }
}

/// MCP server over a transport
pub struct McpServer<R, W> {
    transport: Transport<R, W>,
    registry: Arc<ToolRegistry>,
    identity: ServerIdentity,
}

impl<R, W> McpServer<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a server over the given transport
    pub fn new(transport: Transport<R, W>, registry: Arc<ToolRegistry>, identity: ServerIdentity) -> Self {
        Self {
            transport,
            registry,
            identity,
        }
    }

    /// Run the read/dispatch/write loop until end of stream or cancellation
    pub async fn serve(&mut self, cancel: CancellationToken) -> crate::Result<()> {
        info!(
            server = %self.identity.name,
            tools = self.registry.len(),
            "MCP server started"
        );

        loop {
            if cancel.is_cancelled() {
                info!("shutdown requested, stopping server loop");
                return Ok(());
            }

            let request = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("shutdown requested, stopping server loop");
                    return Ok(());
                }
                result = self.transport.read_request() => result,
            };

            match request {
                Ok(request) => {
                    if let Err(e) = self.dispatch(request).await {
                        error!(error = %e, "failed to write response");
                        return Err(e);
                    }
                }
                Err(TransportError::Eof) => {
                    info!("input stream closed, shutting down");
                    return Ok(());
                }
                Err(TransportError::Rpc { code, message }) => {
                    // Malformed input gets a null-id error response; the
                    // stream itself stays usable.
                    warn!(code, %message, "rejecting malformed request");
                    self.transport.write_error(None, code, message).await?;
                }
                Err(TransportError::Io(e)) => {
                    error!(error = %e, "transport read failed");
                    return Err(e.into());
                }
            }
        }
    }

    /// Read and answer exactly one message; end of stream is a no-op.
    pub async fn handle_one(&mut self) -> crate::Result<()> {
        match self.transport.read_request().await {
            Ok(request) => self.dispatch(request).await,
            Err(TransportError::Eof) => Ok(()),
            Err(TransportError::Rpc { code, message }) => {
                self.transport.write_error(None, code, message).await?;
                Ok(())
            }
            Err(TransportError::Io(e)) => Err(e.into()),
        }
    }

    async fn dispatch(&mut self, request: JsonRpcRequest) -> crate::Result<()> {
        debug!(method = %request.method, id = ?request.id, "dispatching request");

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(&request),
            "initialized" => {
                // Lifecycle acknowledgement; never answered.
                debug!("client initialization complete");
                return Ok(());
            }
            "tools/list" => self.handle_tools_list(&request),
            "tools/call" => self.handle_tools_call(&request).await,
            other => JsonRpcResponse::error(
                request.id.clone(),
                JsonRpcError::method_not_found(other),
            ),
        };

        // Notifications produce no output even when routing succeeded.
        if request.is_notification() && response.error.is_none() {
            return Ok(());
        }

        self.transport.write_response(&response).await?;
        Ok(())
    }

    fn handle_initialize(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let params: InitializeParams = match parse_params(&request.params) {
            Ok(p) => p,
            Err(e) => return JsonRpcResponse::error(request.id.clone(), e),
        };

        if !params.protocol_version.is_empty() && params.protocol_version != PROTOCOL_VERSION {
            debug!(
                client = %params.protocol_version,
                server = PROTOCOL_VERSION,
                "client requested a different protocol version"
            );
        }

        let mut result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.identity.name,
                "version": self.identity.version,
            },
        });
        if let Some(instructions) = &self.identity.instructions {
            result["instructions"] = json!(instructions);
        }

        JsonRpcResponse::success(request.id.clone(), result)
    }

    fn handle_tools_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let tools = self.registry.list();
        JsonRpcResponse::success(request.id.clone(), json!({ "tools": tools }))
    }

    async fn handle_tools_call(&mut self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let params: ToolCallParams = match parse_params(&request.params) {
            Ok(p) => p,
            Err(e) => return JsonRpcResponse::error(request.id.clone(), e),
        };

        let result = match self.registry.get(&params.name) {
            Some(handler) => {
                debug!(tool = %params.name, "invoking tool");
                match handler.call(params.arguments).await {
                    Ok(output) => ToolCallResult::text(output, false),
                    Err(e) => {
                        warn!(tool = %params.name, error = %e, "tool returned an error");
                        ToolCallResult::text(format!("Error: {e}"), true)
                    }
                }
            }
            None => ToolCallResult::text(format!("Tool not found: {}", params.name), true),
        };

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
            Err(e) => JsonRpcResponse::error(
                request.id.clone(),
                JsonRpcError::internal_error(format!("failed to encode tool result: {e}")),
            ),
        }
    }
}

/// Deserialize method params, treating absent params as defaults.
fn parse_params<T: for<'de> Deserialize<'de> + Default>(
    params: &Value,
) -> Result<T, JsonRpcError> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params.clone())
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {e}")))
}

/// Cancel the token when the process receives SIGINT or SIGTERM.
pub fn cancel_on_signal(cancel: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    error!(error = %e, "failed to install SIGTERM handler");
                    let _ = tokio::signal::ctrl_c().await;
                    cancel.cancel();
                    return;
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("received interrupt"),
                _ = sigterm.recv() => info!("received SIGTERM"),
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            info!("received interrupt");
        }
        cancel.cancel();
    });
}
