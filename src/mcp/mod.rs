//! Model Context Protocol (MCP) server engine
//!
//! Provides a JSON-RPC 2.0 server over stdio. The transport auto-detects
//! two wire framings (raw newline-delimited JSON and LSP-style
//! Content-Length headers) because real MCP clients use either, sometimes
//! both within one session.

pub mod protocol;
pub mod registry;
pub mod server;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use registry::{Tool, ToolHandler, ToolRegistry};
pub use server::{cancel_on_signal, McpServer, ServerIdentity, PROTOCOL_VERSION};
pub use transport::{Transport, TransportError};
