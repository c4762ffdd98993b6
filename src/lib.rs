//! Core library for the llm-tools MCP servers
//!
//! Exposes the llm-tools CLI suite (llm-semantic, llm-filesystem,
//! llm-clarification) to LLM clients over the Model Context Protocol.
//! The `mcp` module implements the JSON-RPC 2.0 stdio engine; `runner`
//! executes the wrapped companion binaries; `tools` holds the per-domain
//! tool catalogs and argument translation.

pub mod error;
pub mod mcp;
pub mod runner;
pub mod tools;

pub use error::{LlmToolsError, Result};
pub use mcp::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer, Tool, ToolRegistry};
pub use runner::{CommandRunner, RunnerConfig};
