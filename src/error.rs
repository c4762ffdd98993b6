//! Error types for the llm-tools MCP servers
//!
//! Structured error definitions via thiserror; binaries use anyhow at the
//! top level for context-rich startup failures.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for llm-tools-mcp operations
#[derive(Error, Debug)]
pub enum LlmToolsError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport-level failure
    #[error("transport error: {0}")]
    Transport(#[from] crate::mcp::transport::TransportError),

    /// Companion binary could not be located
    #[error("binary not found: {0}")]
    BinaryNotFound(PathBuf),

    /// Command ran past its configured deadline
    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    /// Command exited nonzero without producing any output
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// Tool arguments did not match the tool's contract
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for llm-tools-mcp operations
pub type Result<T> = std::result::Result<T, LlmToolsError>;
