//! llm-semantic-mcp - MCP Server Binary
//!
//! Exposes the llm-semantic CLI to MCP clients over stdio.
//!
//! Usage:
//!   llm-semantic-mcp [OPTIONS]
//!
//! Examples:
//!   llm-semantic-mcp                                  # llm-semantic from PATH
//!   llm-semantic-mcp --binary /opt/bin/llm-semantic   # Explicit binary path
//!   llm-semantic-mcp --timeout 300                    # Longer indexing deadline

use anyhow::{Context, Result};
use clap::Parser;
use llm_tools_mcp::mcp::{cancel_on_signal, McpServer, ServerIdentity, ToolRegistry, Transport};
use llm_tools_mcp::runner::{CommandRunner, RunnerConfig};
use llm_tools_mcp::tools::semantic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// llm-semantic-mcp command-line arguments
#[derive(Parser)]
#[command(name = "llm-semantic-mcp")]
#[command(about = "MCP server for llm-semantic code search")]
#[command(version)]
struct Args {
    /// Path to the llm-semantic binary (defaults to PATH lookup)
    #[arg(long, env = "LLM_SEMANTIC_BIN")]
    binary: Option<PathBuf>,

    /// Command timeout in seconds
    #[arg(long, default_value_t = semantic::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the JSON-RPC stream.
    let log_level = args.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting llm-semantic MCP server");

    let config = RunnerConfig::resolve(
        "llm-semantic",
        args.binary,
        Duration::from_secs(args.timeout),
    )
    .context("Failed to locate llm-semantic binary")?
    .with_extra_args(["--json".to_string()]);

    info!("Using binary: {}", config.binary.display());

    let runner = CommandRunner::new(config);
    let registry = Arc::new(ToolRegistry::new());
    semantic::register(&registry, &runner);

    let identity = ServerIdentity {
        name: "llm-semantic".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        instructions: Some(
            "Semantic code search over a local embedding index. Build the index with \
             llm_semantic_index, keep it fresh with llm_semantic_update, then query with \
             llm_semantic_search."
                .to_string(),
        ),
    };

    let cancel = CancellationToken::new();
    cancel_on_signal(cancel.clone());

    let mut server = McpServer::new(Transport::stdio(), registry, identity);
    server.serve(cancel).await.context("MCP server failed")?;

    Ok(())
}
