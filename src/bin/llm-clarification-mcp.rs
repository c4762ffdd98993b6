//! llm-clarification-mcp - MCP Server Binary
//!
//! Exposes the llm-clarification CLI to MCP clients over stdio.
//!
//! Usage:
//!   llm-clarification-mcp [OPTIONS]
//!
//! Examples:
//!   llm-clarification-mcp                                       # llm-clarification from PATH
//!   llm-clarification-mcp --binary /opt/bin/llm-clarification   # Explicit binary path
//!   llm-clarification-mcp --timeout 60                          # Shorter API deadline

use anyhow::{Context, Result};
use clap::Parser;
use llm_tools_mcp::mcp::{cancel_on_signal, McpServer, ServerIdentity, ToolRegistry, Transport};
use llm_tools_mcp::runner::{CommandRunner, RunnerConfig};
use llm_tools_mcp::tools::clarification;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// llm-clarification-mcp command-line arguments
#[derive(Parser)]
#[command(name = "llm-clarification-mcp")]
#[command(about = "MCP server for llm-clarification tracking")]
#[command(version)]
struct Args {
    /// Path to the llm-clarification binary (defaults to PATH lookup)
    #[arg(long, env = "LLM_CLARIFICATION_BIN")]
    binary: Option<PathBuf>,

    /// Command timeout in seconds
    #[arg(long, default_value_t = clarification::DEFAULT_TIMEOUT_SECS)]
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

    info!("Starting llm-clarification MCP server");

    let config = RunnerConfig::resolve(
        "llm-clarification",
        args.binary,
        Duration::from_secs(args.timeout),
    )
    .context("Failed to locate llm-clarification binary")?
    .with_extra_args(["--json".to_string(), "--min".to_string()]);

    info!("Using binary: {}", config.binary.display());

    let runner = CommandRunner::new(config);
    let registry = Arc::new(ToolRegistry::new());
    clarification::register(&registry, &runner);

    let identity = ServerIdentity {
        name: "llm-clarification".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        instructions: Some(
            "Track project clarifications in a YAML file. Use llm_clarify_add to record \
             decisions, llm_clarify_match to check whether a question was asked before, \
             and llm_clarify_promote to move settled answers into CLAUDE.md."
                .to_string(),
        ),
    };

    let cancel = CancellationToken::new();
    cancel_on_signal(cancel.clone());

    let mut server = McpServer::new(Transport::stdio(), registry, identity);
    server.serve(cancel).await.context("MCP server failed")?;

    Ok(())
}
