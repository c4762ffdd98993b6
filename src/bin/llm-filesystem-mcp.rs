//! llm-filesystem-mcp - MCP Server Binary
//!
//! Exposes the llm-filesystem CLI to MCP clients over stdio.
//!
//! Usage:
//!   llm-filesystem-mcp [OPTIONS]
//!
//! Examples:
//!   llm-filesystem-mcp                                      # llm-filesystem from PATH
//!   llm-filesystem-mcp --allowed-dirs /home/me,/tmp/work    # Restrict file access
//!   llm-filesystem-mcp --binary /opt/bin/llm-filesystem     # Explicit binary path

use anyhow::{Context, Result};
use clap::Parser;
use llm_tools_mcp::mcp::{cancel_on_signal, McpServer, ServerIdentity, ToolRegistry, Transport};
use llm_tools_mcp::runner::{CommandRunner, RunnerConfig};
use llm_tools_mcp::tools::filesystem;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// llm-filesystem-mcp command-line arguments
#[derive(Parser)]
#[command(name = "llm-filesystem-mcp")]
#[command(about = "MCP server for llm-filesystem file operations")]
#[command(version)]
struct Args {
    /// Path to the llm-filesystem binary (defaults to PATH lookup)
    #[arg(long, env = "LLM_FILESYSTEM_BIN")]
    binary: Option<PathBuf>,

    /// Comma-separated directories the CLI may access
    #[arg(long, env = "LLM_FILESYSTEM_ALLOWED_DIRS", value_delimiter = ',')]
    allowed_dirs: Vec<String>,

    /// Command timeout in seconds
    #[arg(long, default_value_t = filesystem::DEFAULT_TIMEOUT_SECS)]
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

    info!("Starting llm-filesystem MCP server");

    // Allowed directories ride along on every invocation so the CLI can
    // enforce its own path validation.
    let mut extra_args = vec!["--json".to_string()];
    for dir in &args.allowed_dirs {
        let dir = dir.trim();
        if !dir.is_empty() {
            extra_args.push("--allowed-dirs".to_string());
            extra_args.push(dir.to_string());
        }
    }

    let config = RunnerConfig::resolve(
        "llm-filesystem",
        args.binary,
        Duration::from_secs(args.timeout),
    )
    .context("Failed to locate llm-filesystem binary")?
    .with_extra_args(extra_args);

    info!("Using binary: {}", config.binary.display());
    if !args.allowed_dirs.is_empty() {
        info!("Allowed directories: {}", args.allowed_dirs.join(", "));
    }

    let runner = CommandRunner::new(config);
    let registry = Arc::new(ToolRegistry::new());
    filesystem::register(&registry, &runner);

    let identity = ServerIdentity {
        name: "llm-filesystem".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        instructions: Some(
            "Fast file operations: read, write, edit, search, and manage files and \
             directories. Prefer fast_edit_block for targeted edits and fast_search_code \
             for content search."
                .to_string(),
        ),
    };

    let cancel = CancellationToken::new();
    cancel_on_signal(cancel.clone());

    let mut server = McpServer::new(Transport::stdio(), registry, identity);
    server.serve(cancel).await.context("MCP server failed")?;

    Ok(())
}
