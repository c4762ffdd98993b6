//! Companion binary execution
//!
//! Each MCP server wraps one CLI binary (llm-semantic, llm-filesystem, or
//! llm-clarification). Tool calls are translated into argv and executed
//! here with a hard deadline. Stdout and stderr are captured together so
//! diagnostic output from the CLI reaches the client.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{LlmToolsError, Result};

/// Resolved configuration for running a companion binary
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Absolute path to the binary
    pub binary: PathBuf,

    /// Arguments appended to every invocation, after the tool arguments
    pub extra_args: Vec<String>,

    /// Deadline for a single invocation
    pub timeout: Duration,
}

impl RunnerConfig {
    /// Locate the companion binary
    ///
    /// An explicit override wins; otherwise the binary is looked up on PATH
    /// and then under /usr/local/bin as a last resort.
    pub fn resolve(
        name: &str,
        override_path: Option<PathBuf>,
        timeout: Duration,
    ) -> Result<Self> {
        let binary = match override_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(LlmToolsError::BinaryNotFound(path));
                }
                path
            }
            None => match which::which(name) {
                Ok(path) => path,
                Err(_) => {
                    let fallback = PathBuf::from("/usr/local/bin").join(name);
                    if fallback.is_file() {
                        fallback
                    } else {
                        return Err(LlmToolsError::BinaryNotFound(PathBuf::from(name)));
                    }
                }
            },
        };

        debug!(binary = %binary.display(), "resolved companion binary");
        Ok(Self {
            binary,
            extra_args: Vec::new(),
            timeout,
        })
    }

    /// Append arguments to every invocation
    pub fn with_extra_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.extra_args.extend(args);
        self
    }
}

/// Executes the companion binary for tool calls
#[derive(Debug, Clone)]
pub struct CommandRunner {
    config: RunnerConfig,
}

impl CommandRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run the binary with the given arguments and return its combined output
    ///
    /// A nonzero exit that still produced output is treated as success so
    /// that the CLI's own error reporting (JSON error payloads, usage text)
    /// reaches the client verbatim. A nonzero exit with no output at all is
    /// a failure, as is exceeding the deadline.
    pub async fn run(&self, args: &[String]) -> Result<String> {
        let mut argv: Vec<&str> = args.iter().map(String::as_str).collect();
        argv.extend(self.config.extra_args.iter().map(String::as_str));

        debug!(
            binary = %self.config.binary.display(),
            args = ?argv,
            "executing companion binary"
        );

        let child = Command::new(&self.config.binary)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
        {
            Ok(output) => output?,
            Err(_) => {
                warn!(
                    binary = %self.config.binary.display(),
                    timeout = ?self.config.timeout,
                    "companion binary timed out"
                );
                return Err(LlmToolsError::Timeout(self.config.timeout));
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let combined = combined.trim().to_string();

        if !output.status.success() && combined.is_empty() {
            return Err(LlmToolsError::CommandFailed(format!(
                "{} exited with {}",
                self.config.binary.display(),
                output.status
            )));
        }

        Ok(combined)
    }
}
