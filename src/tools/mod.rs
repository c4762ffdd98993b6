//! Tool catalogs and argument translation
//!
//! Each submodule defines the tool catalog for one companion CLI and the
//! translation from MCP tool arguments to argv. Catalogs register
//! [`CliTool`] handlers that hand the built argv to a shared
//! [`CommandRunner`](crate::runner::CommandRunner).

pub mod clarification;
pub mod filesystem;
pub mod semantic;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{LlmToolsError, Result};
use crate::mcp::registry::ToolHandler;
use crate::runner::CommandRunner;

/// Builds argv for one tool from its call arguments
pub type ArgBuilder = fn(&Map<String, Value>) -> Result<Vec<String>>;

/// Tool handler backed by a companion CLI invocation
pub struct CliTool {
    runner: CommandRunner,
    build: ArgBuilder,
}

impl CliTool {
    pub fn new(runner: CommandRunner, build: ArgBuilder) -> Arc<Self> {
        Arc::new(Self { runner, build })
    }
}

#[async_trait]
impl ToolHandler for CliTool {
    async fn call(&self, args: Map<String, Value>) -> Result<String> {
        let argv = (self.build)(&args)?;
        self.runner.run(&argv).await
    }
}

// argv builder helpers, shared by the catalogs

/// Fetch a required string argument
fn require_str<'a>(args: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| LlmToolsError::InvalidArguments(format!("{key} is required")))
}

fn get_bool(args: &Map<String, Value>, key: &str) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn get_bool_or(args: &Map<String, Value>, key: &str, default: bool) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Integer argument; JSON numbers arrive as i64, u64, or f64.
fn get_int(args: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = args.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_u64().map(|v| v as i64))
        .or_else(|| value.as_f64().map(|v| v as i64))
}

fn push_str(argv: &mut Vec<String>, args: &Map<String, Value>, key: &str, flag: &str) {
    if let Some(value) = args.get(key).and_then(Value::as_str) {
        argv.push(flag.to_string());
        argv.push(value.to_string());
    }
}

fn push_int(argv: &mut Vec<String>, args: &Map<String, Value>, key: &str, flag: &str) {
    if let Some(value) = get_int(args, key) {
        argv.push(flag.to_string());
        argv.push(value.to_string());
    }
}

fn push_float(argv: &mut Vec<String>, args: &Map<String, Value>, key: &str, flag: &str) {
    if let Some(value) = args.get(key).and_then(Value::as_f64) {
        argv.push(flag.to_string());
        argv.push(value.to_string());
    }
}

/// Default-false boolean: emit the bare flag only when explicitly true.
fn push_flag(argv: &mut Vec<String>, args: &Map<String, Value>, key: &str, flag: &str) {
    if get_bool(args, key) {
        argv.push(flag.to_string());
    }
}

/// Default-true boolean: emit `flag=false` only when explicitly disabled.
fn push_negated_flag(argv: &mut Vec<String>, args: &Map<String, Value>, key: &str, flag: &str) {
    if !get_bool_or(args, key, true) {
        argv.push(format!("{flag}=false"));
    }
}

/// String array: one repeated flag per element.
fn push_str_array(argv: &mut Vec<String>, args: &Map<String, Value>, key: &str, flag: &str) {
    if let Some(items) = args.get(key).and_then(Value::as_array) {
        for item in items {
            if let Some(s) = item.as_str() {
                argv.push(flag.to_string());
                argv.push(s.to_string());
            }
        }
    }
}

/// Number array: one repeated flag per element.
fn push_int_array(argv: &mut Vec<String>, args: &Map<String, Value>, key: &str, flag: &str) {
    if let Some(items) = args.get(key).and_then(Value::as_array) {
        for item in items {
            if let Some(n) = item.as_i64().or_else(|| item.as_f64().map(|v| v as i64)) {
                argv.push(flag.to_string());
                argv.push(n.to_string());
            }
        }
    }
}

/// Structured argument forwarded as a single JSON-encoded flag value.
fn push_json(
    argv: &mut Vec<String>,
    args: &Map<String, Value>,
    key: &str,
    flag: &str,
) -> Result<()> {
    if let Some(value) = args.get(key) {
        argv.push(flag.to_string());
        argv.push(serde_json::to_string(value)?);
    }
    Ok(())
}
