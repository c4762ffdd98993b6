//! Tool registry
//!
//! Holds the catalog of tools a server advertises over `tools/list` and the
//! handlers dispatched by `tools/call`. Registration happens at startup but
//! the registry is safe to share and mutate behind an `Arc`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Tool descriptor advertised in `tools/list` responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Unique tool name
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for the tool's arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Handler invoked for `tools/call`
///
/// Returns the tool's text output on success. An `Err` becomes a tool-level
/// error result, never a JSON-RPC protocol error.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: Map<String, Value>) -> Result<String>;
}

struct RegistryEntry {
    tool: Tool,
    handler: Arc<dyn ToolHandler>,
}

/// Registry of tools keyed by name
#[derive(Default)]
pub struct ToolRegistry {
    entries: RwLock<HashMap<String, RegistryEntry>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any existing tool with the same name.
    pub fn register(&self, tool: Tool, handler: Arc<dyn ToolHandler>) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(tool.name.clone(), RegistryEntry { tool, handler });
    }

    /// Snapshot of all registered tool descriptors, sorted by name
    pub fn list(&self) -> Vec<Tool> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut tools: Vec<Tool> = entries.values().map(|e| e.tool.clone()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Look up a handler by tool name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.get(name).map(|e| Arc::clone(&e.handler))
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
