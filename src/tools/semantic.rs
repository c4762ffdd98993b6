//! Tool catalog for the llm-semantic CLI

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::mcp::registry::{Tool, ToolRegistry};
use crate::runner::CommandRunner;

use super::{push_flag, push_float, push_int, push_str, push_str_array, require_str, CliTool};

/// Prefix for all llm-semantic tool names
pub const TOOL_PREFIX: &str = "llm_semantic_";

/// Default deadline for semantic commands; indexing can be slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Register the semantic tool catalog
pub fn register(registry: &ToolRegistry, runner: &CommandRunner) {
    let catalog: &[(&str, &str, Value, super::ArgBuilder)] = &[
        (
            "search",
            "Search code using natural language queries. Returns semantically similar code chunks ranked by relevance.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Natural language search query (e.g., 'authentication middleware' or 'database connection handling')"
                    },
                    "top_k": {
                        "type": "integer",
                        "description": "Maximum number of results to return (default: 10)"
                    },
                    "threshold": {
                        "type": "number",
                        "description": "Minimum similarity score 0.0-1.0 (default: 0.0)"
                    },
                    "type": {
                        "type": "string",
                        "enum": ["function", "method", "struct", "interface", "file"],
                        "description": "Filter results by chunk type"
                    },
                    "path": {
                        "type": "string",
                        "description": "Filter results by path prefix"
                    },
                    "min": {
                        "type": "boolean",
                        "description": "Minimal output - only file, name, line, score"
                    }
                },
                "required": ["query"]
            }),
            build_search,
        ),
        (
            "status",
            "Show semantic index status including file count, chunk count, and last update time.",
            json!({
                "type": "object",
                "properties": {}
            }),
            build_status,
        ),
        (
            "index",
            "Build or rebuild the semantic code index for a directory. Parses code files and generates embeddings.",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Directory path to index (default: current directory)"
                    },
                    "include": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Glob patterns to include (e.g., ['*.go', '*.py'])"
                    },
                    "exclude": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Directories to exclude (default: ['vendor', 'node_modules', '.git'])"
                    },
                    "force": {
                        "type": "boolean",
                        "description": "Force re-index all files even if unchanged"
                    }
                }
            }),
            build_index,
        ),
        (
            "update",
            "Incrementally update the semantic index with changed files since last indexing.",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Directory path to update (default: current directory)"
                    },
                    "include": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Glob patterns to include"
                    },
                    "exclude": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Directories to exclude"
                    }
                }
            }),
            build_update,
        ),
    ];

    for (name, description, schema, build) in catalog {
        registry.register(
            Tool {
                name: format!("{TOOL_PREFIX}{name}"),
                description: (*description).to_string(),
                input_schema: schema.clone(),
            },
            CliTool::new(runner.clone(), *build),
        );
    }
}

fn build_search(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["search".to_string()];
    argv.push("--query".to_string());
    argv.push(require_str(args, "query")?.to_string());
    push_int(&mut argv, args, "top_k", "--top-k");
    push_float(&mut argv, args, "threshold", "--threshold");
    push_str(&mut argv, args, "type", "--type");
    push_str(&mut argv, args, "path", "--path");
    push_flag(&mut argv, args, "min", "--min");
    Ok(argv)
}

fn build_status(_args: &Map<String, Value>) -> Result<Vec<String>> {
    Ok(vec!["status".to_string()])
}

fn build_index(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["index".to_string()];
    push_str(&mut argv, args, "path", "--path");
    push_str_array(&mut argv, args, "include", "--include");
    push_str_array(&mut argv, args, "exclude", "--exclude");
    push_flag(&mut argv, args, "force", "--force");
    Ok(argv)
}

fn build_update(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["update".to_string()];
    push_str(&mut argv, args, "path", "--path");
    push_str_array(&mut argv, args, "include", "--include");
    push_str_array(&mut argv, args, "exclude", "--exclude");
    Ok(argv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_search_requires_query() {
        assert!(build_search(&args(json!({}))).is_err());
    }

    #[test]
    fn test_search_full_argv() {
        let argv = build_search(&args(json!({
            "query": "auth middleware",
            "top_k": 5,
            "threshold": 0.4,
            "type": "function",
            "path": "internal/",
            "min": true
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "search",
                "--query",
                "auth middleware",
                "--top-k",
                "5",
                "--threshold",
                "0.4",
                "--type",
                "function",
                "--path",
                "internal/",
                "--min"
            ]
        );
    }

    #[test]
    fn test_index_with_patterns() {
        let argv = build_index(&args(json!({
            "path": ".",
            "include": ["*.rs"],
            "exclude": ["target"],
            "force": true
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "index", "--path", ".", "--include", "*.rs", "--exclude", "target", "--force"
            ]
        );
    }

    #[test]
    fn test_update_minimal() {
        assert_eq!(build_update(&args(json!({}))).unwrap(), vec!["update"]);
    }

    #[test]
    fn test_catalog_names_carry_prefix() {
        let registry = ToolRegistry::new();
        let runner = CommandRunner::new(crate::runner::RunnerConfig {
            binary: "/usr/local/bin/llm-semantic".into(),
            extra_args: vec!["--json".to_string()],
            timeout: std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        });
        register(&registry, &runner);

        let names: Vec<String> = registry.list().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "llm_semantic_index",
                "llm_semantic_search",
                "llm_semantic_status",
                "llm_semantic_update"
            ]
        );
    }
}
