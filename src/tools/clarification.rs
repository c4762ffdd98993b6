//! Tool catalog for the llm-clarification CLI
//!
//! Flag mapping notes: `entries_file` and `tracking_file` both map to the
//! CLI's `--file` flag, `sprint_id` maps to `--sprint`, and the
//! comma-separated `context_tags` value expands into repeated `--tag` flags.

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::mcp::registry::{Tool, ToolRegistry};
use crate::runner::CommandRunner;

use super::{push_flag, push_int, push_str, require_str, CliTool};

/// Prefix for all llm-clarification tool names
pub const TOOL_PREFIX: &str = "llm_clarify_";

/// Default deadline for clarification commands; several call out to an LLM API.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Register the clarification tool catalog
pub fn register(registry: &ToolRegistry, runner: &CommandRunner) {
    let catalog: &[(&str, &str, Value, super::ArgBuilder)] = &[
        (
            "match",
            "Match a new question against existing clarification entries using LLM semantic matching. Returns match ID, confidence score (0-1), and reasoning. Use this to find if a question has been asked before. REQUIRES: OpenAI-compatible API configured via env vars or .planning/.config/openai_* files.",
            json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "The new question to match against existing entries"
                    },
                    "entries_file": {
                        "type": "string",
                        "description": "Path to YAML file containing existing clarification entries"
                    },
                    "entries_json": {
                        "type": "string",
                        "description": "JSON string of existing entries (alternative to entries_file)"
                    },
                    "timeout": {
                        "type": "integer",
                        "description": "API timeout in seconds (default: 30)"
                    }
                },
                "required": ["question"]
            }),
            build_match,
        ),
        (
            "cluster",
            "Group semantically similar questions into clusters. Useful for identifying duplicate or related clarifications across sprints. Returns clusters with labels and question lists. REQUIRES: OpenAI-compatible API configured.",
            json!({
                "type": "object",
                "properties": {
                    "questions_file": {
                        "type": "string",
                        "description": "File containing questions (YAML tracking file or plain text, one per line)"
                    },
                    "questions_json": {
                        "type": "string",
                        "description": "JSON array of questions (alternative to questions_file)"
                    },
                    "timeout": {
                        "type": "integer",
                        "description": "API timeout in seconds (default: 30)"
                    }
                }
            }),
            build_cluster,
        ),
        (
            "detect_conflicts",
            "Find clarification entries with conflicting answers. Analyzes entries that may ask the same underlying question but have different answers. Returns conflicts with severity and resolution suggestions. REQUIRES: OpenAI-compatible API configured.",
            json!({
                "type": "object",
                "properties": {
                    "tracking_file": {
                        "type": "string",
                        "description": "Path to clarification-tracking.yaml file"
                    },
                    "timeout": {
                        "type": "integer",
                        "description": "API timeout in seconds (default: 30)"
                    }
                },
                "required": ["tracking_file"]
            }),
            build_detect_conflicts,
        ),
        (
            "validate",
            "Validate clarifications against current project state. Flags entries that may be stale, outdated, or need review based on project context and last-seen dates. REQUIRES: OpenAI-compatible API configured.",
            json!({
                "type": "object",
                "properties": {
                    "tracking_file": {
                        "type": "string",
                        "description": "Path to clarification-tracking.yaml file"
                    },
                    "context": {
                        "type": "string",
                        "description": "Project context description (auto-detected from package.json etc. if not provided)"
                    },
                    "timeout": {
                        "type": "integer",
                        "description": "API timeout in seconds (default: 30)"
                    }
                },
                "required": ["tracking_file"]
            }),
            build_validate,
        ),
        (
            "init",
            "Initialize a new clarification tracking file with proper schema. Creates the file at the specified path. Use before starting clarification tracking for a project.",
            json!({
                "type": "object",
                "properties": {
                    "output": {
                        "type": "string",
                        "description": "Output file path (e.g., .planning/.config/clarification-tracking.yaml)"
                    },
                    "force": {
                        "type": "boolean",
                        "description": "Overwrite if file already exists"
                    }
                },
                "required": ["output"]
            }),
            build_init,
        ),
        (
            "add",
            "Add or update a clarification entry in the tracking file. If a matching entry exists (by ID or simple match), updates it with incremented occurrence count. Otherwise creates a new entry with auto-generated ID. Handles all YAML serialization internally.",
            json!({
                "type": "object",
                "properties": {
                    "tracking_file": {
                        "type": "string",
                        "description": "Path to tracking YAML file"
                    },
                    "question": {
                        "type": "string",
                        "description": "The clarification question"
                    },
                    "answer": {
                        "type": "string",
                        "description": "The answer/decision"
                    },
                    "id": {
                        "type": "string",
                        "description": "Entry ID (auto-generated if not provided)"
                    },
                    "sprint_id": {
                        "type": "string",
                        "description": "Sprint ID where this was asked"
                    },
                    "context_tags": {
                        "type": "string",
                        "description": "Comma-separated context tags (e.g., 'frontend,testing')"
                    },
                    "check_match": {
                        "type": "boolean",
                        "description": "Check for existing match before creating new entry"
                    }
                },
                "required": ["tracking_file", "question"]
            }),
            build_add,
        ),
        (
            "promote",
            "Promote a clarification entry to CLAUDE.md. Updates entry status to 'promoted' and appends the clarification to the target CLAUDE.md file under a 'Learned Clarifications' section, organized by category based on context_tags.",
            json!({
                "type": "object",
                "properties": {
                    "tracking_file": {
                        "type": "string",
                        "description": "Path to tracking YAML file"
                    },
                    "id": {
                        "type": "string",
                        "description": "Entry ID to promote"
                    },
                    "target": {
                        "type": "string",
                        "description": "Target CLAUDE.md file (e.g., CLAUDE.md, apps/web/CLAUDE.md)"
                    },
                    "force": {
                        "type": "boolean",
                        "description": "Re-promote if already promoted"
                    }
                },
                "required": ["tracking_file", "id", "target"]
            }),
            build_promote,
        ),
        (
            "list",
            "List entries in the tracking file with optional filtering by status or minimum occurrence count. Useful for reviewing what clarifications exist and identifying promotion candidates.",
            json!({
                "type": "object",
                "properties": {
                    "tracking_file": {
                        "type": "string",
                        "description": "Path to tracking YAML file"
                    },
                    "status": {
                        "type": "string",
                        "enum": ["pending", "promoted", "expired", "rejected"],
                        "description": "Filter by status"
                    },
                    "min_occurrences": {
                        "type": "integer",
                        "description": "Minimum occurrences to show (useful for finding promotion candidates)"
                    }
                },
                "required": ["tracking_file"]
            }),
            build_list,
        ),
        (
            "delete",
            "Delete a clarification entry from the tracking file by ID.",
            json!({
                "type": "object",
                "properties": {
                    "tracking_file": {
                        "type": "string",
                        "description": "Path to tracking YAML file"
                    },
                    "id": {
                        "type": "string",
                        "description": "Entry ID to delete"
                    },
                    "force": {
                        "type": "boolean",
                        "description": "Delete without confirmation"
                    }
                },
                "required": ["tracking_file", "id"]
            }),
            build_delete,
        ),
        (
            "export",
            "Export clarification memory to a portable file for sharing or backup.",
            json!({
                "type": "object",
                "properties": {
                    "source": {
                        "type": "string",
                        "description": "Source tracking file to export"
                    },
                    "output": {
                        "type": "string",
                        "description": "Output file path"
                    }
                },
                "required": ["source", "output"]
            }),
            build_export,
        ),
        (
            "import",
            "Import clarification memory from an exported file into a tracking file.",
            json!({
                "type": "object",
                "properties": {
                    "source": {
                        "type": "string",
                        "description": "Exported file to import from"
                    },
                    "target": {
                        "type": "string",
                        "description": "Target tracking file"
                    },
                    "mode": {
                        "type": "string",
                        "enum": ["merge", "replace"],
                        "description": "How to combine with existing entries"
                    }
                },
                "required": ["source", "target"]
            }),
            build_import,
        ),
        (
            "optimize",
            "Optimize the tracking file: vacuum removed entries, prune stale ones, and report stats.",
            json!({
                "type": "object",
                "properties": {
                    "tracking_file": {
                        "type": "string",
                        "description": "Path to tracking YAML file"
                    },
                    "vacuum": {
                        "type": "boolean",
                        "description": "Compact the file by dropping deleted entries"
                    },
                    "prune_stale": {
                        "type": "string",
                        "description": "Prune entries older than this duration (e.g., '90d')"
                    },
                    "stats": {
                        "type": "boolean",
                        "description": "Print memory statistics"
                    }
                },
                "required": ["tracking_file"]
            }),
            build_optimize,
        ),
        (
            "reconcile",
            "Reconcile tracked clarifications against the project: drop entries referencing files or sprints that no longer exist.",
            json!({
                "type": "object",
                "properties": {
                    "tracking_file": {
                        "type": "string",
                        "description": "Path to tracking YAML file"
                    },
                    "project_root": {
                        "type": "string",
                        "description": "Project root directory (default: current directory)"
                    },
                    "dry_run": {
                        "type": "boolean",
                        "description": "Report changes without applying them"
                    }
                },
                "required": ["tracking_file"]
            }),
            build_reconcile,
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

fn build_match(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["match-clarification".to_string()];
    argv.push("--question".to_string());
    argv.push(require_str(args, "question")?.to_string());
    push_str(&mut argv, args, "entries_file", "--file");
    push_str(&mut argv, args, "entries_json", "--entries-json");
    push_int(&mut argv, args, "timeout", "--timeout");
    Ok(argv)
}

fn build_cluster(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["cluster-clarifications".to_string()];
    push_str(&mut argv, args, "questions_file", "--questions-file");
    push_str(&mut argv, args, "questions_json", "--questions-json");
    push_int(&mut argv, args, "timeout", "--timeout");
    Ok(argv)
}

fn build_detect_conflicts(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["detect-conflicts".to_string()];
    argv.push("--file".to_string());
    argv.push(require_str(args, "tracking_file")?.to_string());
    push_int(&mut argv, args, "timeout", "--timeout");
    Ok(argv)
}

fn build_validate(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["validate-clarifications".to_string()];
    argv.push("--file".to_string());
    argv.push(require_str(args, "tracking_file")?.to_string());
    push_str(&mut argv, args, "context", "--context");
    push_int(&mut argv, args, "timeout", "--timeout");
    Ok(argv)
}

fn build_init(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["init-tracking".to_string()];
    argv.push("--output".to_string());
    argv.push(require_str(args, "output")?.to_string());
    push_flag(&mut argv, args, "force", "--force");
    Ok(argv)
}

fn build_add(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["add-clarification".to_string()];
    argv.push("--file".to_string());
    argv.push(require_str(args, "tracking_file")?.to_string());
    argv.push("--question".to_string());
    argv.push(require_str(args, "question")?.to_string());
    push_str(&mut argv, args, "answer", "--answer");
    push_str(&mut argv, args, "id", "--id");
    push_str(&mut argv, args, "sprint_id", "--sprint");
    if let Some(tags) = args.get("context_tags").and_then(Value::as_str) {
        for tag in tags.split(',') {
            let tag = tag.trim();
            if !tag.is_empty() {
                argv.push("--tag".to_string());
                argv.push(tag.to_string());
            }
        }
    }
    push_flag(&mut argv, args, "check_match", "--check-match");
    Ok(argv)
}

fn build_promote(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["promote-clarification".to_string()];
    argv.push("--file".to_string());
    argv.push(require_str(args, "tracking_file")?.to_string());
    argv.push("--id".to_string());
    argv.push(require_str(args, "id")?.to_string());
    argv.push("--target".to_string());
    argv.push(require_str(args, "target")?.to_string());
    push_flag(&mut argv, args, "force", "--force");
    Ok(argv)
}

fn build_list(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["list-entries".to_string()];
    argv.push("--file".to_string());
    argv.push(require_str(args, "tracking_file")?.to_string());
    push_str(&mut argv, args, "status", "--status");
    push_int(&mut argv, args, "min_occurrences", "--min-occurrences");
    Ok(argv)
}

fn build_delete(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["delete-clarification".to_string()];
    argv.push("--file".to_string());
    argv.push(require_str(args, "tracking_file")?.to_string());
    argv.push("--id".to_string());
    argv.push(require_str(args, "id")?.to_string());
    push_flag(&mut argv, args, "force", "--force");
    Ok(argv)
}

fn build_export(args: &Map<String, Value>) -> Result<Vec<String>> {
    Ok(vec![
        "export-memory".to_string(),
        "--source".to_string(),
        require_str(args, "source")?.to_string(),
        "--output".to_string(),
        require_str(args, "output")?.to_string(),
    ])
}

fn build_import(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["import-memory".to_string()];
    argv.push("--source".to_string());
    argv.push(require_str(args, "source")?.to_string());
    argv.push("--target".to_string());
    argv.push(require_str(args, "target")?.to_string());
    push_str(&mut argv, args, "mode", "--mode");
    Ok(argv)
}

fn build_optimize(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["optimize-memory".to_string()];
    argv.push("--file".to_string());
    argv.push(require_str(args, "tracking_file")?.to_string());
    push_flag(&mut argv, args, "vacuum", "--vacuum");
    push_str(&mut argv, args, "prune_stale", "--prune-stale");
    push_flag(&mut argv, args, "stats", "--stats");
    Ok(argv)
}

fn build_reconcile(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["reconcile-memory".to_string()];
    argv.push("--file".to_string());
    argv.push(require_str(args, "tracking_file")?.to_string());
    push_str(&mut argv, args, "project_root", "--project-root");
    push_flag(&mut argv, args, "dry_run", "--dry-run");
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
    fn test_catalog_size_and_prefix() {
        let registry = ToolRegistry::new();
        let runner = CommandRunner::new(crate::runner::RunnerConfig {
            binary: "/usr/local/bin/llm-clarification".into(),
            extra_args: vec!["--json".to_string(), "--min".to_string()],
            timeout: std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        });
        register(&registry, &runner);

        let tools = registry.list();
        assert_eq!(tools.len(), 13);
        assert!(tools.iter().all(|t| t.name.starts_with(TOOL_PREFIX)));
    }

    #[test]
    fn test_optimize_flags() {
        let argv = build_optimize(&args(json!({
            "tracking_file": "t.yaml",
            "vacuum": true,
            "prune_stale": "90d"
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "optimize-memory",
                "--file",
                "t.yaml",
                "--vacuum",
                "--prune-stale",
                "90d"
            ]
        );
    }

    #[test]
    fn test_import_requires_source_and_target() {
        assert!(build_import(&args(json!({"source": "m.yaml"}))).is_err());
        let argv = build_import(&args(json!({
            "source": "m.yaml",
            "target": "t.yaml",
            "mode": "merge"
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "import-memory",
                "--source",
                "m.yaml",
                "--target",
                "t.yaml",
                "--mode",
                "merge"
            ]
        );
    }

    #[test]
    fn test_match_maps_entries_file_to_file_flag() {
        let argv = build_match(&args(json!({
            "question": "Which auth provider?",
            "entries_file": "tracking.yaml",
            "timeout": 45
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "match-clarification",
                "--question",
                "Which auth provider?",
                "--file",
                "tracking.yaml",
                "--timeout",
                "45"
            ]
        );
    }

    #[test]
    fn test_match_requires_question() {
        assert!(build_match(&args(json!({"entries_file": "t.yaml"}))).is_err());
    }

    #[test]
    fn test_add_splits_context_tags() {
        let argv = build_add(&args(json!({
            "tracking_file": "t.yaml",
            "question": "q",
            "sprint_id": "s-12",
            "context_tags": "frontend, testing , ,backend"
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "add-clarification",
                "--file",
                "t.yaml",
                "--question",
                "q",
                "--sprint",
                "s-12",
                "--tag",
                "frontend",
                "--tag",
                "testing",
                "--tag",
                "backend"
            ]
        );
    }

    #[test]
    fn test_promote_requires_all_three() {
        assert!(build_promote(&args(json!({"tracking_file": "t.yaml", "id": "c-1"}))).is_err());
        let argv = build_promote(&args(json!({
            "tracking_file": "t.yaml",
            "id": "c-1",
            "target": "CLAUDE.md",
            "force": true
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "promote-clarification",
                "--file",
                "t.yaml",
                "--id",
                "c-1",
                "--target",
                "CLAUDE.md",
                "--force"
            ]
        );
    }

    #[test]
    fn test_list_filters() {
        let argv = build_list(&args(json!({
            "tracking_file": "t.yaml",
            "status": "pending",
            "min_occurrences": 3
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "list-entries",
                "--file",
                "t.yaml",
                "--status",
                "pending",
                "--min-occurrences",
                "3"
            ]
        );
    }

    #[test]
    fn test_cluster_accepts_either_source() {
        let argv = build_cluster(&args(json!({"questions_json": "[\"a\"]"}))).unwrap();
        assert_eq!(
            argv,
            vec!["cluster-clarifications", "--questions-json", "[\"a\"]"]
        );
    }
}
