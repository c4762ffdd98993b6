//! Tool catalog for the llm-filesystem CLI
//!
//! The CLI subcommand is the tool name in kebab-case; arguments map onto
//! flags one for one except where noted on the builder.

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::mcp::registry::{Tool, ToolRegistry};
use crate::runner::CommandRunner;

use super::{
    push_flag, push_int, push_int_array, push_json, push_negated_flag, push_str, push_str_array,
    require_str, CliTool,
};

/// Prefix for all llm-filesystem tool names
pub const TOOL_PREFIX: &str = "fast_";

/// Default deadline for filesystem commands
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Register the filesystem tool catalog
pub fn register(registry: &ToolRegistry, runner: &CommandRunner) {
    let catalog: &[(&str, &str, Value, super::ArgBuilder)] = &[
        // Core file operations
        (
            "read_file",
            "Reads a file with auto-chunking support",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path to read"},
                    "start_offset": {"type": "number", "description": "Starting byte offset"},
                    "max_size": {"type": "number", "description": "Maximum size to read"},
                    "line_start": {"type": "number", "description": "Starting line number"},
                    "line_count": {"type": "number", "description": "Number of lines to read"}
                },
                "required": ["path"]
            }),
            build_read_file,
        ),
        (
            "read_multiple_files",
            "Reads multiple files simultaneously",
            json!({
                "type": "object",
                "properties": {
                    "paths": {"type": "array", "items": {"type": "string"}, "description": "File paths to read"}
                },
                "required": ["paths"]
            }),
            build_read_multiple_files,
        ),
        (
            "write_file",
            "Writes content to a file",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path"},
                    "content": {"type": "string", "description": "File content"},
                    "append": {"type": "boolean", "description": "Append mode", "default": false}
                },
                "required": ["path", "content"]
            }),
            build_write_file,
        ),
        (
            "large_write_file",
            "Writes large files with backup and verification",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path"},
                    "content": {"type": "string", "description": "File content"},
                    "backup": {"type": "boolean", "description": "Create backup", "default": true},
                    "verify": {"type": "boolean", "description": "Verify write", "default": true}
                },
                "required": ["path", "content"]
            }),
            build_large_write_file,
        ),
        (
            "get_file_info",
            "Gets detailed file information",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Path to get info for"}
                },
                "required": ["path"]
            }),
            build_get_file_info,
        ),
        (
            "create_directory",
            "Creates a directory",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Directory path to create"},
                    "recursive": {"type": "boolean", "description": "Create parent directories", "default": true}
                },
                "required": ["path"]
            }),
            build_create_directory,
        ),
        // Directory operations
        (
            "list_directory",
            "Lists directory contents with filtering and pagination",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Directory path"},
                    "show_hidden": {"type": "boolean", "description": "Show hidden files", "default": false},
                    "pattern": {"type": "string", "description": "Filename filter pattern"},
                    "sort_by": {"type": "string", "enum": ["name", "size", "modified"], "default": "name"},
                    "reverse": {"type": "boolean", "description": "Reverse sort order", "default": false},
                    "page": {"type": "number", "description": "Page number"},
                    "page_size": {"type": "number", "description": "Items per page"}
                },
                "required": ["path"]
            }),
            build_list_directory,
        ),
        (
            "get_directory_tree",
            "Gets directory tree structure",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Root directory path"},
                    "depth": {"type": "number", "description": "Maximum depth", "default": 5},
                    "show_hidden": {"type": "boolean", "description": "Show hidden files", "default": false},
                    "include_files": {"type": "boolean", "description": "Include files", "default": false},
                    "pattern": {"type": "string", "description": "File pattern filter"}
                },
                "required": ["path"]
            }),
            build_get_directory_tree,
        ),
        // Search operations
        (
            "search_files",
            "Search for files by name pattern",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Directory to search in"},
                    "pattern": {"type": "string", "description": "Search pattern"},
                    "recursive": {"type": "boolean", "description": "Search recursively", "default": true},
                    "show_hidden": {"type": "boolean", "description": "Include hidden files", "default": false},
                    "max_results": {"type": "number", "description": "Maximum results", "default": 1000}
                },
                "required": ["path", "pattern"]
            }),
            build_search_files,
        ),
        (
            "search_code",
            "Search for patterns in file contents",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Directory to search in"},
                    "pattern": {"type": "string", "description": "Search pattern"},
                    "ignore_case": {"type": "boolean", "description": "Case insensitive", "default": false},
                    "regex": {"type": "boolean", "description": "Use regex", "default": false},
                    "context": {"type": "number", "description": "Context lines", "default": 0},
                    "file_types": {"type": "array", "items": {"type": "string"}, "description": "File extensions"},
                    "max_results": {"type": "number", "description": "Maximum results", "default": 1000},
                    "show_hidden": {"type": "boolean", "description": "Include hidden files", "default": false}
                },
                "required": ["path", "pattern"]
            }),
            build_search_code,
        ),
        // Edit operations
        (
            "edit_block",
            "Replace a block of text in a file",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path"},
                    "old_string": {"type": "string", "description": "Text to find"},
                    "new_string": {"type": "string", "description": "Replacement text"}
                },
                "required": ["path", "old_string", "new_string"]
            }),
            build_edit_block,
        ),
        (
            "edit_blocks",
            "Apply multiple edits to a file",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path"},
                    "edits": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "old_string": {"type": "string"},
                                "new_string": {"type": "string"}
                            },
                            "required": ["old_string", "new_string"]
                        },
                        "description": "List of edits"
                    }
                },
                "required": ["path", "edits"]
            }),
            build_edit_blocks,
        ),
        (
            "safe_edit",
            "Safe edit with backup and dry-run support",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path"},
                    "old_string": {"type": "string", "description": "Text to find"},
                    "new_string": {"type": "string", "description": "Replacement text"},
                    "backup": {"type": "boolean", "description": "Create backup", "default": true},
                    "dry_run": {"type": "boolean", "description": "Preview only", "default": false}
                },
                "required": ["path", "old_string", "new_string"]
            }),
            build_safe_edit,
        ),
        (
            "edit_file",
            "Line-based file editing (insert, replace, delete)",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path"},
                    "operation": {"type": "string", "enum": ["insert", "replace", "delete"], "description": "Operation type"},
                    "line": {"type": "number", "description": "Line number"},
                    "content": {"type": "string", "description": "Content for insert/replace"}
                },
                "required": ["path", "operation", "line"]
            }),
            build_edit_file,
        ),
        (
            "search_and_replace",
            "Search and replace across multiple files",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Directory to search"},
                    "pattern": {"type": "string", "description": "Search pattern"},
                    "replacement": {"type": "string", "description": "Replacement text"},
                    "regex": {"type": "boolean", "description": "Use regex", "default": false},
                    "dry_run": {"type": "boolean", "description": "Preview only", "default": false},
                    "file_types": {"type": "array", "items": {"type": "string"}, "description": "File extensions"}
                },
                "required": ["path", "pattern", "replacement"]
            }),
            build_search_and_replace,
        ),
        (
            "extract_lines",
            "Extract specific lines from a file",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path"},
                    "start": {"type": "number", "description": "Start line"},
                    "end": {"type": "number", "description": "End line"},
                    "lines": {"type": "array", "items": {"type": "number"}, "description": "Specific line numbers"}
                },
                "required": ["path"]
            }),
            build_extract_lines,
        ),
        // File operations
        (
            "copy_file",
            "Copy a file or directory",
            json!({
                "type": "object",
                "properties": {
                    "source": {"type": "string", "description": "Source path"},
                    "destination": {"type": "string", "description": "Destination path"}
                },
                "required": ["source", "destination"]
            }),
            build_copy_file,
        ),
        (
            "move_file",
            "Move or rename a file or directory",
            json!({
                "type": "object",
                "properties": {
                    "source": {"type": "string", "description": "Source path"},
                    "destination": {"type": "string", "description": "Destination path"}
                },
                "required": ["source", "destination"]
            }),
            build_move_file,
        ),
        (
            "delete_file",
            "Delete a file or directory",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Path to delete"},
                    "recursive": {"type": "boolean", "description": "Delete recursively", "default": false}
                },
                "required": ["path"]
            }),
            build_delete_file,
        ),
        (
            "batch_file_operations",
            "Perform batch file operations",
            json!({
                "type": "object",
                "properties": {
                    "operations": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "operation": {"type": "string", "enum": ["copy", "move", "delete"]},
                                "source": {"type": "string"},
                                "destination": {"type": "string"}
                            },
                            "required": ["operation", "source"]
                        },
                        "description": "List of operations"
                    }
                },
                "required": ["operations"]
            }),
            build_batch_file_operations,
        ),
        // Advanced operations
        (
            "get_disk_usage",
            "Get disk usage for a path",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Path to analyze"}
                },
                "required": ["path"]
            }),
            build_get_disk_usage,
        ),
        (
            "find_large_files",
            "Find files larger than specified size",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Directory to search"},
                    "min_size": {"type": "number", "description": "Minimum size in bytes", "default": 0},
                    "limit": {"type": "number", "description": "Maximum results", "default": 100}
                },
                "required": ["path"]
            }),
            build_find_large_files,
        ),
        (
            "compress_files",
            "Compress files into an archive",
            json!({
                "type": "object",
                "properties": {
                    "paths": {"type": "array", "items": {"type": "string"}, "description": "Paths to compress"},
                    "output": {"type": "string", "description": "Output archive path"},
                    "format": {"type": "string", "enum": ["zip", "tar.gz"], "default": "zip"}
                },
                "required": ["paths", "output"]
            }),
            build_compress_files,
        ),
        (
            "extract_archive",
            "Extract an archive",
            json!({
                "type": "object",
                "properties": {
                    "archive": {"type": "string", "description": "Archive file path"},
                    "destination": {"type": "string", "description": "Destination directory"}
                },
                "required": ["archive", "destination"]
            }),
            build_extract_archive,
        ),
        (
            "sync_directories",
            "Synchronize two directories",
            json!({
                "type": "object",
                "properties": {
                    "source": {"type": "string", "description": "Source directory"},
                    "destination": {"type": "string", "description": "Destination directory"}
                },
                "required": ["source", "destination"]
            }),
            build_sync_directories,
        ),
        (
            "list_allowed_directories",
            "List directories the tool is allowed to access",
            json!({
                "type": "object",
                "properties": {}
            }),
            build_list_allowed_directories,
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

fn build_read_file(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["read-file".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    push_int(&mut argv, args, "start_offset", "--offset");
    push_int(&mut argv, args, "max_size", "--max-size");
    push_int(&mut argv, args, "line_start", "--line-start");
    push_int(&mut argv, args, "line_count", "--line-count");
    Ok(argv)
}

fn build_read_multiple_files(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["read-multiple-files".to_string()];
    push_str_array(&mut argv, args, "paths", "--paths");
    Ok(argv)
}

fn build_write_file(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["write-file".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    argv.push("--content".to_string());
    argv.push(require_str(args, "content")?.to_string());
    push_flag(&mut argv, args, "append", "--append");
    Ok(argv)
}

fn build_large_write_file(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["large-write-file".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    argv.push("--content".to_string());
    argv.push(require_str(args, "content")?.to_string());
    push_negated_flag(&mut argv, args, "backup", "--backup");
    push_negated_flag(&mut argv, args, "verify", "--verify");
    Ok(argv)
}

fn build_get_file_info(args: &Map<String, Value>) -> Result<Vec<String>> {
    Ok(vec![
        "get-file-info".to_string(),
        "--path".to_string(),
        require_str(args, "path")?.to_string(),
    ])
}

fn build_create_directory(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["create-directory".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    push_negated_flag(&mut argv, args, "recursive", "--recursive");
    Ok(argv)
}

fn build_list_directory(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["list-directory".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    push_flag(&mut argv, args, "show_hidden", "--show-hidden");
    push_str(&mut argv, args, "pattern", "--pattern");
    push_str(&mut argv, args, "sort_by", "--sort-by");
    push_flag(&mut argv, args, "reverse", "--reverse");
    push_int(&mut argv, args, "page", "--page");
    push_int(&mut argv, args, "page_size", "--page-size");
    Ok(argv)
}

fn build_get_directory_tree(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["get-directory-tree".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    push_int(&mut argv, args, "depth", "--depth");
    push_flag(&mut argv, args, "show_hidden", "--show-hidden");
    push_flag(&mut argv, args, "include_files", "--include-files");
    push_str(&mut argv, args, "pattern", "--pattern");
    Ok(argv)
}

fn build_search_files(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["search-files".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    argv.push("--pattern".to_string());
    argv.push(require_str(args, "pattern")?.to_string());
    push_negated_flag(&mut argv, args, "recursive", "--recursive");
    push_flag(&mut argv, args, "show_hidden", "--show-hidden");
    push_int(&mut argv, args, "max_results", "--max-results");
    Ok(argv)
}

fn build_search_code(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["search-code".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    argv.push("--pattern".to_string());
    argv.push(require_str(args, "pattern")?.to_string());
    push_flag(&mut argv, args, "ignore_case", "--ignore-case");
    push_flag(&mut argv, args, "regex", "--regex");
    push_int(&mut argv, args, "context", "--context");
    push_str_array(&mut argv, args, "file_types", "--file-types");
    push_int(&mut argv, args, "max_results", "--max-results");
    push_flag(&mut argv, args, "show_hidden", "--show-hidden");
    Ok(argv)
}

fn build_edit_block(args: &Map<String, Value>) -> Result<Vec<String>> {
    Ok(vec![
        "edit-block".to_string(),
        "--path".to_string(),
        require_str(args, "path")?.to_string(),
        "--old".to_string(),
        require_str(args, "old_string")?.to_string(),
        "--new".to_string(),
        require_str(args, "new_string")?.to_string(),
    ])
}

fn build_edit_blocks(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["edit-blocks".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    push_json(&mut argv, args, "edits", "--edits")?;
    Ok(argv)
}

fn build_safe_edit(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["safe-edit".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    argv.push("--old".to_string());
    argv.push(require_str(args, "old_string")?.to_string());
    argv.push("--new".to_string());
    argv.push(require_str(args, "new_string")?.to_string());
    push_negated_flag(&mut argv, args, "backup", "--backup");
    push_flag(&mut argv, args, "dry_run", "--dry-run");
    Ok(argv)
}

fn build_edit_file(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["edit-file".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    argv.push("--operation".to_string());
    argv.push(require_str(args, "operation")?.to_string());
    push_int(&mut argv, args, "line", "--line");
    push_str(&mut argv, args, "content", "--content");
    Ok(argv)
}

fn build_search_and_replace(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["search-and-replace".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    argv.push("--pattern".to_string());
    argv.push(require_str(args, "pattern")?.to_string());
    argv.push("--replacement".to_string());
    argv.push(require_str(args, "replacement")?.to_string());
    push_flag(&mut argv, args, "regex", "--regex");
    push_flag(&mut argv, args, "dry_run", "--dry-run");
    push_str_array(&mut argv, args, "file_types", "--file-types");
    Ok(argv)
}

fn build_extract_lines(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["extract-lines".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    push_int(&mut argv, args, "start", "--start");
    push_int(&mut argv, args, "end", "--end");
    push_int_array(&mut argv, args, "lines", "--lines");
    Ok(argv)
}

fn build_copy_file(args: &Map<String, Value>) -> Result<Vec<String>> {
    Ok(vec![
        "copy-file".to_string(),
        "--source".to_string(),
        require_str(args, "source")?.to_string(),
        "--dest".to_string(),
        require_str(args, "destination")?.to_string(),
    ])
}

fn build_move_file(args: &Map<String, Value>) -> Result<Vec<String>> {
    Ok(vec![
        "move-file".to_string(),
        "--source".to_string(),
        require_str(args, "source")?.to_string(),
        "--dest".to_string(),
        require_str(args, "destination")?.to_string(),
    ])
}

fn build_delete_file(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["delete-file".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    push_flag(&mut argv, args, "recursive", "--recursive");
    Ok(argv)
}

fn build_batch_file_operations(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["batch-file-operations".to_string()];
    push_json(&mut argv, args, "operations", "--operations")?;
    Ok(argv)
}

fn build_get_disk_usage(args: &Map<String, Value>) -> Result<Vec<String>> {
    Ok(vec![
        "get-disk-usage".to_string(),
        "--path".to_string(),
        require_str(args, "path")?.to_string(),
    ])
}

fn build_find_large_files(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["find-large-files".to_string()];
    argv.push("--path".to_string());
    argv.push(require_str(args, "path")?.to_string());
    push_int(&mut argv, args, "min_size", "--min-size");
    push_int(&mut argv, args, "limit", "--limit");
    Ok(argv)
}

fn build_compress_files(args: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv = vec!["compress-files".to_string()];
    push_str_array(&mut argv, args, "paths", "--paths");
    argv.push("--output".to_string());
    argv.push(require_str(args, "output")?.to_string());
    push_str(&mut argv, args, "format", "--format");
    Ok(argv)
}

fn build_extract_archive(args: &Map<String, Value>) -> Result<Vec<String>> {
    Ok(vec![
        "extract-archive".to_string(),
        "--archive".to_string(),
        require_str(args, "archive")?.to_string(),
        "--dest".to_string(),
        require_str(args, "destination")?.to_string(),
    ])
}

fn build_sync_directories(args: &Map<String, Value>) -> Result<Vec<String>> {
    Ok(vec![
        "sync-directories".to_string(),
        "--source".to_string(),
        require_str(args, "source")?.to_string(),
        "--dest".to_string(),
        require_str(args, "destination")?.to_string(),
    ])
}

fn build_list_allowed_directories(_args: &Map<String, Value>) -> Result<Vec<String>> {
    Ok(vec!["list-allowed-directories".to_string()])
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
            binary: "/usr/local/bin/llm-filesystem".into(),
            extra_args: vec!["--json".to_string()],
            timeout: std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        });
        register(&registry, &runner);

        let tools = registry.list();
        assert_eq!(tools.len(), 26);
        assert!(tools.iter().all(|t| t.name.starts_with(TOOL_PREFIX)));
    }

    #[test]
    fn test_read_file_argv() {
        let argv = build_read_file(&args(json!({
            "path": "/tmp/a.txt",
            "start_offset": 100,
            "line_count": 50
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "read-file",
                "--path",
                "/tmp/a.txt",
                "--offset",
                "100",
                "--line-count",
                "50"
            ]
        );
    }

    #[test]
    fn test_read_file_requires_path() {
        assert!(build_read_file(&args(json!({}))).is_err());
    }

    #[test]
    fn test_write_file_append_flag() {
        let argv = build_write_file(&args(json!({
            "path": "/tmp/a.txt",
            "content": "hello",
            "append": true
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec!["write-file", "--path", "/tmp/a.txt", "--content", "hello", "--append"]
        );
    }

    #[test]
    fn test_large_write_file_negated_defaults() {
        let argv = build_large_write_file(&args(json!({
            "path": "/tmp/a.txt",
            "content": "x",
            "backup": false
        })))
        .unwrap();
        assert!(argv.contains(&"--backup=false".to_string()));
        assert!(!argv.iter().any(|a| a.starts_with("--verify")));
    }

    #[test]
    fn test_search_files_recursive_default_true() {
        let base = json!({"path": ".", "pattern": "*.rs"});
        let argv = build_search_files(&args(base.clone())).unwrap();
        assert!(!argv.iter().any(|a| a.starts_with("--recursive")));

        let mut with_false = args(base);
        with_false.insert("recursive".to_string(), json!(false));
        let argv = build_search_files(&with_false).unwrap();
        assert!(argv.contains(&"--recursive=false".to_string()));
    }

    #[test]
    fn test_search_code_repeats_file_types() {
        let argv = build_search_code(&args(json!({
            "path": ".",
            "pattern": "fn main",
            "file_types": ["rs", "toml"],
            "ignore_case": true
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "search-code",
                "--path",
                ".",
                "--pattern",
                "fn main",
                "--ignore-case",
                "--file-types",
                "rs",
                "--file-types",
                "toml"
            ]
        );
    }

    #[test]
    fn test_edit_block_maps_old_new() {
        let argv = build_edit_block(&args(json!({
            "path": "f.rs",
            "old_string": "a",
            "new_string": "b"
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec!["edit-block", "--path", "f.rs", "--old", "a", "--new", "b"]
        );
    }

    #[test]
    fn test_edit_blocks_marshals_edits() {
        let argv = build_edit_blocks(&args(json!({
            "path": "f.rs",
            "edits": [{"old_string": "a", "new_string": "b"}]
        })))
        .unwrap();
        assert_eq!(argv[3], "--edits");
        let parsed: Value = serde_json::from_str(&argv[4]).unwrap();
        assert_eq!(parsed[0]["new_string"], "b");
    }

    #[test]
    fn test_extract_lines_repeats_line_numbers() {
        let argv = build_extract_lines(&args(json!({
            "path": "f.rs",
            "lines": [3, 7, 12]
        })))
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "extract-lines",
                "--path",
                "f.rs",
                "--lines",
                "3",
                "--lines",
                "7",
                "--lines",
                "12"
            ]
        );
    }

    #[test]
    fn test_copy_file_uses_dest_flag() {
        let argv = build_copy_file(&args(json!({
            "source": "a",
            "destination": "b"
        })))
        .unwrap();
        assert_eq!(argv, vec!["copy-file", "--source", "a", "--dest", "b"]);
    }

    #[test]
    fn test_batch_operations_marshalled() {
        let argv = build_batch_file_operations(&args(json!({
            "operations": [{"operation": "copy", "source": "a", "destination": "b"}]
        })))
        .unwrap();
        assert_eq!(argv[1], "--operations");
        let parsed: Value = serde_json::from_str(&argv[2]).unwrap();
        assert_eq!(parsed[0]["operation"], "copy");
    }

    #[test]
    fn test_list_allowed_directories_takes_no_args() {
        let argv = build_list_allowed_directories(&args(json!({}))).unwrap();
        assert_eq!(argv, vec!["list-allowed-directories"]);
    }
}
