//! End-to-end tests for the MCP stdio engine
//!
//! Drives a full server over in-memory pipes with a fake companion binary
//! (a shell script) standing in for the real CLI.

#![cfg(unix)]

use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use llm_tools_mcp::mcp::{McpServer, ServerIdentity, ToolRegistry, Transport};
use llm_tools_mcp::runner::{CommandRunner, RunnerConfig};
use llm_tools_mcp::tools::{clarification, filesystem, semantic};

/// Write an executable shell script that echoes its argv
fn fake_binary(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("fake-cli");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "#!/bin/sh").unwrap();
    writeln!(file, "echo \"$@\"").unwrap();
    drop(file);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn filesystem_registry(binary: PathBuf) -> Arc<ToolRegistry> {
    let config = RunnerConfig {
        binary,
        extra_args: vec!["--json".to_string()],
        timeout: Duration::from_secs(10),
    };
    let runner = CommandRunner::new(config);
    let registry = Arc::new(ToolRegistry::new());
    filesystem::register(&registry, &runner);
    registry
}

/// Feed `input` to a server over in-memory pipes and collect its responses.
async fn run_session(registry: Arc<ToolRegistry>, input: &str) -> Vec<Value> {
    let (mut client_write, server_read) = tokio::io::duplex(256 * 1024);
    let (server_write, mut client_read) = tokio::io::duplex(256 * 1024);

    let identity = ServerIdentity {
        name: "llm-filesystem".to_string(),
        version: "1.7.0".to_string(),
        instructions: Some("test".to_string()),
    };
    let mut server = McpServer::new(Transport::new(server_read, server_write), registry, identity);

    let cancel = CancellationToken::new();
    let task = tokio::spawn(async move { server.serve(cancel).await });

    client_write.write_all(input.as_bytes()).await.unwrap();
    client_write.shutdown().await.unwrap();
    drop(client_write);

    let mut output = String::new();
    client_read.read_to_string(&mut output).await.unwrap();
    task.await.unwrap().unwrap();

    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[tokio::test]
async fn full_session_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let registry = filesystem_registry(fake_binary(&dir));

    let input = concat!(
        "{\"jsonrpc\":\"2.0\",\"id\":0,\"method\":\"initialize\",\"params\":{\"protocolVersion\":\"2024-11-05\",\"clientInfo\":{\"name\":\"test\"}}}\n",
        "{\"jsonrpc\":\"2.0\",\"method\":\"initialized\"}\n",
        "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n",
        "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/call\",\"params\":{\"name\":\"fast_get_file_info\",\"arguments\":{\"path\":\"/tmp/x\"}}}\n",
    );
    let responses = run_session(registry, input).await;

    // initialized is silent, so three responses for four messages
    assert_eq!(responses.len(), 3);

    let init = &responses[0];
    assert_eq!(init["id"], 0);
    assert_eq!(init["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(init["result"]["serverInfo"]["name"], "llm-filesystem");
    assert_eq!(init["result"]["capabilities"]["tools"], json!({}));

    let list = &responses[1];
    let tools = list["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 26);
    assert!(tools.iter().all(|t| {
        t["name"].as_str().unwrap().starts_with("fast_")
            && t["inputSchema"]["type"] == "object"
            && !t["description"].as_str().unwrap().is_empty()
    }));

    let call = &responses[2];
    assert_eq!(call["id"], 2);
    let text = call["result"]["content"][0]["text"].as_str().unwrap();
    assert_eq!(text, "get-file-info --path /tmp/x --json");
    assert!(call["result"].get("isError").is_none());
}

#[tokio::test]
async fn tool_calls_work_without_initialize() {
    let dir = tempfile::tempdir().unwrap();
    let registry = filesystem_registry(fake_binary(&dir));

    let input = "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"fast_list_allowed_directories\",\"arguments\":{}}}\n";
    let responses = run_session(registry, input).await;

    assert_eq!(responses.len(), 1);
    assert_eq!(
        responses[0]["result"]["content"][0]["text"],
        "list-allowed-directories --json"
    );
}

#[tokio::test]
async fn header_framed_requests_get_newline_delimited_responses() {
    let dir = tempfile::tempdir().unwrap();
    let registry = filesystem_registry(fake_binary(&dir));

    let body1 = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
    let body2 = r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"fast_get_disk_usage","arguments":{"path":"/"}}}"#;
    let input = format!(
        "Content-Length: {}\r\nContent-Type: application/json\r\n\r\n{}content-length: {}\n\n{}",
        body1.len(),
        body1,
        body2.len(),
        body2
    );
    let responses = run_session(registry, &input).await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(
        responses[1]["result"]["content"][0]["text"],
        "get-disk-usage --path / --json"
    );
}

#[tokio::test]
async fn unknown_tool_and_unknown_method_error_taxonomy() {
    let dir = tempfile::tempdir().unwrap();
    let registry = filesystem_registry(fake_binary(&dir));

    let input = concat!(
        "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"no_such_tool\",\"arguments\":{}}}\n",
        "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"resources/read\"}\n",
    );
    let responses = run_session(registry, input).await;

    // Unknown tool: success envelope with isError
    let tool_result = &responses[0];
    assert!(tool_result.get("error").is_none());
    assert_eq!(tool_result["result"]["isError"], true);
    assert_eq!(
        tool_result["result"]["content"][0]["text"],
        "Tool not found: no_such_tool"
    );

    // Unknown method: JSON-RPC protocol error
    let method_error = &responses[1];
    assert_eq!(method_error["error"]["code"], -32601);
    assert!(method_error.get("result").is_none());
}

#[tokio::test]
async fn invalid_tool_arguments_become_tool_errors() {
    let dir = tempfile::tempdir().unwrap();
    let registry = filesystem_registry(fake_binary(&dir));

    // fast_read_file requires path
    let input = "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"fast_read_file\",\"arguments\":{}}}\n";
    let responses = run_session(registry, input).await;

    assert_eq!(responses[0]["result"]["isError"], true);
    let text = responses[0]["result"]["content"][0]["text"]
        .as_str()
        .unwrap();
    assert!(text.starts_with("Error: "));
    assert!(text.contains("path"));
}

#[tokio::test]
async fn failing_binary_output_still_reaches_client() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("failing-cli");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "#!/bin/sh").unwrap();
    writeln!(file, "echo '{{\"error\":\"index not found\"}}'; exit 1").unwrap();
    drop(file);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

    let registry = filesystem_registry(path);
    let input = "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"fast_get_disk_usage\",\"arguments\":{\"path\":\"/\"}}}\n";
    let responses = run_session(registry, input).await;

    // Nonzero exit with output is surfaced as a normal tool result.
    assert!(responses[0]["result"].get("isError").is_none());
    assert_eq!(
        responses[0]["result"]["content"][0]["text"],
        "{\"error\":\"index not found\"}"
    );
}

#[tokio::test]
async fn parse_errors_do_not_kill_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let registry = filesystem_registry(fake_binary(&dir));

    // Braces balance, so the reader consumes exactly one bad message.
    let input = concat!(
        "{not json}\n",
        "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n",
    );
    let responses = run_session(registry, input).await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[1]["id"], 1);
    assert!(responses[1].get("error").is_none());
}

#[tokio::test]
async fn semantic_catalog_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunnerConfig {
        binary: fake_binary(&dir),
        extra_args: vec!["--json".to_string()],
        timeout: Duration::from_secs(10),
    };
    let runner = CommandRunner::new(config);
    let registry = Arc::new(ToolRegistry::new());
    semantic::register(&registry, &runner);

    let input = "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"llm_semantic_search\",\"arguments\":{\"query\":\"auth middleware\",\"top_k\":3}}}\n";
    let responses = run_session(registry, input).await;

    assert_eq!(
        responses[0]["result"]["content"][0]["text"],
        "search --query auth middleware --top-k 3 --json"
    );
}

#[tokio::test]
async fn clarification_catalog_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunnerConfig {
        binary: fake_binary(&dir),
        extra_args: vec!["--json".to_string(), "--min".to_string()],
        timeout: Duration::from_secs(10),
    };
    let runner = CommandRunner::new(config);
    let registry = Arc::new(ToolRegistry::new());
    clarification::register(&registry, &runner);

    let input = "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"llm_clarify_list\",\"arguments\":{\"tracking_file\":\"t.yaml\",\"status\":\"pending\"}}}\n";
    let responses = run_session(registry, input).await;

    assert_eq!(
        responses[0]["result"]["content"][0]["text"],
        "list-entries --file t.yaml --status pending --json --min"
    );
}
