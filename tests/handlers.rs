//! chat / analyzeFile handler tests against stand-in executables.
//! Scripts echo their argv so the tests can see exactly what codex would get.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use codex_mcp::config::{Config, InvocationDefaults};
use codex_mcp::handler::CodexHandler;
use codex_mcp::tools::analyze_file::AnalyzeFileRequest;
use codex_mcp::tools::chat::ChatRequest;
use serde_json::json;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn scratch_dir() -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("codex-mcp-test-{}-{n}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write an executable shell script standing in for `codex`.
fn fake_codex(body: &str) -> PathBuf {
    let path = scratch_dir().join("codex");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn handler_for(executable: &Path, timeout: Duration) -> CodexHandler {
    CodexHandler::new(Config {
        executable: executable.to_string_lossy().into_owned(),
        timeout,
        defaults: InvocationDefaults::default(),
    })
}

fn chat_req(value: serde_json::Value) -> ChatRequest {
    serde_json::from_value(value).unwrap()
}

fn analyze_req(value: serde_json::Value) -> AnalyzeFileRequest {
    serde_json::from_value(value).unwrap()
}

// ---------------------------------------------------------------------------
// chat
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chat_relays_stdout() {
    let exe = fake_codex(r#"echo "$@""#);
    let handler = handler_for(&exe, Duration::from_secs(10));

    let resp = handler
        .chat(chat_req(json!({ "prompt": "Hello CodeX", "model": "gpt-5" })))
        .await;

    assert_eq!(
        resp.text.trim(),
        "exec --skip-git-repo-check --model gpt-5 --sandbox workspace-write Hello CodeX"
    );
}

#[tokio::test]
async fn chat_forwards_reasoning_overrides() {
    let exe = fake_codex(r#"echo "$@""#);
    let handler = handler_for(&exe, Duration::from_secs(10));

    let resp = handler
        .chat(chat_req(json!({
            "prompt": "Simple test",
            "sandbox": false,
            "yolo": true,
            "reasoningEffort": "low",
            "reasoningSummary": "auto"
        })))
        .await;

    assert_eq!(
        resp.text.trim(),
        "exec --skip-git-repo-check --full-auto -c model_reasoning_effort=low \
         -c model_reasoning_summary=auto Simple test"
    );
}

#[tokio::test]
async fn chat_falls_back_to_stderr_when_stdout_empty() {
    let exe = fake_codex("echo 'only on stderr' >&2");
    let handler = handler_for(&exe, Duration::from_secs(10));

    let resp = handler.chat(chat_req(json!({ "prompt": "hi" }))).await;
    assert_eq!(resp.text.trim(), "only on stderr");
}

#[tokio::test]
async fn chat_non_zero_exit_reports_stderr() {
    let exe = fake_codex("echo 'Error: not authenticated' >&2\nexit 1");
    let handler = handler_for(&exe, Duration::from_secs(10));

    let resp = handler.chat(chat_req(json!({ "prompt": "hi" }))).await;
    assert!(
        resp.text.starts_with("Error executing CodeX CLI: "),
        "got: {}",
        resp.text
    );
    assert!(resp.text.contains("exited with code 1"));
    assert!(resp.text.contains("Error: not authenticated"));
}

#[tokio::test]
async fn chat_timeout_reports_timed_out() {
    let exe = fake_codex("sleep 30");
    let handler = handler_for(&exe, Duration::from_millis(300));

    let resp = handler.chat(chat_req(json!({ "prompt": "hi" }))).await;
    assert!(resp.text.starts_with("Error executing CodeX CLI: "));
    assert!(resp.text.contains("timed out after 300ms"), "got: {}", resp.text);
}

#[tokio::test]
async fn chat_missing_executable_is_an_envelope() {
    let handler = handler_for(
        Path::new("/nonexistent/codex-mcp/codex"),
        Duration::from_secs(5),
    );
    let resp = handler.chat(chat_req(json!({ "prompt": "hi" }))).await;
    assert!(resp.text.starts_with("Error executing CodeX CLI: "));
}

#[tokio::test]
async fn chat_blank_prompt_is_rejected_without_spawning() {
    let dir = scratch_dir();
    let marker = dir.join("spawned");
    let exe = fake_codex(&format!("touch '{}'", marker.display()));
    let handler = handler_for(&exe, Duration::from_secs(10));

    let resp = handler.chat(chat_req(json!({ "prompt": "   " }))).await;
    assert_eq!(
        resp.text,
        "Error: chat requires a 'prompt' parameter of type string"
    );
    assert!(!marker.exists());
}

// ---------------------------------------------------------------------------
// analyzeFile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyze_file_composes_instruction_with_prompt() {
    let exe = fake_codex(r#"for a in "$@"; do echo "$a"; done"#);
    let target = scratch_dir().join("t.js");
    std::fs::write(&target, "console.log(1)").unwrap();
    let handler = handler_for(&exe, Duration::from_secs(10));

    let resp = handler
        .analyze_file(analyze_req(json!({
            "filePath": target.to_string_lossy(),
            "prompt": "Check for bugs",
            "model": "gpt-5",
            "yolo": true
        })))
        .await;

    let instruction = format!("Check for bugs. Please analyze the file: {}", target.display());
    let lines: Vec<&str> = resp.text.lines().collect();
    assert_eq!(
        lines,
        [
            "exec",
            "--skip-git-repo-check",
            "--model",
            "gpt-5",
            "--sandbox",
            "workspace-write",
            "--full-auto",
            instruction.as_str(),
        ]
    );
}

#[tokio::test]
async fn analyze_file_default_instruction() {
    let exe = fake_codex(r#"for a in "$@"; do echo "$a"; done"#);
    let target = scratch_dir().join("lib.rs");
    std::fs::write(&target, "fn main() {}").unwrap();
    let handler = handler_for(&exe, Duration::from_secs(10));

    let resp = handler
        .analyze_file(analyze_req(json!({ "filePath": target.to_string_lossy() })))
        .await;

    let expected = format!("Please analyze this file: {}", target.display());
    assert_eq!(resp.text.lines().last(), Some(expected.as_str()));
}

#[tokio::test]
async fn analyze_file_missing_file_never_spawns() {
    let dir = scratch_dir();
    let marker = dir.join("spawned");
    let exe = fake_codex(&format!("touch '{}'", marker.display()));
    let handler = handler_for(&exe, Duration::from_secs(10));
    let missing = dir.join("does-not-exist.js");

    let resp = handler
        .analyze_file(analyze_req(json!({ "filePath": missing.to_string_lossy() })))
        .await;

    assert_eq!(
        resp.text,
        format!("Error: File not found: {}", missing.display())
    );
    assert!(!marker.exists(), "no subprocess may run for a missing file");
}

#[tokio::test]
async fn analyze_file_process_failure_is_an_envelope() {
    let exe = fake_codex("echo 'model overloaded' >&2\nexit 2");
    let target = scratch_dir().join("a.py");
    std::fs::write(&target, "print(1)").unwrap();
    let handler = handler_for(&exe, Duration::from_secs(10));

    let resp = handler
        .analyze_file(analyze_req(json!({ "filePath": target.to_string_lossy() })))
        .await;

    assert!(resp.text.starts_with("Error executing CodeX CLI: "));
    assert!(resp.text.contains("model overloaded"));
}

#[tokio::test]
async fn analyze_file_blank_path_is_rejected() {
    let handler = handler_for(Path::new("true"), Duration::from_secs(5));
    let resp = handler
        .analyze_file(analyze_req(json!({ "filePath": "" })))
        .await;
    assert_eq!(
        resp.text,
        "Error: analyzeFile requires a 'filePath' parameter of type string"
    );
}

// ---------------------------------------------------------------------------
// Envelope shape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_outcome_is_a_single_text_item() {
    let ok = fake_codex("echo fine");
    let bad = fake_codex("exit 9");
    let responses = [
        handler_for(&ok, Duration::from_secs(10))
            .chat(chat_req(json!({ "prompt": "a" })))
            .await,
        handler_for(&bad, Duration::from_secs(10))
            .chat(chat_req(json!({ "prompt": "a" })))
            .await,
        handler_for(&ok, Duration::from_secs(10))
            .analyze_file(analyze_req(json!({ "filePath": "/no/such/file" })))
            .await,
    ];

    for resp in responses {
        let result = resp.into_call_tool_result();
        let json = serde_json::to_value(&result).unwrap();
        let content = json["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");
        assert!(!json["isError"].as_bool().unwrap_or(false));
    }
}
