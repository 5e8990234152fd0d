//! Command-line construction for `codex exec`.
//!
//! Token order is fixed: subcommand, skip-check flag, model, sandbox,
//! full-auto, reasoning overrides, then the free-text prompt last.

use std::path::{Component, Path, PathBuf};

use crate::tools::enums::{ReasoningEffort, ReasoningSummary};

pub const EXEC_SUBCOMMAND: &str = "exec";
pub const SKIP_GIT_REPO_CHECK_FLAG: &str = "--skip-git-repo-check";
pub const MODEL_FLAG: &str = "--model";
pub const SANDBOX_FLAG: &str = "--sandbox";
pub const WORKSPACE_WRITE: &str = "workspace-write";
pub const FULL_AUTO_FLAG: &str = "--full-auto";
pub const CONFIG_OVERRIDE_FLAG: &str = "-c";

/// Request options with defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOptions {
    pub model: Option<String>,
    pub sandbox: bool,
    pub yolo: bool,
    pub reasoning_effort: ReasoningEffort,
    pub reasoning_summary: ReasoningSummary,
}

pub fn build_chat_args(prompt: &str, opts: &InvocationOptions) -> Vec<String> {
    let mut args = common_args(opts);
    args.push(prompt.to_string());
    args
}

/// `cwd` anchors a relative `file_path`; the builder never reads the
/// process working directory itself.
pub fn build_analyze_file_args(
    file_path: &str,
    prompt: Option<&str>,
    opts: &InvocationOptions,
    cwd: &Path,
) -> Vec<String> {
    let absolute = resolve_path(cwd, file_path);
    let mut args = common_args(opts);
    args.push(analysis_prompt(&absolute, prompt));
    args
}

/// `"<prompt>. Please analyze the file: <path>"`, or the bare request when
/// no prompt was given.
pub fn analysis_prompt(absolute: &Path, prompt: Option<&str>) -> String {
    match prompt.filter(|p| !p.is_empty()) {
        Some(p) => format!("{p}. Please analyze the file: {}", absolute.display()),
        None => format!("Please analyze this file: {}", absolute.display()),
    }
}

/// Lexically join `path` onto `cwd` and fold `.`/`..` away. No filesystem
/// access, so symlinks are left as written.
pub fn resolve_path(cwd: &Path, path: &str) -> PathBuf {
    let joined = cwd.join(path);
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn common_args(opts: &InvocationOptions) -> Vec<String> {
    let mut args = vec![
        EXEC_SUBCOMMAND.to_string(),
        SKIP_GIT_REPO_CHECK_FLAG.to_string(),
    ];

    if let Some(model) = opts.model.as_deref().filter(|m| !m.is_empty()) {
        args.push(MODEL_FLAG.to_string());
        args.push(model.to_string());
    }

    if opts.sandbox {
        args.push(SANDBOX_FLAG.to_string());
        args.push(WORKSPACE_WRITE.to_string());
    }

    if opts.yolo {
        args.push(FULL_AUTO_FLAG.to_string());
    }

    if opts.reasoning_effort != ReasoningEffort::default() {
        args.push(CONFIG_OVERRIDE_FLAG.to_string());
        args.push(format!(
            "model_reasoning_effort={}",
            opts.reasoning_effort.as_str()
        ));
    }

    if opts.reasoning_summary != ReasoningSummary::default() {
        args.push(CONFIG_OVERRIDE_FLAG.to_string());
        args.push(format!(
            "model_reasoning_summary={}",
            opts.reasoning_summary.as_str()
        ));
    }

    args
}
