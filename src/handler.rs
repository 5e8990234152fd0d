use std::path::PathBuf;

use crate::args::{build_analyze_file_args, build_chat_args};
use crate::config::Config;
use crate::dispatch::cli::CliDispatch;
use crate::error::CodexError;
use crate::response::ToolResponse;
use crate::tools::analyze_file::AnalyzeFileRequest;
use crate::tools::chat::ChatRequest;

/// Runs the `chat` and `analyzeFile` operations. Every path returns a
/// `ToolResponse`; nothing here fails towards the caller.
pub struct CodexHandler {
    config: Config,
    dispatch: CliDispatch,
}

impl CodexHandler {
    pub fn new(config: Config) -> Self {
        let dispatch = CliDispatch::new(config.timeout);
        Self { config, dispatch }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn chat(&self, req: ChatRequest) -> ToolResponse {
        let Some(prompt) = req.prompt.as_deref().filter(|p| !p.trim().is_empty()) else {
            return ToolResponse::rejected(
                CodexError::MissingParameter {
                    tool: "chat",
                    param: "prompt",
                }
                .user_message(),
            );
        };

        let opts = req.options(&self.config.defaults);
        let args = build_chat_args(prompt, &opts);
        self.execute("chat", &args).await
    }

    pub async fn analyze_file(&self, req: AnalyzeFileRequest) -> ToolResponse {
        let Some(file_path) = req.file_path.as_deref().filter(|p| !p.trim().is_empty()) else {
            return ToolResponse::rejected(
                CodexError::MissingParameter {
                    tool: "analyzeFile",
                    param: "filePath",
                }
                .user_message(),
            );
        };

        if !tokio::fs::try_exists(file_path).await.unwrap_or(false) {
            tracing::info!(file_path, "analyzeFile: file not found");
            return ToolResponse::rejected(
                CodexError::FileNotFound(file_path.to_string()).user_message(),
            );
        }

        let cwd = match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!("cannot read working directory: {e}");
                // Absolute paths still resolve without one.
                PathBuf::from("/")
            }
        };

        let opts = req.options(&self.config.defaults);
        let args = build_analyze_file_args(file_path, req.prompt.as_deref(), &opts, &cwd);
        self.execute("analyzeFile", &args).await
    }

    async fn execute(&self, tool: &'static str, args: &[String]) -> ToolResponse {
        let executable = &self.config.executable;
        match self.dispatch.run(executable, args).await {
            Ok(output) => {
                tracing::info!(
                    tool,
                    duration_ms = output.duration.as_millis() as u64,
                    stdout_bytes = output.stdout.len(),
                    "codex run finished"
                );
                ToolResponse::text(output.into_text())
            }
            Err(e) => {
                tracing::warn!(tool, "codex run failed: {e}");
                ToolResponse::execution_failed(e.user_message())
            }
        }
    }
}
