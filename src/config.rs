use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::tools::enums::{ReasoningEffort, ReasoningSummary};

/// Executable invoked for every tool call unless overridden.
pub const DEFAULT_EXECUTABLE: &str = "codex";

/// AI calls routinely run for minutes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Config file looked up in the working directory when `CODEX_MCP_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "codex-mcp.toml";

/// Per-request defaults, applied before argument building so that
/// every request field is concrete by the time it reaches the builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationDefaults {
    /// Request `--sandbox workspace-write` when the caller does not say.
    pub sandbox: bool,
    /// Pass `--full-auto` when the caller does not say.
    pub yolo: bool,
    pub reasoning_effort: ReasoningEffort,
    pub reasoning_summary: ReasoningSummary,
}

impl Default for InvocationDefaults {
    fn default() -> Self {
        Self {
            sandbox: true,
            yolo: false,
            reasoning_effort: ReasoningEffort::Medium,
            reasoning_summary: ReasoningSummary::None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub executable: String,
    pub timeout: Duration,
    pub defaults: InvocationDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            defaults: InvocationDefaults::default(),
        }
    }
}

/// On-disk shape of `codex-mcp.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    executable: Option<String>,
    timeout_secs: Option<u64>,
    sandbox: Option<bool>,
    yolo: Option<bool>,
    reasoning_effort: Option<ReasoningEffort>,
    reasoning_summary: Option<ReasoningSummary>,
}

impl Config {
    /// Built-in defaults, then the TOML file, then environment variables.
    /// Bad values are logged and skipped; loading never fails.
    pub fn load() -> Self {
        let mut config = Self::default();

        let path = env::var("CODEX_MCP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        if path.exists() {
            config.merge_file(&path);
        }

        config.apply_env(|key| env::var(key).ok());
        config
    }

    fn merge_file(&mut self, path: &Path) {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read config file: {e}");
                return;
            }
        };
        if let Err(e) = self.merge_toml(&text) {
            tracing::warn!(path = %path.display(), "ignoring config file: {e}");
        }
    }

    /// Parse TOML text and layer it over the current values.
    pub fn merge_toml(&mut self, text: &str) -> Result<(), toml::de::Error> {
        let file: FileConfig = toml::from_str(text)?;
        self.apply_file(file);
        Ok(())
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(exe) = file.executable.filter(|e| !e.trim().is_empty()) {
            self.executable = exe;
        }
        match file.timeout_secs {
            Some(0) => tracing::warn!("timeout_secs = 0 in config file, keeping default"),
            Some(secs) => self.timeout = Duration::from_secs(secs),
            None => {}
        }
        if let Some(v) = file.sandbox {
            self.defaults.sandbox = v;
        }
        if let Some(v) = file.yolo {
            self.defaults.yolo = v;
        }
        if let Some(v) = file.reasoning_effort {
            self.defaults.reasoning_effort = v;
        }
        if let Some(v) = file.reasoning_summary {
            self.defaults.reasoning_summary = v;
        }
    }

    fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(exe) = get("CODEX_MCP_EXECUTABLE").filter(|e| !e.trim().is_empty()) {
            self.executable = exe;
        }

        if let Some(raw) = get("CODEX_MCP_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(0) | Err(_) => {
                    tracing::warn!(value = %raw, "invalid CODEX_MCP_TIMEOUT_SECS, keeping default")
                }
                Ok(secs) => self.timeout = Duration::from_secs(secs),
            }
        }

        if let Some(raw) = get("CODEX_MCP_SANDBOX") {
            match parse_bool(&raw) {
                Some(v) => self.defaults.sandbox = v,
                None => tracing::warn!(value = %raw, "invalid CODEX_MCP_SANDBOX, ignoring"),
            }
        }

        if let Some(raw) = get("CODEX_MCP_YOLO") {
            match parse_bool(&raw) {
                Some(v) => self.defaults.yolo = v,
                None => tracing::warn!(value = %raw, "invalid CODEX_MCP_YOLO, ignoring"),
            }
        }

        if let Some(raw) = get("CODEX_MCP_REASONING_EFFORT") {
            match ReasoningEffort::parse(&raw) {
                Some(v) => self.defaults.reasoning_effort = v,
                None => {
                    tracing::warn!(value = %raw, "invalid CODEX_MCP_REASONING_EFFORT, ignoring")
                }
            }
        }

        if let Some(raw) = get("CODEX_MCP_REASONING_SUMMARY") {
            match ReasoningSummary::parse(&raw) {
                Some(v) => self.defaults.reasoning_summary = v,
                None => {
                    tracing::warn!(value = %raw, "invalid CODEX_MCP_REASONING_SUMMARY, ignoring")
                }
            }
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
