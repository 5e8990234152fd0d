use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodexError {
    #[error("{tool} requires a '{param}' parameter of type string")]
    MissingParameter {
        tool: &'static str,
        param: &'static str,
    },

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("failed to spawn {executable}: {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("process {executable} exited with code {code}: {stderr}")]
    ProcessExit {
        executable: String,
        code: i32,
        stderr: String,
    },

    #[error("process {executable} timed out after {after:?}")]
    Timeout { executable: String, after: Duration },

    #[error("process {executable} wrote more than {limit} bytes to {stream}")]
    OutputTooLarge {
        executable: String,
        stream: &'static str,
        limit: usize,
    },

    #[error("failed to read from {executable}: {source}")]
    Read {
        executable: String,
        #[source]
        source: std::io::Error,
    },
}

impl CodexError {
    /// Message safe to hand back to MCP clients inside a result envelope.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingParameter { .. } => self.to_string(),
            Self::FileNotFound(path) => format!("File not found: {path}"),
            Self::Spawn { executable, source } => {
                if source.kind() == std::io::ErrorKind::NotFound {
                    format!("{executable} not found ({source})")
                } else {
                    format!("failed to start {executable}: {source}")
                }
            }
            Self::ProcessExit {
                executable,
                code,
                stderr,
            } => {
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    format!("Command {executable} exited with code {code}")
                } else {
                    format!("Command {executable} exited with code {code}: {stderr}")
                }
            }
            Self::Timeout { executable, after } => {
                format!(
                    "Command {executable} timed out after {}",
                    format_duration(*after)
                )
            }
            Self::OutputTooLarge {
                executable,
                stream,
                limit,
            } => {
                format!(
                    "Command {executable} was stopped after writing more than {} MiB to {stream}",
                    limit / (1024 * 1024)
                )
            }
            Self::Read { executable, source } => {
                format!("failed to read output from {executable}: {source}")
            }
        }
    }
}

/// Whole seconds render as "N seconds", anything finer as milliseconds.
pub fn format_duration(d: Duration) -> String {
    if d.subsec_millis() == 0 && d.as_secs() > 0 {
        let secs = d.as_secs();
        if secs == 1 {
            "1 second".to_string()
        } else {
            format!("{secs} seconds")
        }
    } else {
        format!("{}ms", d.as_millis())
    }
}
