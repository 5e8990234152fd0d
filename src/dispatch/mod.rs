pub mod cli;

use std::time::Duration;

/// Captured output of a subprocess that exited with code 0.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ProcessOutput {
    /// stdout when the tool wrote any, otherwise stderr.
    /// codex prints some answers on stderr only.
    pub fn into_text(self) -> String {
        if self.stdout.is_empty() {
            self.stderr
        } else {
            self.stdout
        }
    }
}
