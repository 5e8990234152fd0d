use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::dispatch::ProcessOutput;
use crate::error::CodexError;

pub const MAX_OUTPUT_BYTES: usize = 2 * 1024 * 1024; // 2MB

/// Runs one external command per call. Holds no state between calls, so
/// concurrent invocations each get their own child and their own timer.
pub struct CliDispatch {
    timeout: Duration,
}

impl CliDispatch {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Spawn `executable` with `args`, wait for it to exit, and return its output.
    ///
    /// - stdin is null; stdout and stderr are piped and drained concurrently
    /// - each stream is capped at MAX_OUTPUT_BYTES; reaching the cap kills the
    ///   group and fails with `OutputTooLarge`
    /// - the child leads its own process group so a kill reaches grandchildren
    /// - exit code 0 is the only success; stdout on a failed run is discarded
    /// - the timer lives inside this call and is gone once it returns
    pub async fn run(&self, executable: &str, args: &[String]) -> Result<ProcessOutput, CodexError> {
        let start = Instant::now();

        let mut cmd = Command::new(executable);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .kill_on_drop(true);

        tracing::debug!(executable, ?args, "spawning CLI process");

        let mut child = cmd.spawn().map_err(|source| CodexError::Spawn {
            executable: executable.to_string(),
            source,
        })?;

        // process_group(0) makes the child its own group leader (pgid == pid).
        let child_pid = child.id();

        let (Some(stdout_pipe), Some(stderr_pipe)) = (child.stdout.take(), child.stderr.take())
        else {
            kill_group(child_pid);
            return Err(CodexError::Read {
                executable: executable.to_string(),
                source: std::io::Error::other("stdout/stderr pipes were not captured"),
            });
        };

        let read_future = async {
            let mut stdout_handle = tokio::spawn(drain_capped(stdout_pipe, "stdout"));
            let mut stderr_handle = tokio::spawn(drain_capped(stderr_pipe, "stderr"));

            // If either stream hits the cap the child may block on a full pipe;
            // kill the group so the other reader sees EOF.
            let (stdout_buf, stderr_buf) = tokio::select! {
                result = &mut stdout_handle => {
                    let buf = result.unwrap_or_default();
                    if buf.len() >= MAX_OUTPUT_BYTES {
                        kill_group(child_pid);
                    }
                    (buf, stderr_handle.await.unwrap_or_default())
                }
                result = &mut stderr_handle => {
                    let buf = result.unwrap_or_default();
                    if buf.len() >= MAX_OUTPUT_BYTES {
                        kill_group(child_pid);
                    }
                    (stdout_handle.await.unwrap_or_default(), buf)
                }
            };
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((stdout_buf, stderr_buf, status))
        };

        let (stdout_raw, stderr_raw, status) =
            match tokio::time::timeout(self.timeout, read_future).await {
                Ok(result) => result.map_err(|source| CodexError::Read {
                    executable: executable.to_string(),
                    source,
                })?,
                Err(_) => {
                    kill_group(child_pid);
                    tracing::warn!(
                        executable,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "CLI process timed out"
                    );
                    return Err(CodexError::Timeout {
                        executable: executable.to_string(),
                        after: self.timeout,
                    });
                }
            };

        // The group was killed on cap breach, so the exit status says nothing
        // about the run itself.
        let overflowed = if stdout_raw.len() >= MAX_OUTPUT_BYTES {
            Some("stdout")
        } else if stderr_raw.len() >= MAX_OUTPUT_BYTES {
            Some("stderr")
        } else {
            None
        };
        if let Some(stream) = overflowed {
            tracing::warn!(executable, stream, "CLI output exceeded limit");
            return Err(CodexError::OutputTooLarge {
                executable: executable.to_string(),
                stream,
                limit: MAX_OUTPUT_BYTES,
            });
        }

        let stdout = String::from_utf8_lossy(&stdout_raw).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_raw).into_owned();

        if !status.success() {
            // No exit code means the child died from a signal.
            let code = status.code().unwrap_or(-1);
            tracing::warn!(executable, code, "CLI process failed");
            return Err(CodexError::ProcessExit {
                executable: executable.to_string(),
                code,
                stderr,
            });
        }

        if !stderr.is_empty() {
            tracing::debug!(executable, stderr = %stderr, "CLI stderr output");
        }

        Ok(ProcessOutput {
            stdout,
            stderr,
            duration: start.elapsed(),
        })
    }
}

async fn drain_capped<R>(pipe: R, name: &'static str) -> Vec<u8>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(MAX_OUTPUT_BYTES.min(64 * 1024));
    let mut capped = pipe.take(MAX_OUTPUT_BYTES as u64);
    if let Err(e) = capped.read_to_end(&mut buf).await {
        tracing::warn!("{name} pipe read error: {e}");
    }
    buf
}

/// SIGKILL the whole process group. start_kill() would only reach the leader,
/// leaving grandchildren holding the pipes open.
fn kill_group(pid: Option<u32>) {
    if let Some(pid) = pid {
        unsafe {
            libc::kill(-(pid as i32), libc::SIGKILL);
        }
    }
}
