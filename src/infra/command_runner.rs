//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::{CommandRunner, ExecSpec};

/// Default timeout for control-plane queries (`az ... show`, `terraform output`).
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(120);

/// Default timeout for stack lifecycle commands (`terraform apply`/`destroy`),
/// which block for real cloud provisioning durations.
pub const DEFAULT_LIFECYCLE_TIMEOUT: Duration = Duration::from_secs(3600);

/// Production `CommandRunner` — uses tokio for async process execution
/// with guaranteed timeout and kill on all platforms.
///
/// On Windows, `tokio::time::timeout` around `.output().await` does NOT kill
/// the child process when the timeout fires — the future is dropped but the
/// OS process keeps running. This implementation uses `tokio::select!` with
/// explicit `child.kill()` to guarantee the process is terminated.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, spec: &ExecSpec<'_>) -> Result<Output> {
        self.run_with_timeout(spec, self.timeout).await
    }

    async fn run_with_timeout(&self, spec: &ExecSpec<'_>, timeout: Duration) -> Result<Output> {
        let mut command = tokio::process::Command::new(spec.program);
        command
            .args(spec.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = spec.cwd {
            command.current_dir(cwd);
        }
        for (key, value) in spec.env {
            command.env(key, value);
        }
        let mut child = command
            .spawn()
            .with_context(|| format!("failed to spawn {}", spec.program))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    drain(&mut stdout_handle),
                    drain(&mut stderr_handle),
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {}", spec.program))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{} timed out after {}s", spec.program, timeout.as_secs())
            }
        }
    }
}

// Both pipes are drained concurrently with wait(); reading them one after
// the other can deadlock when the child fills the unread pipe's buffer.
async fn drain<R: tokio::io::AsyncRead + Unpin>(handle: &mut Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}
