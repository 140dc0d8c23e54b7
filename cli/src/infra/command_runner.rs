//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill.

use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

use crate::application::ports::{CommandRunner, ProcessOutput, ProcessSpec, ProcessStatus};

/// How long to keep collecting output after the child exits or is killed.
///
/// Descendants of a killed child can hold the pipes open indefinitely.
pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Production `CommandRunner`.
///
/// Uses `tokio::select!` with an explicit `child.kill()` so a timed-out
/// process is terminated rather than orphaned, and collects output into
/// shared buffers so whatever was printed before the kill is kept.
pub struct TokioCommandRunner {
    drain_grace: Duration,
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            drain_grace: DEFAULT_DRAIN_GRACE,
        }
    }

    #[must_use]
    pub fn with_drain_grace(mut self, grace: Duration) -> Self {
        self.drain_grace = grace;
        self
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, spec: &ProcessSpec, timeout: Duration) -> Result<ProcessOutput> {
        let started = Instant::now();
        let mut command = tokio::process::Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &spec.env {
            command.env(key, value.expose_secret());
        }
        let mut child = command
            .spawn()
            .with_context(|| format!("failed to spawn {}", spec.program))?;

        let stdin_task = match (child.stdin.take(), spec.stdin.clone()) {
            (Some(mut pipe), Some(input)) => Some(tokio::spawn(async move {
                let _ = pipe.write_all(&input).await;
                let _ = pipe.shutdown().await;
            })),
            _ => None,
        };

        let stdout = Capture::default();
        let stderr = Capture::default();
        let mut readers: Vec<JoinHandle<()>> = Vec::with_capacity(2);
        if let Some(pipe) = child.stdout.take() {
            readers.push(tokio::spawn(stdout.clone().fill(pipe)));
        }
        if let Some(pipe) = child.stderr.take() {
            readers.push(tokio::spawn(stderr.clone().fill(pipe)));
        }

        let status = tokio::select! {
            status = child.wait() => {
                let status = status.with_context(|| format!("waiting for {}", spec.program))?;
                match status.code() {
                    Some(code) => ProcessStatus::Exited(code),
                    None => ProcessStatus::Signaled,
                }
            }
            () = tokio::time::sleep(timeout) => {
                trace!(program = %spec.program, "timed out, killing");
                let _ = child.kill().await;
                ProcessStatus::TimedOut
            }
        };

        let deadline = Instant::now() + self.drain_grace;
        for reader in &mut readers {
            if tokio::time::timeout_at(deadline, &mut *reader).await.is_err() {
                reader.abort();
            }
        }
        if let Some(task) = stdin_task {
            task.abort();
        }

        Ok(ProcessOutput {
            status,
            stdout: stdout.take(),
            stderr: stderr.take(),
            elapsed: started.elapsed(),
        })
    }
}

/// Output buffer shared between a reader task and the runner.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    async fn fill(self, mut pipe: impl AsyncRead + Unpin) {
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => self.push(&chunk[..n]),
            }
        }
    }

    fn push(&self, bytes: &[u8]) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
    }

    fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
