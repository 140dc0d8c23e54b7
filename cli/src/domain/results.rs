//! `RemoteResults`, the outcome record of one remote command execution.

use std::time::Duration;

use serde::{Serialize, Serializer};

/// Outcome of a single remote invocation.
///
/// The exit code is fixed at construction: either the real status reported
/// by the remote process, or [`RemoteResults::NOT_EXECUTED`] when the
/// attempt never reached completion (connection failure, timeout). There are
/// no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteResults {
    command_id: String,
    command: String,
    exit_code: i32,
    stdout: String,
    stderr: String,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    duration: Duration,
}

impl RemoteResults {
    /// Sentinel exit code: the remote process never completed.
    pub const NOT_EXECUTED: i32 = -1;

    /// Results for a remote process that ran to completion.
    #[must_use]
    pub fn exited(
        command_id: impl Into<String>,
        command: impl Into<String>,
        exit_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            command_id: command_id.into(),
            command: command.into(),
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            duration,
        }
    }

    /// Results for an attempt that did not complete. Any output captured
    /// before the failure is kept.
    #[must_use]
    pub fn not_executed(
        command_id: impl Into<String>,
        command: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self::exited(
            command_id,
            command,
            Self::NOT_EXECUTED,
            stdout,
            stderr,
            duration,
        )
    }

    #[must_use]
    pub fn command_id(&self) -> &str {
        &self.command_id
    }

    /// The command line exactly as the caller supplied it.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// `true` when the remote process terminated and reported a status.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.exit_code != Self::NOT_EXECUTED
    }

    /// `true` when the process completed with exit code 0.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// `true` when either stream mentions `ERROR` (any case).
    #[must_use]
    pub fn has_error_markers(&self) -> bool {
        self.stdout.to_uppercase().contains("ERROR") || self.stderr.to_uppercase().contains("ERROR")
    }

    /// Stdout with surrounding whitespace removed.
    #[must_use]
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// First non-empty stderr line, for one-line diagnostics.
    #[must_use]
    pub fn stderr_summary(&self) -> &str {
        self.stderr
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("")
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}
