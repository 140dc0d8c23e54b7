//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`. Never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use secrecy::SecretString;

use crate::domain::{ConfigError, ConnectionParameters, RemoteError, RemoteResults, TargetsConfig};

// ── Value Types ───────────────────────────────────────────────────────────────

/// One command to run on a remote target.
#[derive(Debug, Clone, Copy)]
pub struct CommandRequest<'a> {
    /// Identifier used in logs and results (`"exec"` for ad-hoc commands).
    pub command_id: &'a str,
    /// Shell command line, sent verbatim.
    pub command: &'a str,
    /// Upper bound on the whole invocation.
    pub timeout: Duration,
    /// Bytes streamed to the remote command's stdin.
    pub stdin: Option<&'a [u8]>,
    /// Allocate a remote terminal. Closing the session then hangs up the
    /// remote command, at the cost of merging its stderr into stdout.
    pub tty: bool,
}

impl<'a> CommandRequest<'a> {
    #[must_use]
    pub fn new(command_id: &'a str, command: &'a str, timeout: Duration) -> Self {
        Self {
            command_id,
            command,
            timeout,
            stdin: None,
            tty: false,
        }
    }

    #[must_use]
    pub fn with_stdin(mut self, stdin: &'a [u8]) -> Self {
        self.stdin = Some(stdin);
        self
    }

    #[must_use]
    pub fn with_tty(mut self, tty: bool) -> Self {
        self.tty = tty;
        self
    }
}

/// A local process invocation.
///
/// Intentionally not `Debug`: `env` may hold secrets.
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment variables for the child only.
    pub env: Vec<(String, SecretString)>,
    pub stdin: Option<Vec<u8>>,
}

impl ProcessSpec {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            stdin: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn secret_env(mut self, key: impl Into<String>, value: SecretString) -> Self {
        self.env.push((key.into(), value));
        self
    }

    #[must_use]
    pub fn stdin(mut self, input: Vec<u8>) -> Self {
        self.stdin = Some(input);
        self
    }
}

/// How a local process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Exited on its own with this status code.
    Exited(i32),
    /// Terminated by a signal.
    Signaled,
    /// Killed by the runner when the timeout elapsed.
    TimedOut,
}

/// Everything captured from a local process, including partial output of a
/// process that timed out.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ProcessStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub elapsed: Duration,
}

// ── Target Ports ──────────────────────────────────────────────────────────────

/// Turns a target name into connection parameters.
pub trait TargetResolver {
    /// Resolve `target` against the current configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the target is unknown, invalid, or the
    /// configuration cannot be read.
    fn resolve(&self, target: &str) -> Result<ConnectionParameters, ConfigError>;
}

/// Access to the whole target configuration, for listing and display.
pub trait TargetStore: TargetResolver {
    /// Load all targets. A missing file is an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Unreadable` when the file exists but cannot be
    /// read or parsed.
    fn load(&self) -> Result<TargetsConfig, ConfigError>;

    /// Where the configuration lives.
    fn path(&self) -> &Path;
}

// ── Remote Ports ──────────────────────────────────────────────────────────────

/// Runs one shell command on a remote host.
#[allow(async_fn_in_trait)]
pub trait RemoteExecutor {
    /// Execute `request` on the host described by `params`.
    ///
    /// A command that runs and exits non-zero is `Ok`.
    ///
    /// # Errors
    ///
    /// `RemoteError::Connection` when the session cannot be established and
    /// `RemoteError::Timeout` (with partial output) when `request.timeout`
    /// elapses. A timeout stops the local session only; unless
    /// `request.tty` is set the remote command may keep running.
    async fn execute(
        &self,
        params: &ConnectionParameters,
        request: &CommandRequest<'_>,
    ) -> Result<RemoteResults, RemoteError>;
}

/// Copies whole files between the local machine and a remote host.
#[allow(async_fn_in_trait)]
pub trait FileTransfer {
    /// Copy `local` to `remote` on the target.
    async fn upload(
        &self,
        params: &ConnectionParameters,
        local: &Path,
        remote: &str,
        timeout: Duration,
    ) -> Result<RemoteResults, RemoteError>;

    /// Copy `remote` on the target to `local`.
    async fn download(
        &self,
        params: &ConnectionParameters,
        remote: &str,
        local: &Path,
        timeout: Duration,
    ) -> Result<RemoteResults, RemoteError>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `spec` to completion or until `timeout`, capturing its output.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be spawned or awaited.
    /// A timeout is reported as [`ProcessStatus::TimedOut`]; the child must
    /// be killed, not left orphaned.
    async fn run(&self, spec: &ProcessSpec, timeout: Duration) -> Result<ProcessOutput>;
}

