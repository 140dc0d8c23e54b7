//! Application service: run one command on a named target.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use tracing::{debug, info_span, Instrument as _};

use crate::application::ports::{CommandRequest, RemoteExecutor, TargetResolver};
use crate::domain::shell::classify_failure;
use crate::domain::{ConnectionParameters, RemoteError, RemoteResults};

/// Command id recorded for ad-hoc commands.
pub const EXEC_COMMAND_ID: &str = "exec";

/// Timeout used when the caller does not choose one.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolve `target` and run `command` on it.
///
/// A non-zero remote exit code is returned as data in the results.
///
/// # Errors
///
/// `RemoteError::Config` when the target cannot be resolved, otherwise
/// whatever the executor reports (`Connection`, `Timeout`).
pub async fn execute(
    targets: &impl TargetResolver,
    executor: &impl RemoteExecutor,
    target: &str,
    command: &str,
    timeout: Duration,
) -> Result<RemoteResults, RemoteError> {
    Remote::new(targets, executor, target)
        .with_timeout(timeout)
        .run(EXEC_COMMAND_ID, command)
        .await
}

/// A target bound to its resolver and executor.
///
/// Every call resolves the target again and opens its own connection;
/// nothing is cached between calls.
pub struct Remote<'a, T, E> {
    targets: &'a T,
    executor: &'a E,
    target: &'a str,
    timeout: Duration,
    tty: bool,
}

impl<'a, T: TargetResolver, E: RemoteExecutor> Remote<'a, T, E> {
    #[must_use]
    pub fn new(targets: &'a T, executor: &'a E, target: &'a str) -> Self {
        Self {
            targets,
            executor,
            target,
            timeout: DEFAULT_COMMAND_TIMEOUT,
            tty: false,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run commands under a remote terminal so a timeout also ends them.
    #[must_use]
    pub fn with_tty(mut self, tty: bool) -> Self {
        self.tty = tty;
        self
    }

    #[must_use]
    pub fn target(&self) -> &str {
        self.target
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn executor(&self) -> &E {
        self.executor
    }

    /// Resolve the bound target.
    ///
    /// # Errors
    ///
    /// `RemoteError::Config` when the target is unknown or invalid.
    pub fn resolve(&self) -> Result<ConnectionParameters, RemoteError> {
        Ok(self.targets.resolve(self.target)?)
    }

    /// Run `command` under `command_id`.
    ///
    /// # Errors
    ///
    /// See [`execute`].
    pub async fn run(&self, command_id: &str, command: &str) -> Result<RemoteResults, RemoteError> {
        self.send(CommandRequest::new(command_id, command, self.timeout).with_tty(self.tty))
            .await
    }

    /// Run `command` with `stdin` streamed to it.
    ///
    /// # Errors
    ///
    /// See [`execute`].
    pub async fn run_with_stdin(
        &self,
        command_id: &str,
        command: &str,
        stdin: &[u8],
    ) -> Result<RemoteResults, RemoteError> {
        self.send(CommandRequest::new(command_id, command, self.timeout).with_stdin(stdin))
            .await
    }

    /// Run `command` and turn a non-zero exit into an error about `path`.
    ///
    /// # Errors
    ///
    /// See [`execute`], plus `NotFound`, `PermissionDenied` or
    /// `CommandFailed` from the remote stderr.
    pub async fn run_checked(
        &self,
        command_id: &str,
        command: &str,
        path: &str,
    ) -> Result<RemoteResults, RemoteError> {
        let results = self.run(command_id, command).await?;
        self.check(path, results)
    }

    /// Run a `test`-style command: exit 0 is `true`, exit 1 is `false`.
    ///
    /// # Errors
    ///
    /// Any other exit status is classified like [`Remote::run_checked`].
    pub async fn probe(
        &self,
        command_id: &str,
        command: &str,
        path: &str,
    ) -> Result<(bool, RemoteResults), RemoteError> {
        let results = self.run(command_id, command).await?;
        match results.exit_code() {
            0 => Ok((true, results)),
            1 => Ok((false, results)),
            _ => self.check(path, results).map(|r| (false, r)),
        }
    }

    /// Pass successful results through; classify anything else.
    ///
    /// # Errors
    ///
    /// `NotFound`, `PermissionDenied` or `CommandFailed` for a non-zero exit.
    pub fn check(&self, path: &str, results: RemoteResults) -> Result<RemoteResults, RemoteError> {
        if results.is_success() {
            return Ok(results);
        }
        let kind = classify_failure(results.stderr());
        Err(RemoteError::from_failure(kind, self.target, path, results))
    }

    async fn send(&self, request: CommandRequest<'_>) -> Result<RemoteResults, RemoteError> {
        let span = info_span!("remote", target_name = self.target, command_id = request.command_id);
        async {
            let params = self.resolve()?;
            debug!(host = %params.host, port = params.port, "resolved target");
            let results = self.executor.execute(&params, &request).await?;
            debug!(
                exit_code = results.exit_code(),
                elapsed_ms = u64::try_from(results.duration().as_millis()).unwrap_or(u64::MAX),
                "command finished"
            );
            Ok(results)
        }
        .instrument(span)
        .await
    }
}
