//! Infrastructure implementation of the `RemoteExecutor` and `FileTransfer`
//! ports on top of the system OpenSSH client.
//!
//! `OpenSshExecutor<R>` routes every `ssh`/`scp` call through a
//! `CommandRunner`, so tests can inject a mock runner without spawning real
//! processes.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use crate::application::ports::{
    CommandRequest, CommandRunner, FileTransfer, ProcessOutput, ProcessSpec, ProcessStatus,
    RemoteExecutor,
};
use crate::domain::shell::ssh_client_failure;
use crate::domain::{ConnectionParameters, Credential, RemoteError, RemoteResults};
use crate::infra::command_runner::TokioCommandRunner;

/// Exit status the OpenSSH client uses for its own failures.
const SSH_CLIENT_ERROR: i32 = 255;
/// `sshpass`: the password was rejected.
const SSHPASS_BAD_PASSWORD: i32 = 5;
/// `sshpass`: the host key is not known.
const SSHPASS_UNKNOWN_HOST_KEY: i32 = 6;

/// Environment variable overriding the `ssh` program.
pub const SSH_PROGRAM_ENV: &str = "REMOTEKIT_SSH";
/// Environment variable overriding the `scp` program.
pub const SCP_PROGRAM_ENV: &str = "REMOTEKIT_SCP";

/// `RemoteExecutor` backed by `ssh`, `scp` and (for password targets)
/// `sshpass`.
pub struct OpenSshExecutor<R: CommandRunner> {
    runner: R,
    ssh_program: String,
    scp_program: String,
    sshpass_program: String,
}

impl<R: CommandRunner> OpenSshExecutor<R> {
    /// Create an executor using the programs found on `PATH`.
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            ssh_program: "ssh".to_string(),
            scp_program: "scp".to_string(),
            sshpass_program: "sshpass".to_string(),
        }
    }

    /// Use different `ssh` and `scp` programs.
    #[must_use]
    pub fn with_programs(mut self, ssh: impl Into<String>, scp: impl Into<String>) -> Self {
        self.ssh_program = ssh.into();
        self.scp_program = scp.into();
        self
    }

    /// Use a different `sshpass` program.
    #[must_use]
    pub fn with_sshpass(mut self, sshpass: impl Into<String>) -> Self {
        self.sshpass_program = sshpass.into();
        self
    }

    #[must_use]
    pub fn ssh_program(&self) -> &str {
        &self.ssh_program
    }

    /// Full `ssh` invocation for `request` against `params`.
    #[must_use]
    pub fn ssh_spec(&self, params: &ConnectionParameters, request: &CommandRequest<'_>) -> ProcessSpec {
        let mut args = connection_options(params, "-p");
        if request.tty {
            args.push("-tt".to_string());
        }
        args.extend([
            "-l".to_string(),
            params.user.clone(),
            "--".to_string(),
            params.host.clone(),
            params.remote_command_line(request.command),
        ]);
        let spec = self.wrap(params, &self.ssh_program, args);
        match request.stdin {
            Some(input) => spec.stdin(input.to_vec()),
            None => spec,
        }
    }

    /// Full `scp` invocation copying `from` to `to`.
    #[must_use]
    pub fn scp_spec(&self, params: &ConnectionParameters, from: &str, to: &str) -> ProcessSpec {
        let mut args = connection_options(params, "-P");
        args.extend([
            "-p".to_string(),
            "--".to_string(),
            from.to_string(),
            to.to_string(),
        ]);
        self.wrap(params, &self.scp_program, args)
    }

    /// Run through `sshpass -e` when the target authenticates by password.
    fn wrap(&self, params: &ConnectionParameters, program: &str, args: Vec<String>) -> ProcessSpec {
        match &params.auth {
            Credential::Password { secret, .. } => ProcessSpec::new(&self.sshpass_program)
                .arg("-e")
                .arg(program)
                .args(args)
                .secret_env(
                    "SSHPASS",
                    SecretString::from(secret.expose_secret().to_string()),
                ),
            Credential::Agent | Credential::KeyFile(_) => ProcessSpec::new(program).args(args),
        }
    }

    async fn invoke(
        &self,
        params: &ConnectionParameters,
        command_id: &str,
        command: &str,
        spec: &ProcessSpec,
        timeout: Duration,
        transfer: bool,
    ) -> Result<RemoteResults, RemoteError> {
        debug!(
            target_name = %params.target,
            host = %params.host,
            port = params.port,
            auth = %params.auth.describe(),
            program = %spec.program,
            command_id,
            "starting remote command"
        );
        let outcome = self.runner.run(spec, timeout).await;
        interpret(params, command_id, command, outcome, timeout, transfer)
    }
}

impl OpenSshExecutor<TokioCommandRunner> {
    /// Convenience constructor for production use, honouring
    /// `REMOTEKIT_SSH` and `REMOTEKIT_SCP`.
    #[must_use]
    pub fn default_runner() -> Self {
        let ssh = std::env::var(SSH_PROGRAM_ENV).unwrap_or_else(|_| "ssh".to_string());
        let scp = std::env::var(SCP_PROGRAM_ENV).unwrap_or_else(|_| "scp".to_string());
        Self::new(TokioCommandRunner::new()).with_programs(ssh, scp)
    }
}

impl<R: CommandRunner> RemoteExecutor for OpenSshExecutor<R> {
    async fn execute(
        &self,
        params: &ConnectionParameters,
        request: &CommandRequest<'_>,
    ) -> Result<RemoteResults, RemoteError> {
        let spec = self.ssh_spec(params, request);
        self.invoke(
            params,
            request.command_id,
            request.command,
            &spec,
            request.timeout,
            false,
        )
        .await
    }
}

impl<R: CommandRunner> FileTransfer for OpenSshExecutor<R> {
    async fn upload(
        &self,
        params: &ConnectionParameters,
        local: &Path,
        remote: &str,
        timeout: Duration,
    ) -> Result<RemoteResults, RemoteError> {
        let local = local.display().to_string();
        let spec = self.scp_spec(params, &local, &remote_spec(params, remote));
        let command = format!("upload {local} -> {remote}");
        self.invoke(params, "file_upload", &command, &spec, timeout, true)
            .await
    }

    async fn download(
        &self,
        params: &ConnectionParameters,
        remote: &str,
        local: &Path,
        timeout: Duration,
    ) -> Result<RemoteResults, RemoteError> {
        let local = local.display().to_string();
        let spec = self.scp_spec(params, &remote_spec(params, remote), &local);
        let command = format!("download {remote} -> {local}");
        self.invoke(params, "file_download", &command, &spec, timeout, true)
            .await
    }
}

// ── Argument construction ────────────────────────────────────────────────────

fn connection_options(params: &ConnectionParameters, port_flag: &str) -> Vec<String> {
    let password = matches!(params.auth, Credential::Password { .. });
    let mut args = vec![
        "-o".to_string(),
        format!("BatchMode={}", if password { "no" } else { "yes" }),
        "-o".to_string(),
        "StrictHostKeyChecking=accept-new".to_string(),
        "-o".to_string(),
        format!("ConnectTimeout={}", params.connect_timeout.as_secs().max(1)),
        port_flag.to_string(),
        params.port.to_string(),
    ];
    match &params.auth {
        Credential::KeyFile(key) => args.extend([
            "-i".to_string(),
            key.display().to_string(),
            "-o".to_string(),
            "IdentitiesOnly=yes".to_string(),
        ]),
        Credential::Password { .. } => args.extend([
            "-o".to_string(),
            "PubkeyAuthentication=no".to_string(),
        ]),
        Credential::Agent => {}
    }
    args
}

/// `user@host:path` for scp, bracketing IPv6 literals and anchoring relative
/// paths at the target's remote directory.
fn remote_spec(params: &ConnectionParameters, path: &str) -> String {
    let host = if params.host.contains(':') {
        format!("[{}]", params.host)
    } else {
        params.host.clone()
    };
    let path = match &params.remote_dir {
        Some(dir) if !path.starts_with('/') => {
            format!("{}/{path}", dir.trim_end_matches('/'))
        }
        _ => path.to_string(),
    };
    format!("{}@{host}:{path}", params.user)
}

// ── Outcome mapping ──────────────────────────────────────────────────────────

fn interpret(
    params: &ConnectionParameters,
    command_id: &str,
    command: &str,
    outcome: Result<ProcessOutput>,
    timeout: Duration,
    transfer: bool,
) -> Result<RemoteResults, RemoteError> {
    let output = match outcome {
        Ok(output) => output,
        Err(e) => {
            debug!(target_name = %params.target, error = %format!("{e:#}"), "cannot start ssh client");
            return Err(RemoteError::Connection {
                target: params.target.clone(),
                reason: format!("{e:#}"),
                results: Box::new(RemoteResults::not_executed(
                    command_id,
                    command,
                    "",
                    "",
                    Duration::ZERO,
                )),
            });
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    trace!(command_id, %stdout, %stderr, "remote output");

    let code = match output.status {
        ProcessStatus::Exited(code) => code,
        ProcessStatus::TimedOut => {
            debug!(command_id, timeout_s = timeout.as_secs(), "remote command timed out");
            return Err(RemoteError::Timeout {
                target: params.target.clone(),
                timeout,
                results: Box::new(RemoteResults::not_executed(
                    command_id,
                    command,
                    stdout,
                    stderr,
                    output.elapsed,
                )),
            });
        }
        ProcessStatus::Signaled => {
            return Err(connection_error(
                params,
                "ssh client was terminated by a signal".to_string(),
                RemoteResults::not_executed(command_id, command, stdout, stderr, output.elapsed),
            ));
        }
    };

    if let Some(reason) = connection_failure(params, code, &stderr, transfer) {
        return Err(connection_error(
            params,
            reason,
            RemoteResults::not_executed(command_id, command, stdout, stderr, output.elapsed),
        ));
    }

    debug!(
        command_id,
        exit_code = code,
        elapsed_ms = u64::try_from(output.elapsed.as_millis()).unwrap_or(u64::MAX),
        "remote command exited"
    );
    Ok(RemoteResults::exited(
        command_id,
        command,
        code,
        stdout,
        stderr,
        output.elapsed,
    ))
}

/// Decide whether a completed client process failed to reach the remote
/// program at all.
fn connection_failure(
    params: &ConnectionParameters,
    code: i32,
    stderr: &str,
    transfer: bool,
) -> Option<String> {
    if code == 0 {
        return None;
    }
    if matches!(params.auth, Credential::Password { .. }) {
        match code {
            SSHPASS_BAD_PASSWORD => return Some("password rejected".to_string()),
            SSHPASS_UNKNOWN_HOST_KEY => return Some("host key is not known".to_string()),
            _ => {}
        }
    }
    if code == SSH_CLIENT_ERROR || transfer {
        return ssh_client_failure(stderr).map(str::to_string);
    }
    None
}

fn connection_error(params: &ConnectionParameters, reason: String, results: RemoteResults) -> RemoteError {
    debug!(target_name = %params.target, %reason, "connection failed");
    RemoteError::Connection {
        target: params.target.clone(),
        reason,
        results: Box::new(results),
    }
}
