//! Shared mock infrastructure for unit tests.
//!
//! Provides a static target table and a scripted executor so each test file
//! doesn't have to re-define the same boilerplate.

#![allow(clippy::expect_used, dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use remotekit::application::ports::{
    CommandRequest, FileTransfer, RemoteExecutor, TargetResolver, TargetStore,
};
use remotekit::domain::{
    ConfigError, ConnectionParameters, Lookup, RemoteError, RemoteResults, TargetsConfig,
};

// ── Targets ───────────────────────────────────────────────────────────────────

/// An empty environment: no variables, home at `/home/test`.
pub struct NoEnv;

impl Lookup for NoEnv {
    fn var(&self, _: &str) -> Option<String> {
        None
    }

    fn home_dir(&self) -> Option<PathBuf> {
        Some(PathBuf::from("/home/test"))
    }
}

/// Targets parsed from an inline YAML document.
pub struct StaticTargets {
    config: TargetsConfig,
}

impl StaticTargets {
    pub fn from_yaml(yaml: &str) -> Self {
        Self {
            config: serde_yaml::from_str(yaml).expect("valid targets yaml"),
        }
    }

    /// One target, `host1`, at `10.0.0.5` as `deploy`.
    pub fn host1() -> Self {
        Self::from_yaml("targets:\n  host1:\n    host: 10.0.0.5\n    user: deploy\n")
    }
}

impl TargetResolver for StaticTargets {
    fn resolve(&self, target: &str) -> Result<ConnectionParameters, ConfigError> {
        self.config.resolve(target, &NoEnv)
    }
}

impl TargetStore for StaticTargets {
    fn load(&self) -> Result<TargetsConfig, ConfigError> {
        Ok(self.config.clone())
    }

    fn path(&self) -> &Path {
        Path::new("/mock/targets.yaml")
    }
}

// ── Executor ──────────────────────────────────────────────────────────────────

/// What the scripted executor answers to the next call.
pub enum Reply {
    /// The command ran and exited with `code`.
    Exit {
        code: i32,
        stdout: &'static str,
        stderr: &'static str,
    },
    /// The ssh session could not be established.
    Unreachable,
    /// The command was stopped after printing `stdout`.
    TimedOut { stdout: &'static str },
}

impl Reply {
    pub fn ok(stdout: &'static str) -> Self {
        Self::Exit {
            code: 0,
            stdout,
            stderr: "",
        }
    }

    pub fn fail(code: i32, stderr: &'static str) -> Self {
        Self::Exit {
            code,
            stdout: "",
            stderr,
        }
    }
}

/// One call the executor received.
#[derive(Debug, Clone)]
pub struct Call {
    pub host: String,
    pub command_id: String,
    pub command: String,
    pub stdin: Option<Vec<u8>>,
    pub tty: bool,
}

/// Answers calls from a queue and records them.
///
/// Panics when called more often than it has replies.
#[derive(Default)]
pub struct ScriptedExecutor {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedExecutor {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.command).collect()
    }

    fn answer(
        &self,
        params: &ConnectionParameters,
        command_id: &str,
        command: &str,
        stdin: Option<&[u8]>,
        tty: bool,
        timeout: Duration,
    ) -> Result<RemoteResults, RemoteError> {
        self.calls.lock().expect("lock").push(Call {
            host: params.host.clone(),
            command_id: command_id.to_string(),
            command: command.to_string(),
            stdin: stdin.map(<[u8]>::to_vec),
            tty,
        });
        let reply = self
            .replies
            .lock()
            .expect("lock")
            .pop_front()
            .expect("unexpected remote call");
        match reply {
            Reply::Exit {
                code,
                stdout,
                stderr,
            } => Ok(RemoteResults::exited(
                command_id,
                command,
                code,
                stdout,
                stderr,
                Duration::from_millis(5),
            )),
            Reply::Unreachable => Err(RemoteError::Connection {
                target: params.target.clone(),
                reason: "ssh: connect to host 10.0.0.5 port 22: Connection refused".to_string(),
                results: Box::new(RemoteResults::not_executed(
                    command_id,
                    command,
                    "",
                    "ssh: connect to host 10.0.0.5 port 22: Connection refused",
                    Duration::from_millis(5),
                )),
            }),
            Reply::TimedOut { stdout } => Err(RemoteError::Timeout {
                target: params.target.clone(),
                timeout,
                results: Box::new(RemoteResults::not_executed(
                    command_id, command, stdout, "", timeout,
                )),
            }),
        }
    }
}

impl RemoteExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        params: &ConnectionParameters,
        request: &CommandRequest<'_>,
    ) -> Result<RemoteResults, RemoteError> {
        self.answer(
            params,
            request.command_id,
            request.command,
            request.stdin,
            request.tty,
            request.timeout,
        )
    }
}

impl FileTransfer for ScriptedExecutor {
    async fn upload(
        &self,
        params: &ConnectionParameters,
        local: &Path,
        remote: &str,
        timeout: Duration,
    ) -> Result<RemoteResults, RemoteError> {
        let command = format!("{} -> {remote}", local.display());
        self.answer(params, "upload", &command, None, false, timeout)
    }

    async fn download(
        &self,
        params: &ConnectionParameters,
        remote: &str,
        local: &Path,
        timeout: Duration,
    ) -> Result<RemoteResults, RemoteError> {
        let command = format!("{remote} -> {}", local.display());
        self.answer(params, "download", &command, None, false, timeout)
    }
}
