//! Named remote targets and the connection parameters resolved from them.
//!
//! Pure functions only. No I/O, no async, no filesystem access. Anything the
//! resolver needs from the environment (home directory, password variables)
//! is passed in through [`Lookup`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::shell::quote;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level target file, `~/.remotekit/targets.yaml` by default.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TargetsConfig {
    /// Values applied to every target that does not set them.
    pub defaults: TargetDefaults,
    /// Named targets.
    pub targets: BTreeMap<String, TargetEntry>,
}

/// The `defaults` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TargetDefaults {
    pub user: Option<String>,
    /// Kept wide so out-of-range values surface as `ConfigInvalid`
    /// instead of a parse failure of the whole file.
    pub port: Option<i64>,
    pub key: Option<String>,
    /// Seconds.
    pub connect_timeout: Option<u64>,
}

/// One entry under `targets`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TargetEntry {
    pub host: Option<String>,
    pub port: Option<i64>,
    pub user: Option<String>,
    /// Private key file.
    pub key: Option<String>,
    /// Name of the environment variable holding the password.
    pub password_env: Option<String>,
    /// Authenticate through the running ssh-agent.
    pub agent: Option<bool>,
    /// Working directory on the remote host for every command.
    pub remote_dir: Option<String>,
    pub connect_timeout: Option<u64>,
}

// ── Resolved parameters ──────────────────────────────────────────────────────

/// How to authenticate against a target.
pub enum Credential {
    /// ssh-agent or the client's default identities.
    Agent,
    /// An explicit private key file.
    KeyFile(PathBuf),
    /// Password read from the environment variable `env` at resolve time.
    Password { env: String, secret: SecretString },
}

impl Credential {
    /// Short description that never includes secret material.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Agent => "ssh-agent".to_string(),
            Self::KeyFile(path) => format!("key {}", path.display()),
            Self::Password { env, .. } => format!("password from ${env}"),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Everything needed to open one connection to one target.
///
/// Built from configuration at call time and dropped after the call.
#[derive(Debug)]
pub struct ConnectionParameters {
    pub target: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub auth: Credential,
    pub remote_dir: Option<String>,
    pub connect_timeout: Duration,
}

impl ConnectionParameters {
    /// The command line actually sent to the remote shell: `command`,
    /// run from `remote_dir` when the target defines one.
    #[must_use]
    pub fn remote_command_line(&self, command: &str) -> String {
        match &self.remote_dir {
            Some(dir) => format!("cd {} && {command}", quote(dir)),
            None => command.to_string(),
        }
    }
}

/// What `targets show` and `targets list` print: everything except secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSummary {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub auth: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_dir: Option<String>,
    pub connect_timeout_secs: u64,
}

impl From<&ConnectionParameters> for TargetSummary {
    fn from(params: &ConnectionParameters) -> Self {
        Self {
            name: params.target.clone(),
            host: params.host.clone(),
            port: params.port,
            user: params.user.clone(),
            auth: params.auth.describe(),
            remote_dir: params.remote_dir.clone(),
            connect_timeout_secs: params.connect_timeout.as_secs(),
        }
    }
}

/// One line of `targets list`: a target that resolves, or why it does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TargetRow {
    Valid(TargetSummary),
    Invalid { name: String, error: String },
}

/// Environment access needed during resolution.
pub trait Lookup {
    /// Value of an environment variable, if set.
    fn var(&self, name: &str) -> Option<String>;
    /// The local user's home directory, used to expand `~/` in key paths.
    fn home_dir(&self) -> Option<PathBuf>;
}

// ── Resolution ───────────────────────────────────────────────────────────────

impl TargetsConfig {
    /// Names of all configured targets, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Resolve `name` into validated connection parameters.
    ///
    /// # Errors
    ///
    /// `ConfigError::NotFound` when the name is blank or no such target exists and
    /// `ConfigError::Invalid` when a field is missing or malformed.
    pub fn resolve(&self, name: &str, env: &impl Lookup) -> Result<ConnectionParameters, ConfigError> {
        let entry = self
            .targets
            .get(name)
            .filter(|_| !name.trim().is_empty())
            .ok_or_else(|| ConfigError::NotFound {
                target: name.to_string(),
            })?;

        let host = entry
            .host
            .as_deref()
            .ok_or_else(|| ConfigError::invalid(name, "host", "missing"))?;
        validate_word(name, "host", host)?;
        if host.starts_with('-') {
            return Err(ConfigError::invalid(name, "host", "must not start with '-'"));
        }

        let user = entry
            .user
            .as_deref()
            .or(self.defaults.user.as_deref())
            .ok_or_else(|| ConfigError::invalid(name, "user", "missing (set it on the target or in defaults)"))?;
        validate_word(name, "user", user)?;

        let port = validate_port(name, entry.port.or(self.defaults.port))?;
        let auth = resolve_credential(name, entry, &self.defaults, env)?;

        let remote_dir = match entry.remote_dir.as_deref().map(str::trim) {
            Some("") => return Err(ConfigError::invalid(name, "remote_dir", "is empty")),
            Some(dir) => Some(dir.to_string()),
            None => None,
        };

        let connect_timeout = entry
            .connect_timeout
            .or(self.defaults.connect_timeout)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        if connect_timeout == 0 {
            return Err(ConfigError::invalid(name, "connect_timeout", "must be at least 1 second"));
        }

        Ok(ConnectionParameters {
            target: name.to_string(),
            host: host.to_string(),
            port,
            user: user.to_string(),
            auth,
            remote_dir,
            connect_timeout: Duration::from_secs(connect_timeout),
        })
    }
}

fn validate_word(target: &str, field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::invalid(target, field, "is empty"));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::invalid(
            target,
            field,
            format!("{value:?} contains whitespace or control characters"),
        ));
    }
    Ok(())
}

fn validate_port(target: &str, port: Option<i64>) -> Result<u16, ConfigError> {
    let Some(port) = port else {
        return Ok(DEFAULT_SSH_PORT);
    };
    match u16::try_from(port) {
        Ok(p) if p >= 1 => Ok(p),
        _ => Err(ConfigError::invalid(
            target,
            "port",
            format!("{port} is not between 1 and 65535"),
        )),
    }
}

fn resolve_credential(
    target: &str,
    entry: &TargetEntry,
    defaults: &TargetDefaults,
    env: &impl Lookup,
) -> Result<Credential, ConfigError> {
    let agent = entry.agent.unwrap_or(false);
    let chosen = usize::from(entry.key.is_some())
        + usize::from(entry.password_env.is_some())
        + usize::from(agent);
    if chosen > 1 {
        return Err(ConfigError::invalid(
            target,
            "credential",
            "set only one of key, password_env or agent",
        ));
    }

    if let Some(var) = entry.password_env.as_deref() {
        if var.trim().is_empty() {
            return Err(ConfigError::invalid(target, "password_env", "is empty"));
        }
        let secret = env.var(var).ok_or_else(|| {
            ConfigError::invalid(target, "password_env", format!("${var} is not set"))
        })?;
        return Ok(Credential::Password {
            env: var.to_string(),
            secret: SecretString::from(secret),
        });
    }
    if agent {
        return Ok(Credential::Agent);
    }
    match entry.key.as_deref().or(defaults.key.as_deref()) {
        Some(key) => Ok(Credential::KeyFile(expand_home(target, key, env)?)),
        None => Ok(Credential::Agent),
    }
}

fn expand_home(target: &str, key: &str, env: &impl Lookup) -> Result<PathBuf, ConfigError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::invalid(target, "key", "is empty"));
    }
    let Some(rest) = key.strip_prefix("~/") else {
        return Ok(Path::new(key).to_path_buf());
    };
    let home = env
        .home_dir()
        .ok_or_else(|| ConfigError::invalid(target, "key", "cannot expand '~': no home directory"))?;
    Ok(home.join(rest))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
