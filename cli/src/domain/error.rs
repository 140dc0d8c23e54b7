//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::results::RemoteResults;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while resolving a named target from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Target '{target}' not found. Run 'remotekit targets list' to see configured targets.")]
    NotFound { target: String },

    #[error("Target '{target}' has an invalid {field}: {reason}")]
    Invalid {
        target: String,
        field: &'static str,
        reason: String,
    },

    #[error("Cannot read configuration {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },
}

impl ConfigError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "config_not_found",
            Self::Invalid { .. } => "config_invalid",
            Self::Unreadable { .. } => "config_unreadable",
        }
    }

    pub(crate) fn invalid(target: &str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            target: target.to_string(),
            field,
            reason: reason.into(),
        }
    }
}

// ── Remote execution errors ───────────────────────────────────────────────────

/// Why a remote invocation (or a composed file/directory action) failed.
///
/// A remote program that ran and exited non-zero is *not* an error at the
/// `execute` level; only the composed actions turn specific exit codes into
/// `NotFound`, `PermissionDenied` or `CommandFailed`.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot connect to '{target}': {reason}")]
    Connection {
        target: String,
        reason: String,
        results: Box<RemoteResults>,
    },

    /// The local ssh client was stopped after `timeout`. Without a remote
    /// terminal the remote command is not signalled and may still be running.
    #[error("Command on '{target}' timed out after {}s: {}", .timeout.as_secs(), .results.command())]
    Timeout {
        target: String,
        timeout: Duration,
        results: Box<RemoteResults>,
    },

    #[error("'{path}' not found on '{target}'")]
    NotFound {
        target: String,
        path: String,
        results: Box<RemoteResults>,
    },

    #[error("Permission denied for '{path}' on '{target}'")]
    PermissionDenied {
        target: String,
        path: String,
        results: Box<RemoteResults>,
    },

    #[error("{} failed on '{target}' (exit code {}): {}", .results.command_id(), .results.exit_code(), .results.stderr_summary())]
    CommandFailed {
        target: String,
        path: String,
        results: Box<RemoteResults>,
    },

    #[error("Refusing to operate on '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

/// How a failed remote shell command explained itself on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    PermissionDenied,
    Other,
}

impl RemoteError {
    /// Build the error for a composed action whose command exited non-zero.
    #[must_use]
    pub fn from_failure(kind: FailureKind, target: &str, path: &str, results: RemoteResults) -> Self {
        let target = target.to_string();
        let path = path.to_string();
        let results = Box::new(results);
        match kind {
            FailureKind::NotFound => Self::NotFound {
                target,
                path,
                results,
            },
            FailureKind::PermissionDenied => Self::PermissionDenied {
                target,
                path,
                results,
            },
            FailureKind::Other => Self::CommandFailed {
                target,
                path,
                results,
            },
        }
    }

    /// Stable machine-readable code, used by JSON output and exit codes.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.code(),
            Self::Connection { .. } => "connection",
            Self::Timeout { .. } => "timeout",
            Self::NotFound { .. } => "not_found",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::CommandFailed { .. } => "command_failed",
            Self::InvalidPath { .. } => "invalid_path",
        }
    }

    /// The results captured before the failure, when a command was attempted.
    #[must_use]
    pub fn results(&self) -> Option<&RemoteResults> {
        match self {
            Self::Connection { results, .. }
            | Self::Timeout { results, .. }
            | Self::NotFound { results, .. }
            | Self::PermissionDenied { results, .. }
            | Self::CommandFailed { results, .. } => Some(&**results),
            Self::Config(_) | Self::InvalidPath { .. } => None,
        }
    }

    /// The target the failed operation was aimed at, when known.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Config(ConfigError::NotFound { target } | ConfigError::Invalid { target, .. })
            | Self::Connection { target, .. }
            | Self::Timeout { target, .. }
            | Self::NotFound { target, .. }
            | Self::PermissionDenied { target, .. }
            | Self::CommandFailed { target, .. } => Some(target.as_str()),
            Self::Config(ConfigError::Unreadable { .. }) | Self::InvalidPath { .. } => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
