//! POSIX shell helpers for building remote command lines and reading their
//! diagnostics.

#![allow(clippy::expect_used)] // Regex patterns are compile-time constants

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::{FailureKind, RemoteError};

/// Diagnostics printed by the ssh client itself (never by the remote
/// program) when the session could not be established.
static CLIENT_FAILURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^ssh: .*|Permission denied \(.*\)|Host key verification failed|kex_exchange_identification: .*|Connection (?:closed|reset) by .*|Could not resolve hostname .*|Load key .*|Bad owner or permissions on .*|Connection timed out during banner exchange",
    )
    .expect("valid regex")
});

/// Quote `value` as a single POSIX shell word.
///
/// Embedded single quotes are written as `'\''`.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Classify the stderr of a failed coreutils command.
#[must_use]
pub fn classify_failure(stderr: &str) -> FailureKind {
    let lower = stderr.to_lowercase();
    if lower.contains("no such file or directory")
        || lower.contains("cannot access")
        || lower.contains("not found")
        || lower.contains("directory nonexistent")
    {
        FailureKind::NotFound
    } else if lower.contains("permission denied")
        || lower.contains("operation not permitted")
        || lower.contains("read-only file system")
    {
        FailureKind::PermissionDenied
    } else {
        FailureKind::Other
    }
}

/// The ssh client's own diagnostic line, when stderr contains one.
#[must_use]
pub fn ssh_client_failure(stderr: &str) -> Option<&str> {
    CLIENT_FAILURE.find(stderr).map(|m| m.as_str().trim())
}

/// Reject paths that can never be passed safely to a remote command.
///
/// # Errors
///
/// `RemoteError::InvalidPath` for an empty path or one containing NUL.
pub fn validate_remote_path(path: &str) -> Result<(), RemoteError> {
    if path.trim().is_empty() {
        return Err(invalid(path, "path is empty"));
    }
    if path.contains('\0') {
        return Err(invalid(path, "path contains a NUL byte"));
    }
    Ok(())
}

/// Like [`validate_remote_path`], and additionally refuse the filesystem root
/// for recursive deletes.
///
/// # Errors
///
/// `RemoteError::InvalidPath` for `/` (however many slashes) or any path
/// [`validate_remote_path`] rejects.
pub fn validate_destructive_path(path: &str) -> Result<(), RemoteError> {
    validate_remote_path(path)?;
    if path.trim().chars().all(|c| c == '/') {
        return Err(invalid(path, "refusing to recursively delete the root directory"));
    }
    Ok(())
}

fn invalid(path: &str, reason: &str) -> RemoteError {
    RemoteError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
