//! Application service: file operations on a remote target.
//!
//! Each action is a fixed command template over single-quoted paths, run
//! through [`Remote`]. Non-zero exits are classified from stderr.

use std::path::Path;

use serde::Serialize;

use crate::application::ports::{FileTransfer, RemoteExecutor, TargetResolver};
use crate::application::services::remote_command::Remote;
use crate::domain::shell::{quote, validate_remote_path};
use crate::domain::{FailureKind, PathStat, RemoteError, RemoteResults};

/// Contents of a remote file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FileContent {
    /// The file parsed as JSON.
    Json(serde_json::Value),
    /// Anything else, verbatim.
    Text(String),
}

impl FileContent {
    fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }
}

/// `true` if `path` exists (any kind).
///
/// # Errors
///
/// Connection, timeout, or a `test` failure other than "false".
pub async fn exists<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    path: &str,
) -> Result<bool, RemoteError> {
    validate_remote_path(path)?;
    let (found, _) = remote
        .probe("file_exists", &format!("test -e {}", quote(path)), path)
        .await?;
    Ok(found)
}

/// Existence of several paths with one remote command, in input order.
///
/// # Errors
///
/// As [`exists`]; `CommandFailed` if the remote output cannot be matched
/// back to the paths.
pub async fn exists_many<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    paths: &[&str],
) -> Result<Vec<(String, bool)>, RemoteError> {
    if paths.is_empty() {
        return Ok(Vec::new());
    }
    for path in paths {
        validate_remote_path(path)?;
    }
    let words: Vec<String> = paths.iter().map(|p| quote(p)).collect();
    let command = format!(
        "for p in {}; do if test -e \"$p\"; then echo 1; else echo 0; fi; done",
        words.join(" ")
    );
    let joined = paths.join(" ");
    let results = remote.run_checked("file_exists_many", &command, &joined).await?;

    let flags: Vec<bool> = results.stdout().lines().map(|l| l.trim() == "1").collect();
    if flags.len() != paths.len() {
        return Err(RemoteError::from_failure(
            FailureKind::Other,
            remote.target(),
            &joined,
            results,
        ));
    }
    Ok(paths
        .iter()
        .map(|p| (*p).to_string())
        .zip(flags)
        .collect())
}

/// `true` if `path` is a regular file.
///
/// # Errors
///
/// As [`exists`].
pub async fn is_file<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    path: &str,
) -> Result<bool, RemoteError> {
    validate_remote_path(path)?;
    let (found, _) = remote
        .probe("file_is_file", &format!("test -f {}", quote(path)), path)
        .await?;
    Ok(found)
}

/// Delete a file. Deleting a missing file succeeds.
///
/// # Errors
///
/// `PermissionDenied` or `CommandFailed` when `rm` refuses.
pub async fn remove<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    path: &str,
) -> Result<(), RemoteError> {
    validate_remote_path(path)?;
    remote
        .run_checked("file_remove", &format!("rm -f -- {}", quote(path)), path)
        .await?;
    Ok(())
}

/// Copy a file on the remote host, preserving mode and timestamps.
///
/// # Errors
///
/// `NotFound` when `src` is missing.
pub async fn copy<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    src: &str,
    dst: &str,
) -> Result<(), RemoteError> {
    validate_remote_path(src)?;
    validate_remote_path(dst)?;
    let command = format!("cp -p -- {} {}", quote(src), quote(dst));
    remote.run_checked("file_copy", &command, src).await?;
    Ok(())
}

/// Read a file, parsing it as JSON when possible.
///
/// # Errors
///
/// `NotFound` when the file is missing.
pub async fn read<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    path: &str,
) -> Result<FileContent, RemoteError> {
    let text = read_text(remote, path).await?;
    Ok(FileContent::from_text(text))
}

/// Read a file verbatim.
///
/// # Errors
///
/// `NotFound` when the file is missing.
pub async fn read_text<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    path: &str,
) -> Result<String, RemoteError> {
    validate_remote_path(path)?;
    let results = remote
        .run_checked("file_read", &format!("cat -- {}", quote(path)), path)
        .await?;
    Ok(results.stdout().to_string())
}

/// Replace the contents of `path` with `data`, streamed over stdin.
///
/// # Errors
///
/// `NotFound` when the parent directory is missing, `PermissionDenied`
/// when it is not writable.
pub async fn write<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    path: &str,
    data: &[u8],
) -> Result<(), RemoteError> {
    validate_remote_path(path)?;
    let results = remote
        .run_with_stdin("file_write", &format!("cat > {}", quote(path)), data)
        .await?;
    remote.check(path, results)?;
    Ok(())
}

/// Write `value` as pretty-printed JSON.
///
/// # Errors
///
/// As [`write`].
pub async fn write_json<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    path: &str,
    value: &serde_json::Value,
) -> Result<(), RemoteError> {
    let mut body = value.to_string();
    if let Ok(pretty) = serde_json::to_string_pretty(value) {
        body = pretty;
    }
    body.push('\n');
    write(remote, path, body.as_bytes()).await
}

/// Resolve symlinks and return the canonical absolute path.
///
/// # Errors
///
/// `NotFound` when `path` does not exist.
pub async fn follow<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    path: &str,
) -> Result<String, RemoteError> {
    validate_remote_path(path)?;
    let (found, probe) = remote
        .probe("file_exists", &format!("test -e {}", quote(path)), path)
        .await?;
    if !found {
        return Err(RemoteError::from_failure(
            FailureKind::NotFound,
            remote.target(),
            path,
            probe,
        ));
    }
    let results = remote
        .run_checked("file_follow", &format!("readlink -f -- {}", quote(path)), path)
        .await?;
    Ok(results.stdout_trimmed().to_string())
}

/// Probe what `path` is and where it resolves to, with one remote command.
///
/// A missing path is reported as [`crate::domain::PathKind::Missing`], not
/// as an error.
///
/// # Errors
///
/// Connection, timeout, or `CommandFailed` if the probe output is garbled.
pub async fn stat<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    path: &str,
) -> Result<PathStat, RemoteError> {
    validate_remote_path(path)?;
    let command = format!(
        "{{ p={}; if test -d \"$p\"; then echo directory; elif test -f \"$p\"; then echo file; \
         elif test -e \"$p\"; then echo other; else echo missing; exit 0; fi; readlink -f -- \"$p\"; }}",
        quote(path)
    );
    let results = remote.run_checked("file_stat", &command, path).await?;
    match PathStat::parse(path, results.stdout()) {
        Some(stat) => Ok(stat),
        None => Err(RemoteError::from_failure(
            FailureKind::Other,
            remote.target(),
            path,
            results,
        )),
    }
}

/// Copy a local file to the target.
///
/// # Errors
///
/// `NotFound` when either side is missing, plus the executor's errors.
pub async fn upload<T: TargetResolver, E: RemoteExecutor + FileTransfer>(
    remote: &Remote<'_, T, E>,
    local: &Path,
    dst: &str,
) -> Result<RemoteResults, RemoteError> {
    validate_remote_path(dst)?;
    let params = remote.resolve()?;
    let results = remote
        .executor()
        .upload(&params, local, dst, remote.timeout())
        .await?;
    remote.check(dst, results)
}

/// Copy a file from the target to `local`.
///
/// # Errors
///
/// `NotFound` when the remote file is missing, plus the executor's errors.
pub async fn download<T: TargetResolver, E: RemoteExecutor + FileTransfer>(
    remote: &Remote<'_, T, E>,
    src: &str,
    local: &Path,
) -> Result<RemoteResults, RemoteError> {
    validate_remote_path(src)?;
    let params = remote.resolve()?;
    let results = remote
        .executor()
        .download(&params, src, local, remote.timeout())
        .await?;
    remote.check(src, results)
}
