//! Application service: directory operations on a remote target.

use crate::application::ports::{RemoteExecutor, TargetResolver};
use crate::application::services::remote_command::Remote;
use crate::domain::listing::parse_long_listing;
use crate::domain::shell::{quote, validate_destructive_path, validate_remote_path};
use crate::domain::{DirEntry, FailureKind, RemoteError};

/// `true` if `dir` exists and is a directory.
///
/// # Errors
///
/// Connection, timeout, or a `test` failure other than "false".
pub async fn exists<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    dir: &str,
) -> Result<bool, RemoteError> {
    validate_remote_path(dir)?;
    let (found, _) = remote
        .probe("dir_exists", &format!("test -d {}", quote(dir)), dir)
        .await?;
    Ok(found)
}

/// Create `dir` and any missing parents. Succeeds if it already exists.
///
/// # Errors
///
/// `PermissionDenied` when a parent is not writable.
pub async fn create<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    dir: &str,
) -> Result<(), RemoteError> {
    validate_remote_path(dir)?;
    remote
        .run_checked("dir_create", &format!("mkdir -p -- {}", quote(dir)), dir)
        .await?;
    Ok(())
}

/// Remove `dir` recursively. Succeeds if it does not exist.
///
/// # Errors
///
/// `InvalidPath` for `/`, `PermissionDenied` when `rm` refuses.
pub async fn remove<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    dir: &str,
) -> Result<(), RemoteError> {
    validate_destructive_path(dir)?;
    remote
        .run_checked("dir_remove", &format!("rm -rf -- {}", quote(dir)), dir)
        .await?;
    Ok(())
}

/// List `dir`, sorted by name. A symlink to a directory lists the
/// directory it points at.
///
/// # Errors
///
/// `NotFound` when `dir` is missing or is not a directory.
pub async fn list<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    dir: &str,
) -> Result<Vec<DirEntry>, RemoteError> {
    validate_remote_path(dir)?;
    let (is_dir, probe) = remote
        .probe("dir_exists", &format!("test -d {}", quote(dir)), dir)
        .await?;
    if !is_dir {
        return Err(RemoteError::from_failure(
            FailureKind::NotFound,
            remote.target(),
            dir,
            probe,
        ));
    }
    let results = remote
        .run_checked("dir_list", &list_command(dir), dir)
        .await?;
    Ok(parse_long_listing(dir, results.stdout()))
}

/// `ls -l` shows a symlink operand as itself; the trailing slash makes it
/// descend into the directory.
fn list_command(dir: &str) -> String {
    let dir = format!("{}/", dir.trim_end_matches('/'));
    format!("LC_ALL=C ls -lA -- {}", quote(&dir))
}

/// Copy the contents of `src` into `dst`, creating `dst` first.
///
/// # Errors
///
/// `NotFound` when `src` does not exist.
pub async fn copy<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    src: &str,
    dst: &str,
) -> Result<(), RemoteError> {
    validate_remote_path(src)?;
    create(remote, dst).await?;
    let command = format!("cp -Rp -- {}/. {}", quote(src.trim_end_matches('/')), quote(dst));
    remote.run_checked("dir_copy", &command, src).await?;
    Ok(())
}

/// Remove everything inside `dir` except the entries named in `keep`.
///
/// # Errors
///
/// `InvalidPath` for `/` or a `keep` entry that is not a plain name,
/// `NotFound` when `dir` does not exist.
pub async fn clear<T: TargetResolver, E: RemoteExecutor>(
    remote: &Remote<'_, T, E>,
    dir: &str,
    keep: &[&str],
) -> Result<(), RemoteError> {
    validate_destructive_path(dir)?;
    for name in keep {
        if name.is_empty() || name.contains('/') || name.contains('\0') {
            return Err(RemoteError::InvalidPath {
                path: (*name).to_string(),
                reason: "entries to keep must be plain names".to_string(),
            });
        }
    }
    remote
        .run_checked("dir_clear", &clear_command(dir, keep), dir)
        .await?;
    Ok(())
}

fn clear_command(dir: &str, keep: &[&str]) -> String {
    let mut command = format!("find {} -mindepth 1 -maxdepth 1", quote(dir));
    for name in keep {
        command.push_str(" ! -name ");
        command.push_str(&quote(&escape_glob(name)));
    }
    command.push_str(" -exec rm -rf -- {} +");
    command
}

/// `find -name` takes a glob; match names literally.
fn escape_glob(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
