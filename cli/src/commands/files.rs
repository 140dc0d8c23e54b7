//! File and directory commands: `ls`, `rm`, `cp`, `mkdir`, `cat`, `stat`,
//! `put`, `get`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;
use serde_json::json;

use crate::app::AppContext;
use crate::application::services::file_actions::{self, FileContent};
use crate::application::services::{dir_actions, remote_command::DEFAULT_COMMAND_TIMEOUT};
use crate::output::progress;

/// Target selection shared by every file command.
#[derive(Args)]
pub struct TargetArgs {
    /// Target name from the targets file
    pub target: String,

    /// Seconds to wait for the remote side
    #[arg(long, default_value_t = DEFAULT_COMMAND_TIMEOUT.as_secs())]
    pub timeout: u64,
}

impl TargetArgs {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Arguments for commands taking a single remote path.
#[derive(Args)]
pub struct PathArgs {
    #[command(flatten)]
    pub remote: TargetArgs,

    /// Remote path
    pub path: String,
}

/// Arguments for `ls`.
#[derive(Args)]
pub struct LsArgs {
    #[command(flatten)]
    pub remote: TargetArgs,

    /// Remote directory
    #[arg(default_value = ".")]
    pub dir: String,
}

/// Arguments for `rm`.
#[derive(Args)]
pub struct RmArgs {
    #[command(flatten)]
    pub remote: TargetArgs,

    /// Remote path
    pub path: String,

    /// Remove a directory and everything below it
    #[arg(short, long)]
    pub recursive: bool,
}

/// Arguments for `cp`.
#[derive(Args)]
pub struct CpArgs {
    #[command(flatten)]
    pub remote: TargetArgs,

    /// Remote source path
    pub src: String,

    /// Remote destination path
    pub dst: String,

    /// Copy a directory's contents
    #[arg(short, long)]
    pub recursive: bool,
}

/// Arguments for `put`.
#[derive(Args)]
pub struct PutArgs {
    #[command(flatten)]
    pub remote: TargetArgs,

    /// Local file to upload
    pub local: PathBuf,

    /// Remote destination
    pub dst: String,
}

/// Arguments for `get`.
#[derive(Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub remote: TargetArgs,

    /// Remote file to download
    pub src: String,

    /// Local destination
    pub local: PathBuf,
}

/// List a remote directory.
///
/// # Errors
///
/// Returns an error if the directory does not exist or cannot be read.
pub async fn ls(app: &AppContext, args: &LsArgs) -> Result<ExitCode> {
    let remote = app.remote(&args.remote.target, args.remote.timeout());
    let entries = dir_actions::list(&remote, &args.dir).await?;
    app.renderer().listing(&entries)?;
    Ok(ExitCode::SUCCESS)
}

/// Remove a file, or with `-r` a directory tree.
///
/// # Errors
///
/// Returns an error if removal fails or the path is refused.
pub async fn rm(app: &AppContext, args: &RmArgs) -> Result<ExitCode> {
    let remote = app.remote(&args.remote.target, args.remote.timeout());
    if args.recursive {
        let prompt = format!(
            "Remove '{}' and everything below it on '{}'?",
            args.path, args.remote.target
        );
        // Scripts and --yes skip the prompt; a person at a terminal must opt in.
        if !app.non_interactive && !app.confirm(&prompt, false)? {
            app.output.warn("Cancelled.");
            return Ok(ExitCode::FAILURE);
        }
        dir_actions::remove(&remote, &args.path).await?;
    } else {
        file_actions::remove(&remote, &args.path).await?;
    }
    app.renderer().done(
        &format!("Removed {}", args.path),
        &json!({ "target": args.remote.target, "removed": args.path }),
    )?;
    Ok(ExitCode::SUCCESS)
}

/// Copy a file, or with `-r` a directory's contents, within the target.
///
/// # Errors
///
/// Returns an error if the source is missing or the copy fails.
pub async fn cp(app: &AppContext, args: &CpArgs) -> Result<ExitCode> {
    let remote = app.remote(&args.remote.target, args.remote.timeout());
    if args.recursive {
        dir_actions::copy(&remote, &args.src, &args.dst).await?;
    } else {
        file_actions::copy(&remote, &args.src, &args.dst).await?;
    }
    app.renderer().done(
        &format!("Copied {} to {}", args.src, args.dst),
        &json!({ "target": args.remote.target, "src": args.src, "dst": args.dst }),
    )?;
    Ok(ExitCode::SUCCESS)
}

/// Create a directory and its parents.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub async fn mkdir(app: &AppContext, args: &PathArgs) -> Result<ExitCode> {
    let remote = app.remote(&args.remote.target, args.remote.timeout());
    dir_actions::create(&remote, &args.path).await?;
    app.renderer().done(
        &format!("Created {}", args.path),
        &json!({ "target": args.remote.target, "created": args.path }),
    )?;
    Ok(ExitCode::SUCCESS)
}

/// Print a remote file. In JSON mode a file holding JSON is embedded as a
/// value rather than a string.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub async fn cat(app: &AppContext, args: &PathArgs) -> Result<ExitCode> {
    let remote = app.remote(&args.remote.target, args.remote.timeout());
    let content = if app.is_json() {
        file_actions::read(&remote, &args.path).await?
    } else {
        FileContent::Text(file_actions::read_text(&remote, &args.path).await?)
    };
    app.renderer().content(&args.path, &content)?;
    Ok(ExitCode::SUCCESS)
}

/// Show whether a path exists, its kind and where it resolves to.
///
/// # Errors
///
/// Returns an error if the probe cannot run.
pub async fn stat(app: &AppContext, args: &PathArgs) -> Result<ExitCode> {
    let remote = app.remote(&args.remote.target, args.remote.timeout());
    let stat = file_actions::stat(&remote, &args.path).await?;
    app.renderer().stat(&stat)?;
    Ok(if stat.exists() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Upload a local file.
///
/// # Errors
///
/// Returns an error if the local file is missing or the transfer fails.
pub async fn put(app: &AppContext, args: &PutArgs) -> Result<ExitCode> {
    if !args.local.is_file() {
        bail!("local file {} does not exist", args.local.display());
    }
    let remote = app.remote(&args.remote.target, args.remote.timeout());
    let message = format!(
        "Uploaded {} to {}:{}",
        args.local.display(),
        args.remote.target,
        args.dst
    );
    let detail = json!({
        "target": args.remote.target,
        "local": args.local.display().to_string(),
        "remote": args.dst,
    });

    if app.output.show_progress() && !app.is_json() {
        let pb = progress::spinner(&format!("Uploading {}...", args.local.display()));
        match file_actions::upload(&remote, &args.local, &args.dst).await {
            Ok(_) => progress::finish_ok(&pb, &message),
            Err(e) => {
                progress::finish_error(&pb);
                return Err(e.into());
            }
        }
    } else {
        file_actions::upload(&remote, &args.local, &args.dst).await?;
        app.renderer().done(&message, &detail)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Download a remote file.
///
/// # Errors
///
/// Returns an error if the remote file is missing or the transfer fails.
pub async fn get(app: &AppContext, args: &GetArgs) -> Result<ExitCode> {
    let remote = app.remote(&args.remote.target, args.remote.timeout());
    let message = format!(
        "Downloaded {}:{} to {}",
        args.remote.target,
        args.src,
        args.local.display()
    );
    let detail = json!({
        "target": args.remote.target,
        "remote": args.src,
        "local": args.local.display().to_string(),
    });

    if app.output.show_progress() && !app.is_json() {
        let pb = progress::spinner(&format!("Downloading {}...", args.src));
        match file_actions::download(&remote, &args.src, &args.local).await {
            Ok(_) => progress::finish_ok(&pb, &message),
            Err(e) => {
                progress::finish_error(&pb);
                return Err(e.into());
            }
        }
    } else {
        file_actions::download(&remote, &args.src, &args.local).await?;
        app.renderer().done(&message, &detail)?;
    }
    Ok(ExitCode::SUCCESS)
}
