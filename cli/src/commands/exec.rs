//! `remotekit exec`: run a command on a target.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::remote_command::{DEFAULT_COMMAND_TIMEOUT, EXEC_COMMAND_ID};

/// Arguments for the exec command.
#[derive(Args)]
#[command(trailing_var_arg = true)]
pub struct ExecArgs {
    /// Target name from the targets file
    pub target: String,

    /// Seconds to wait before the command is stopped
    #[arg(long, default_value_t = DEFAULT_COMMAND_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Run under a remote terminal so a timeout also stops the remote command
    #[arg(short = 't', long)]
    pub tty: bool,

    /// Command and arguments, joined with spaces and run by the remote shell
    #[arg(required = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run a command on a target and mirror its exit code.
///
/// Remote stdout and stderr are relayed unchanged in human mode.
///
/// # Errors
///
/// Returns an error if the target cannot be resolved, reached, or the
/// command times out.
pub async fn run(app: &AppContext, args: &ExecArgs) -> Result<ExitCode> {
    let command = args.command.join(" ");
    let results = app
        .remote(&args.target, Duration::from_secs(args.timeout))
        .with_tty(args.tty)
        .run(EXEC_COMMAND_ID, &command)
        .await?;

    app.renderer().results(&results)?;
    Ok(ExitCode::from(u8::try_from(results.exit_code()).unwrap_or(1)))
}
