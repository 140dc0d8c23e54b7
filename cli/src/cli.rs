//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::domain::{ConfigError, RemoteError};
use crate::output::{OutputContext, json};

/// Run commands and manage files on remote hosts over SSH
#[derive(Parser)]
#[command(
    name = "remotekit",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (NO_COLOR is honoured as well)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to the targets file
    #[arg(long, global = true, env = "REMOTEKIT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a command on a target
    Exec(commands::exec::ExecArgs),

    /// List a remote directory
    Ls(commands::files::LsArgs),

    /// Remove a remote file or directory
    Rm(commands::files::RmArgs),

    /// Copy a file or directory on the target
    Cp(commands::files::CpArgs),

    /// Create a remote directory and its parents
    Mkdir(commands::files::PathArgs),

    /// Print a remote file
    Cat(commands::files::PathArgs),

    /// Show what a remote path is
    Stat(commands::files::PathArgs),

    /// Upload a local file
    Put(commands::files::PutArgs),

    /// Download a remote file
    Get(commands::files::GetArgs),

    /// Inspect configured targets
    #[command(subcommand)]
    Targets(commands::targets::TargetsCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails. The error keeps its typed
    /// source so [`exit_code_for`] can map it.
    pub async fn run(self) -> Result<ExitCode> {
        let flags = AppFlags {
            output: OutputFlags {
                no_color: self.no_color,
                quiet: self.quiet,
                json: self.json,
            },
            behaviour: BehaviourFlags { yes: self.yes },
            config: self.config,
        };
        let app = AppContext::new(&flags)?;

        match self.command {
            Command::Exec(args) => commands::exec::run(&app, &args).await,
            Command::Ls(args) => commands::files::ls(&app, &args).await,
            Command::Rm(args) => commands::files::rm(&app, &args).await,
            Command::Cp(args) => commands::files::cp(&app, &args).await,
            Command::Mkdir(args) => commands::files::mkdir(&app, &args).await,
            Command::Cat(args) => commands::files::cat(&app, &args).await,
            Command::Stat(args) => commands::files::stat(&app, &args).await,
            Command::Put(args) => commands::files::put(&app, &args).await,
            Command::Get(args) => commands::files::get(&app, &args).await,
            Command::Targets(cmd) => commands::targets::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}

// ── Error reporting ───────────────────────────────────────────────────────────

/// Process exit code for a failed command.
///
/// 3 for configuration problems, 4 when the target could not be reached,
/// 5 on timeout, 1 for everything else.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<RemoteError>() {
        return match e {
            RemoteError::Config(_) => 3,
            RemoteError::Connection { .. } => 4,
            RemoteError::Timeout { .. } => 5,
            _ => 1,
        };
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return 3;
    }
    1
}

/// Stable machine code for a failed command.
#[must_use]
pub fn error_code_for(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<RemoteError>() {
        return e.code();
    }
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        return e.code();
    }
    "error"
}

/// Report `err` the way the selected output mode expects and return the
/// process exit code.
pub fn report_error(err: &anyhow::Error, json_mode: bool, no_color: bool) -> ExitCode {
    let code = exit_code_for(err);
    if json_mode {
        match json::format_error(&format!("{err:#}"), error_code_for(err)) {
            Ok(text) => println!("{text}"),
            Err(_) => eprintln!("Error: {err:#}"),
        }
        return ExitCode::from(code);
    }

    // Whatever a timed-out command printed before it was stopped.
    if let Some(RemoteError::Timeout { results, .. }) = err.downcast_ref::<RemoteError>() {
        print!("{}", results.stdout());
        eprint!("{}", results.stderr());
    }
    OutputContext::new(no_color, false).error(&format!("{err:#}"));
    ExitCode::from(code)
}
