//! `remotekit targets`: inspect configured targets.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::TargetStore as _;
use crate::application::services::target_catalog;
use crate::infra::config::ProcessEnv;

/// Targets subcommands.
#[derive(Subcommand)]
pub enum TargetsCommand {
    /// List configured targets
    List,
    /// Show one target's resolved settings
    Show {
        /// Target name
        name: String,
    },
}

/// Run a targets subcommand.
///
/// # Errors
///
/// Returns an error if the targets file cannot be read or the named target
/// does not resolve.
pub fn run(app: &AppContext, cmd: TargetsCommand) -> Result<ExitCode> {
    match cmd {
        TargetsCommand::List => {
            let rows = target_catalog::list(&app.targets, &ProcessEnv)?;
            app.renderer().targets(&rows, app.targets.path())?;
        }
        TargetsCommand::Show { name } => {
            let summary = target_catalog::show(&app.targets, &name)?;
            app.renderer().target(&summary)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
