//! Version command

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    app.renderer().version(env!("CARGO_PKG_VERSION"))?;
    Ok(ExitCode::SUCCESS)
}
