//! remotekit - run commands and file actions on named SSH targets

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use remotekit::cli::{Cli, report_error};

/// Environment variable holding an explicit log filter.
const LOG_ENV: &str = "REMOTEKIT_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (json, no_color) = (cli.json, cli.no_color);
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            report_error(&e, json, no_color)
        }
    }
}

/// Logs go to stderr so they never mix with command output.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
