//! Application context: state passed to every command handler.
//!
//! `AppContext` owns the output context, the target store and the SSH
//! executor so command handlers take a single `&AppContext`.

use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::application::services::Remote;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlTargetStore;
use crate::infra::openssh::OpenSshExecutor;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `REMOTEKIT_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
    /// Explicit targets file, overriding the default location.
    pub config: Option<PathBuf>,
}

/// The production remote handle type.
pub type SshRemote<'a> = Remote<'a, YamlTargetStore, OpenSshExecutor<TokioCommandRunner>>;

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Where targets are read from.
    pub targets: YamlTargetStore,
    /// OpenSSH-backed executor.
    pub executor: OpenSshExecutor<TokioCommandRunner>,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, when the `CI` or `REMOTEKIT_YES`
    /// environment variables are present, or when stdin is not a terminal.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if no targets file was given and the home directory
    /// cannot be determined.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("REMOTEKIT_YES").is_ok();
        let non_interactive =
            flags.behaviour.yes || ci_env || !std::io::stdin().is_terminal();

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let targets = match &flags.config {
            Some(path) => YamlTargetStore::with_path(path),
            None => YamlTargetStore::new()?,
        };

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            targets,
            executor: OpenSshExecutor::default_runner(),
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// A handle on `target` using this context's store and executor.
    #[must_use]
    pub fn remote<'a>(&'a self, target: &'a str, timeout: Duration) -> SshRemote<'a> {
        Remote::new(&self.targets, &self.executor, target).with_timeout(timeout)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, `REMOTEKIT_YES`
    /// env, or no terminal), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails.
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
