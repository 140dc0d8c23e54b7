//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;
use serde::Serialize;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use styles::Styles;

use crate::application::services::file_actions::FileContent;
use crate::domain::{DirEntry, PathStat, RemoteResults, TargetRow, TargetSummary};

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠` to stderr. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            eprintln!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<16} {value}", key.style(self.styles.dim));
        }
    }
}

/// Output renderer selected by `--json`.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render a remote command's results.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn results(&self, results: &RemoteResults) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_results(results);
                Ok(())
            }
            Self::Json(r) => r.render(results),
        }
    }

    /// Render a directory listing.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn listing(&self, entries: &[DirEntry]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_listing(entries);
                Ok(())
            }
            Self::Json(r) => r.render(entries),
        }
    }

    /// Render a file's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn content(&self, path: &str, content: &FileContent) -> Result<()> {
        match (self, content) {
            (Self::Human(r), FileContent::Text(text)) => {
                r.render_text(text);
                Ok(())
            }
            (Self::Human(r), FileContent::Json(value)) => {
                r.render_text(&format!("{}\n", serde_json::to_string_pretty(value)?));
                Ok(())
            }
            (Self::Json(r), _) => r.render(&serde_json::json!({
                "path": path,
                "content": content,
            })),
        }
    }

    /// Render a path probe.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn stat(&self, stat: &PathStat) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_stat(stat);
                Ok(())
            }
            Self::Json(r) => r.render(stat),
        }
    }

    /// Render one target.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn target(&self, target: &TargetSummary) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_target(target);
                Ok(())
            }
            Self::Json(r) => r.render(target),
        }
    }

    /// Render all targets.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn targets(&self, rows: &[TargetRow], path: &Path) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_targets(rows, path);
                Ok(())
            }
            Self::Json(r) => r.render(&serde_json::json!({
                "config": path.display().to_string(),
                "targets": rows,
            })),
        }
    }

    /// Report a completed action that produces no data.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn done<T: Serialize>(&self, message: &str, detail: &T) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_success(message);
                Ok(())
            }
            Self::Json(r) => r.render(detail),
        }
    }

    /// Render the CLI version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn version(&self, version: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_version(version);
                Ok(())
            }
            Self::Json(r) => r.render(&serde_json::json!({ "version": version })),
        }
    }
}
