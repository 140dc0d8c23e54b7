//! Human-readable terminal renderer.

use std::io::Write as _;
use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::domain::{DirEntry, EntryKind, PathKind, PathStat, RemoteResults, TargetRow, TargetSummary};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("remotekit {version}");
    }

    /// Report a finished action.
    pub fn render_success(&self, message: &str) {
        self.ctx.success(message);
    }

    /// Relay a remote command's output: stdout to stdout, stderr to stderr,
    /// byte for byte.
    pub fn render_results(&self, results: &RemoteResults) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(results.stdout().as_bytes());
        let _ = out.flush();
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(results.stderr().as_bytes());
        let _ = err.flush();
    }

    /// Print file contents verbatim.
    pub fn render_text(&self, text: &str) {
        print!("{text}");
    }

    /// Render a directory listing, one entry per line.
    pub fn render_listing(&self, entries: &[DirEntry]) {
        let width = entries
            .iter()
            .map(|e| e.size.to_string().len())
            .max()
            .unwrap_or(1);
        for entry in entries {
            let size = entry.size.to_string();
            match &entry.kind {
                EntryKind::Directory => println!(
                    "d {size:>width$}  {}/",
                    entry.name.style(self.ctx.styles.directory)
                ),
                EntryKind::Symlink { target } => println!(
                    "l {size:>width$}  {} -> {target}",
                    entry.name.style(self.ctx.styles.symlink)
                ),
                EntryKind::File => println!("- {size:>width$}  {}", entry.name),
                EntryKind::Other => println!(
                    "? {size:>width$}  {}",
                    entry.name.style(self.ctx.styles.dim)
                ),
            }
        }
    }

    /// Render a path probe.
    pub fn render_stat(&self, stat: &PathStat) {
        let kind = match stat.kind {
            PathKind::Missing => "missing",
            PathKind::File => "file",
            PathKind::Directory => "directory",
            PathKind::Other => "other",
        };
        self.ctx.kv("Path:", &stat.path);
        self.ctx.kv("Kind:", kind);
        if let Some(resolved) = &stat.resolved {
            self.ctx.kv("Resolved:", resolved);
        }
    }

    /// Render one target's resolved settings.
    pub fn render_target(&self, target: &TargetSummary) {
        self.ctx.header(&target.name);
        self.ctx.kv("Host:", &format!("{}:{}", target.host, target.port));
        self.ctx.kv("User:", &target.user);
        self.ctx.kv("Auth:", &target.auth);
        if let Some(dir) = &target.remote_dir {
            self.ctx.kv("Remote dir:", dir);
        }
        self.ctx
            .kv("Connect timeout:", &format!("{}s", target.connect_timeout_secs));
    }

    /// Render all configured targets.
    pub fn render_targets(&self, rows: &[TargetRow], path: &Path) {
        if rows.is_empty() {
            if !self.ctx.quiet {
                println!("No targets configured. Add one to {}", path.display());
            }
            return;
        }
        for row in rows {
            match row {
                TargetRow::Valid(t) => println!(
                    "  {:<16} {}@{}:{}  {}",
                    t.name.style(self.ctx.styles.bold),
                    t.user,
                    t.host,
                    t.port,
                    t.auth.style(self.ctx.styles.dim)
                ),
                TargetRow::Invalid { name, error } => println!(
                    "  {:<16} {}",
                    name.style(self.ctx.styles.bold),
                    error.style(self.ctx.styles.error)
                ),
            }
        }
    }
}
