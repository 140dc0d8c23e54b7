//! Parsing of `LC_ALL=C ls -lA` output into directory entries.

use serde::Serialize;

/// What a directory entry is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink { target: String },
    /// Devices, sockets, pipes.
    Other,
}

/// One line of a remote long listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    /// `name` joined onto the listed directory.
    pub path: String,
    #[serde(flatten)]
    pub kind: EntryKind,
    pub size: u64,
}

impl DirEntry {
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// What a path turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    Missing,
    File,
    Directory,
    Other,
}

/// Result of probing one remote path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStat {
    pub path: String,
    pub kind: PathKind,
    /// Canonical absolute path with symlinks resolved; `None` when missing.
    pub resolved: Option<String>,
}

impl PathStat {
    /// Parse the two-line `kind` / `resolved` output of the stat probe.
    #[must_use]
    pub fn parse(path: &str, output: &str) -> Option<Self> {
        let mut lines = output.lines().map(str::trim);
        let kind = match lines.next()? {
            "missing" => PathKind::Missing,
            "file" => PathKind::File,
            "directory" => PathKind::Directory,
            "other" => PathKind::Other,
            _ => return None,
        };
        let resolved = match kind {
            PathKind::Missing => None,
            _ => Some(lines.next().filter(|l| !l.is_empty())?.to_string()),
        };
        Some(Self {
            path: path.to_string(),
            kind,
            resolved,
        })
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.kind != PathKind::Missing
    }
}

/// Parse the output of `ls -lA -- <dir>` run with the C locale.
///
/// Lines that do not look like entries (the `total` line, blank lines) are
/// skipped. The result is sorted by name.
#[must_use]
pub fn parse_long_listing(dir: &str, output: &str) -> Vec<DirEntry> {
    let mut entries: Vec<DirEntry> = output
        .lines()
        .filter_map(|line| parse_line(dir, line))
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

fn parse_line(dir: &str, line: &str) -> Option<DirEntry> {
    let mode = line.split_whitespace().next()?;
    let type_char = mode.chars().next()?;
    if mode.len() < 10 || !"-dlcbps".contains(type_char) {
        return None;
    }

    // mode links owner group size month day time|year name...
    // Device nodes print "major, minor" where the size would be.
    let device = matches!(type_char, 'c' | 'b');
    let fixed = if device { 9 } else { 8 };
    let (fields, name) = split_fields(line, fixed)?;
    let size = if device { 0 } else { fields[4].parse().ok()? };

    let (name, kind) = match type_char {
        '-' => (name.to_string(), EntryKind::File),
        'd' => (name.to_string(), EntryKind::Directory),
        'l' => match name.split_once(" -> ") {
            Some((link, target)) => (
                link.to_string(),
                EntryKind::Symlink {
                    target: target.to_string(),
                },
            ),
            None => (
                name.to_string(),
                EntryKind::Symlink {
                    target: String::new(),
                },
            ),
        },
        _ => (name.to_string(), EntryKind::Other),
    };
    if name.is_empty() {
        return None;
    }

    Some(DirEntry {
        path: join(dir, &name),
        name,
        kind,
        size,
    })
}

/// Split off `count` whitespace-separated fields and return them with the
/// untouched remainder of the line (file names may contain spaces).
fn split_fields(line: &str, count: usize) -> Option<(Vec<&str>, &str)> {
    let mut fields = Vec::with_capacity(count);
    let mut rest = line;
    for _ in 0..count {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace)?;
        fields.push(&rest[..end]);
        rest = &rest[end..];
    }
    // Exactly one separator precedes the name.
    let name = rest.strip_prefix(' ').unwrap_or_else(|| rest.trim_start());
    Some((fields, name))
}

fn join(dir: &str, name: &str) -> String {
    let base = dir.trim_end_matches('/');
    if base.is_empty() && dir.starts_with('/') {
        format!("/{name}")
    } else {
        format!("{base}/{name}")
    }
}
