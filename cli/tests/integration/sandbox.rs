//! A temporary home for one test: targets file plus stand-in ssh/scp.

#![allow(clippy::expect_used, dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Skips the options up to `--`, drops the host and runs the command locally.
const FAKE_SSH: &str = r#"#!/bin/sh
while [ "$#" -gt 0 ]; do
  if [ "$1" = "--" ]; then shift; break; fi
  shift
done
shift
exec sh -c "$1"
"#;

/// Copies between local paths, dropping any `user@host:` prefix.
const FAKE_SCP: &str = r#"#!/bin/sh
while [ "$#" -gt 0 ]; do
  if [ "$1" = "--" ]; then shift; break; fi
  shift
done
strip() { case "$1" in *@*:*) printf '%s' "${1#*:}" ;; *) printf '%s' "$1" ;; esac; }
exec cp -p "$(strip "$1")" "$(strip "$2")"
"#;

pub const DEFAULT_TARGETS: &str = "\
targets:
  host1:
    host: localhost
    user: tester
";

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self::with_targets(DEFAULT_TARGETS)
    }

    pub fn with_targets(yaml: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("targets.yaml"), yaml).expect("write targets");
        #[cfg(unix)]
        {
            write_script(&dir.path().join("ssh"), FAKE_SSH);
            write_script(&dir.path().join("scp"), FAKE_SCP);
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A scratch path inside the sandbox.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn remotekit(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("remotekit"));
        cmd.env("NO_COLOR", "1")
            .env("REMOTEKIT_CONFIG", self.dir.path().join("targets.yaml"))
            .env("REMOTEKIT_SSH", self.dir.path().join("ssh"))
            .env("REMOTEKIT_SCP", self.dir.path().join("scp"))
            .env_remove("REMOTEKIT_LOG");
        cmd
    }
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, body).expect("write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
}
