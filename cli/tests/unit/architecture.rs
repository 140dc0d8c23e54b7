//! Structural tests for layer boundaries.
//!
//! These tests scan source files to verify that the domain and application
//! layers stay free of I/O and infrastructure imports.

use std::path::{Path, PathBuf};

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and report whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    fn process_line(&mut self, line: &str) -> bool {
        if line.trim().contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

/// Every non-test, non-comment line under `dir` containing one of `needles`.
fn find_outside_tests(dir: &Path, needles: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        let mut tracker = CfgTestTracker::new();
        for (i, line) in content.lines().enumerate() {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            if in_test || trimmed.starts_with("//") {
                continue;
            }
            for needle in needles {
                if line.contains(needle) {
                    violations.push(format!("{rel}:{}: `{needle}`: {trimmed}", i + 1));
                }
            }
        }
    }
    violations
}

#[test]
fn domain_is_pure() {
    let violations = find_outside_tests(
        &src_dir().join("domain"),
        &[
            "tokio",
            "std::fs",
            "std::process",
            "std::net",
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must not perform I/O or import outer layers:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_does_not_import_outer_layers() {
    let violations = find_outside_tests(
        &src_dir().join("application"),
        &["crate::infra", "crate::commands", "crate::output", "std::process"],
    );
    assert!(
        violations.is_empty(),
        "application/ must depend only on domain/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_does_not_import_commands_or_output() {
    let violations = find_outside_tests(
        &src_dir().join("infra"),
        &["crate::commands", "crate::output", "println!", "eprintln!"],
    );
    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/, nor print:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_inline_json_branching_in_commands() {
    let violations = find_outside_tests(&src_dir().join("commands"), &["json: bool", "if json"]);
    assert!(
        violations.is_empty(),
        "commands/ should render through app.renderer():\n{}",
        violations.join("\n")
    );
}

#[test]
fn command_runner_constructed_only_in_infra() {
    let mut violations = find_outside_tests(&src_dir().join("commands"), &["TokioCommandRunner::new"]);
    violations.extend(find_outside_tests(
        &src_dir().join("application"),
        &["TokioCommandRunner"],
    ));
    assert!(
        violations.is_empty(),
        "processes must be spawned through infra/:\n{}",
        violations.join("\n")
    );
}
