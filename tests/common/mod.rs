//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Issues-triggered workflow used across tests.
pub const RELEASE_WORKFLOW: &str =
    "name: Release Branch\non:\n  issues:\n    types: [labeled]\njobs: {}\n";

/// A throwaway git repository the harness can run against.
pub struct RepoFixture {
    _temp: TempDir,
    pub root: PathBuf,
}

impl RepoFixture {
    /// Create a temp git repo with an `origin` remote; `None` when git is
    /// unavailable so callers can skip.
    pub fn create() -> Option<Self> {
        if !git_available() {
            eprintln!("Skipping: git not available");
            return None;
        }
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path().to_path_buf();
        git(&root, &["init", "--quiet"]);
        git(&root, &["remote", "add", "origin", "git@github.com:acme/demo.git"]);
        // Pin the branch fallback so assertions do not depend on the
        // machine's global git configuration.
        git(&root, &["config", "init.defaultBranch", "main"]);
        Some(Self { _temp: temp, root })
    }

    pub fn add_workflow(&self, name: &str, content: &str) {
        let dir = self.root.join(".github/workflows");
        fs::create_dir_all(&dir).expect("create workflows dir");
        fs::write(dir.join(name), content).expect("write workflow");
    }

    /// Run the harness binary from the repo root.
    pub fn wfh(&self, args: &[&str]) -> Output {
        self.wfh_in(&self.root, args)
    }

    /// Run the harness binary from an arbitrary working directory.
    pub fn wfh_in(&self, dir: &Path, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_wfh"))
            .args(args)
            .current_dir(dir)
            .output()
            .expect("run wfh")
    }

    pub fn scenario_set_path(&self, basename: &str) -> PathBuf {
        self.root
            .join(".github/workflow-tests")
            .join(format!("{basename}.json"))
    }
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

fn git(root: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(root)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed");
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
