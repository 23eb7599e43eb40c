//! Version-control queries backed by the `git` binary.
//!
//! Every query here is best-effort: callers that need a hard answer (root
//! resolution) check the `Option`, while metadata consumers degrade to
//! placeholders instead of failing.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Working-tree root containing `dir`, if `dir` is inside a repository.
pub(crate) fn worktree_root(dir: &Path) -> Option<PathBuf> {
    let stdout = git_stdout(dir, &["rev-parse", "--show-toplevel"])?;
    let line = stdout.lines().next()?.trim();
    if line.is_empty() {
        return None;
    }
    Some(PathBuf::from(line))
}

/// Whether `dir` itself sits inside a git working tree.
pub(crate) fn is_worktree(dir: &Path) -> bool {
    git_stdout(dir, &["rev-parse", "--is-inside-work-tree"])
        .map(|out| out.trim() == "true")
        .unwrap_or(false)
}

/// URL of the `origin` remote, if configured.
pub(crate) fn remote_url(root: &Path) -> Option<String> {
    let stdout = git_stdout(root, &["remote", "get-url", "origin"])?;
    let url = stdout.trim();
    if url.is_empty() {
        return None;
    }
    Some(url.to_string())
}

/// Default branch name, tried from the remote HEAD ref first and then the
/// local `init.defaultBranch` setting.
pub(crate) fn default_branch(root: &Path) -> Option<String> {
    if let Some(stdout) = git_stdout(root, &["symbolic-ref", "refs/remotes/origin/HEAD"]) {
        if let Some(branch) = branch_from_head_ref(&stdout) {
            return Some(branch);
        }
    }
    let stdout = git_stdout(root, &["config", "init.defaultBranch"])?;
    let branch = stdout.trim();
    if branch.is_empty() {
        return None;
    }
    Some(branch.to_string())
}

/// Branch name from a `refs/remotes/origin/<branch>` ref, keeping any
/// slashes inside the branch name itself.
fn branch_from_head_ref(head_ref: &str) -> Option<String> {
    let branch = head_ref.trim().strip_prefix("refs/remotes/origin/")?;
    if branch.is_empty() {
        return None;
    }
    Some(branch.to_string())
}

fn git_stdout(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        tracing::debug!(?args, "git query failed");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_from_head_ref_keeps_slashes_in_branch_names() {
        assert_eq!(
            branch_from_head_ref("refs/remotes/origin/main\n").as_deref(),
            Some("main")
        );
        assert_eq!(
            branch_from_head_ref("refs/remotes/origin/release/2.0\n").as_deref(),
            Some("release/2.0")
        );
        assert_eq!(branch_from_head_ref("refs/remotes/origin/"), None);
        assert_eq!(branch_from_head_ref("refs/heads/main"), None);
    }
}

