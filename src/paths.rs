//! Project-root resolution and path rebasing.
//!
//! The external runner must be invoked from the project root with paths
//! relative to it; `rebase` is the single place that normalization happens.

use anyhow::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;
use crate::gitctx;

/// Resolve the project root, preferring an explicit override.
///
/// An override must exist and be a git working tree; without one the root is
/// auto-detected from the current working directory.
pub(crate) fn resolve_root(root_override: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = root_override {
        if !dir.is_dir() {
            return Err(Error::new(HarnessError::DirectoryNotFound(
                dir.display().to_string(),
            )));
        }
        if !gitctx::is_worktree(dir) {
            return Err(Error::new(HarnessError::NotAProject(
                dir.display().to_string(),
            )));
        }
        // Normalize so prefix stripping works against canonical child paths.
        return Ok(dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf()));
    }

    let cwd = env::current_dir()?;
    gitctx::worktree_root(&cwd)
        .ok_or_else(|| Error::new(HarnessError::NotAProject(cwd.display().to_string())))
}

/// Rebase `path` to be relative to `root`.
///
/// Paths outside the root pass through unchanged; the runner reports its own
/// error for those rather than this tool fabricating a path.
pub(crate) fn rebase(path: &Path, root: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => return path.display().to_string(),
        }
    };
    let absolute = absolute.canonicalize().unwrap_or(absolute);
    match absolute.strip_prefix(root) {
        Ok(relative) => relative.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}
