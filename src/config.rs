//! Immutable per-invocation configuration.
//!
//! Built once from CLI flags and threaded into every component call; there is
//! no ambient or global state.

use std::path::PathBuf;

/// Conventional workflows directory relative to the project root.
pub(crate) const DEFAULT_WORKFLOWS_DIR: &str = ".github/workflows";
/// Conventional scenario-set directory relative to the project root.
pub(crate) const DEFAULT_SCENARIOS_DIR: &str = ".github/workflow-tests";
/// Secrets file picked up from the project root when present.
pub(crate) const SECRETS_FILE: &str = ".secrets";

/// Everything an operation needs, resolved up front.
#[derive(Debug, Clone)]
pub(crate) struct HarnessConfig {
    /// Directory holding workflow definition files.
    pub(crate) workflows_dir: PathBuf,
    /// Directory holding persisted scenario sets.
    pub(crate) scenarios_dir: PathBuf,
    /// Explicit project-root override; auto-detected when absent.
    pub(crate) root_override: Option<PathBuf>,
    /// Extra flags forwarded verbatim to the external runner.
    pub(crate) runner_flags: Vec<String>,
}

impl HarnessConfig {
    pub(crate) fn new(
        workflows_dir: Option<PathBuf>,
        scenarios_dir: Option<PathBuf>,
        root_override: Option<PathBuf>,
        runner_flags: Vec<String>,
    ) -> Self {
        Self {
            workflows_dir: workflows_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_WORKFLOWS_DIR)),
            scenarios_dir: scenarios_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIOS_DIR)),
            root_override,
            runner_flags,
        }
    }
}

#[cfg(test)]
impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new(None, None, None, Vec::new())
    }
}
