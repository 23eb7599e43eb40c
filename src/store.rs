//! Scenario-set persistence, keyed by workflow basename.
//!
//! Sets are keyed by basename rather than path so they outlive workflow file
//! moves; the stored `workflow` path is backfilled once at creation and may
//! go stale afterwards, which is accepted.

use anyhow::{Context, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;

/// Durable scenario set for one workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ScenarioSet {
    /// Relative workflow path; empty until backfilled at creation.
    pub(crate) workflow: String,
    pub(crate) trigger: String,
    pub(crate) scenarios: Vec<Scenario>,
}

/// One named synthetic occurrence of the workflow's trigger event.
///
/// `event` is opaque trigger-specific data; the harness only merges it,
/// never validates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Scenario {
    pub(crate) name: String,
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) event: serde_json::Value,
}

/// Path of the scenario-set document for `basename`.
pub(crate) fn set_path(basename: &str, config_dir: &Path) -> PathBuf {
    config_dir.join(format!("{basename}.json"))
}

/// Serialize and write the set, creating `config_dir` if needed.
/// Overwrites any prior document for the basename.
pub(crate) fn save(basename: &str, set: &ScenarioSet, config_dir: &Path) -> Result<()> {
    fs::create_dir_all(config_dir)
        .with_context(|| format!("create scenario dir {}", config_dir.display()))?;
    let path = set_path(basename, config_dir);
    let json = serde_json::to_string_pretty(set)?;
    fs::write(&path, json).with_context(|| format!("write scenario set {}", path.display()))?;
    tracing::debug!(basename, path = %path.display(), "saved scenario set");
    Ok(())
}

/// Load the set for `basename`, failing with remediation guidance when no
/// document exists. Never creates files.
pub(crate) fn load(basename: &str, config_dir: &Path) -> Result<ScenarioSet> {
    let path = set_path(basename, config_dir);
    if !path.is_file() {
        return Err(Error::new(HarnessError::Configuration(format!(
            "no scenario set at {} (run `wfh init {basename}` first)",
            path.display()
        ))));
    }
    let content =
        fs::read_to_string(&path).with_context(|| format!("read scenario set {}", path.display()))?;
    let set = serde_json::from_str(&content)
        .with_context(|| format!("parse scenario set {}", path.display()))?;
    Ok(set)
}

/// Backfill the stored workflow path with the caller-resolved relative path.
pub(crate) fn backfill_workflow_path(mut set: ScenarioSet, resolved: &str) -> ScenarioSet {
    set.workflow = resolved.to_string();
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::Trigger;

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("tests");
        let set = Trigger::parse("push").generate();
        let set = backfill_workflow_path(set, ".github/workflows/ci.yml");

        save("ci.yml", &set, &config_dir).unwrap();
        let loaded = load("ci.yml", &config_dir).unwrap();
        assert_eq!(loaded.workflow, ".github/workflows/ci.yml");
        assert_eq!(loaded.trigger, "push");
        assert_eq!(loaded.scenarios.len(), set.scenarios.len());
    }

    #[test]
    fn save_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let first = Trigger::parse("push").generate();
        save("ci.yml", &first, tmp.path()).unwrap();

        let second = Trigger::parse("issues").generate();
        save("ci.yml", &second, tmp.path()).unwrap();
        let loaded = load("ci.yml", tmp.path()).unwrap();
        assert_eq!(loaded.trigger, "issues");
    }

    #[test]
    fn load_missing_set_is_configuration_error_without_side_effects() {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("tests");
        let err = load("ci.yml", &config_dir).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HarnessError>(),
            Some(HarnessError::Configuration(_))
        ));
        assert!(!config_dir.exists(), "load must not create directories");
    }
}
