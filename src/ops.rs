//! Operation layer behind the CLI: discovery listing, scenario-set
//! initialization, scenario listing, and test dispatch.
//!
//! Scenario numbers are 1-based operator-facing; every translation to array
//! indexes happens here (`index = number - 1`) so `scenarios` output and
//! `test` numbering always agree.

use anyhow::{Error, Result};
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::compose::{self, RepositoryContext};
use crate::config::HarnessConfig;
use crate::discovery;
use crate::dispatch::{self, ExecutionRequest, RunMode};
use crate::error::HarnessError;
use crate::paths;
use crate::store::{self, ScenarioSet};
use crate::templates::Trigger;

/// Discover workflows and print them with their scenario-set status.
pub(crate) fn discover_and_list(config: &HarnessConfig, json_output: bool) -> Result<()> {
    let workflows_dir = anchored(&config.workflows_dir, config);
    let scenarios_dir = anchored(&config.scenarios_dir, config);
    let descriptors = discovery::discover(&workflows_dir)?;

    if json_output {
        let entries: Vec<_> = descriptors
            .iter()
            .map(|descriptor| {
                json!({
                    "ordinal": descriptor.ordinal,
                    "file": descriptor.basename,
                    "name": descriptor.declared_name,
                    "trigger": descriptor.trigger,
                    "has_scenarios": store::set_path(&descriptor.basename, &scenarios_dir).is_file(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Workflows in {}:", workflows_dir.display());
    for descriptor in &descriptors {
        let initialized = store::set_path(&descriptor.basename, &scenarios_dir).is_file();
        let marker = if initialized { " [scenarios]" } else { "" };
        let name = if descriptor.declared_name.is_empty() {
            "(unnamed)"
        } else {
            &descriptor.declared_name
        };
        println!(
            "  {}. {} - {} (on: {}){}",
            descriptor.ordinal,
            descriptor.basename,
            name,
            if descriptor.trigger.is_empty() {
                "?"
            } else {
                &descriptor.trigger
            },
            marker
        );
    }
    Ok(())
}

/// Generate and persist a scenario set for the selected workflow.
///
/// The template matches the workflow's first declared trigger; the stored
/// workflow path is backfilled once, relative to the project root when one
/// resolves.
pub(crate) fn initialize(selector: &str, config: &HarnessConfig) -> Result<()> {
    let workflows_dir = anchored(&config.workflows_dir, config);
    let scenarios_dir = anchored(&config.scenarios_dir, config);
    let descriptors = discovery::discover(&workflows_dir)?;
    let descriptor = discovery::select(selector, &descriptors)?;

    let trigger = Trigger::parse(&descriptor.trigger);
    let set = trigger.generate();
    let resolved = match paths::resolve_root(config.root_override.as_deref()) {
        Ok(root) => paths::rebase(&descriptor.path, &root),
        Err(_) => descriptor.path.display().to_string(),
    };
    let set = store::backfill_workflow_path(set, &resolved);
    store::save(&descriptor.basename, &set, &scenarios_dir)?;

    println!(
        "Initialized {} scenario(s) for {} (trigger: {}) at {}",
        set.scenarios.len(),
        descriptor.basename,
        set.trigger,
        store::set_path(&descriptor.basename, &scenarios_dir).display()
    );
    println!("Edit the file to tailor events, then run `wfh scenarios {}`.", descriptor.basename);
    Ok(())
}

/// Print the scenario set for a workflow, numbered from 1.
pub(crate) fn list_scenarios(basename: &str, config: &HarnessConfig, json_output: bool) -> Result<()> {
    let scenarios_dir = anchored(&config.scenarios_dir, config);
    let set = store::load(basename, &scenarios_dir)?;

    if json_output {
        let entries: Vec<_> = set
            .scenarios
            .iter()
            .enumerate()
            .map(|(idx, scenario)| {
                json!({
                    "number": idx + 1,
                    "name": scenario.name,
                    "description": scenario.description,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Scenarios for {} (trigger: {}):", basename, set.trigger);
    for (idx, scenario) in set.scenarios.iter().enumerate() {
        println!("  {}. {} - {}", idx + 1, scenario.name, scenario.description);
    }
    Ok(())
}

/// Run one scenario by its 1-based number.
pub(crate) fn test(basename: &str, number: usize, mode: RunMode, config: &HarnessConfig) -> Result<()> {
    let scenarios_dir = anchored(&config.scenarios_dir, config);
    let set = store::load(basename, &scenarios_dir)?;
    let scenario = scenario_at(&set, number)?;

    let context = repository_context(config);
    let event = compose::compose(scenario, &context);
    let workflow_path = workflow_path_for(&set, basename, config);
    let request = ExecutionRequest {
        scenario_name: &scenario.name,
        trigger: &set.trigger,
        workflow_path: &workflow_path,
        event: &event,
    };
    dispatch::run(mode, &request, config)
}

/// Run every scenario for a workflow sequentially.
///
/// Scenario failures, including spawn errors, are reported and do not stop
/// the loop. Only failures that would repeat identically for every remaining
/// scenario (missing runner or engine, no project root) abort it. Returns
/// the number of failed scenarios.
pub(crate) fn test_all(basename: &str, mode: RunMode, config: &HarnessConfig) -> Result<usize> {
    let scenarios_dir = anchored(&config.scenarios_dir, config);
    let set = store::load(basename, &scenarios_dir)?;

    let context = repository_context(config);
    let workflow_path = workflow_path_for(&set, basename, config);
    let mut failed = 0usize;
    for (idx, scenario) in set.scenarios.iter().enumerate() {
        println!("--- scenario {}: {} ---", idx + 1, scenario.name);
        let event = compose::compose(scenario, &context);
        let request = ExecutionRequest {
            scenario_name: &scenario.name,
            trigger: &set.trigger,
            workflow_path: &workflow_path,
            event: &event,
        };
        match dispatch::run(mode, &request, config) {
            Ok(()) => {}
            Err(err) if aborts_remaining_scenarios(&err) => return Err(err),
            Err(err) => match err.downcast_ref::<HarnessError>() {
                Some(HarnessError::ExternalProcess { code }) => {
                    eprintln!("warning: scenario {} failed (runner exit {code})", idx + 1);
                    failed += 1;
                }
                _ => {
                    eprintln!("warning: scenario {} failed: {err:#}", idx + 1);
                    failed += 1;
                }
            },
        }
    }
    println!(
        "{} scenario(s) run, {} failed",
        set.scenarios.len(),
        failed
    );
    Ok(failed)
}

/// Whether a dispatch failure would repeat identically for every remaining
/// scenario, making the rest of a `test_all` loop pointless.
fn aborts_remaining_scenarios(err: &Error) -> bool {
    matches!(
        err.downcast_ref::<HarnessError>(),
        Some(
            HarnessError::ToolUnavailable(_)
                | HarnessError::EngineUnavailable(_)
                | HarnessError::NotAProject(_)
        )
    )
}

/// Translate a 1-based operator-facing number into the scenario it names.
fn scenario_at(set: &ScenarioSet, number: usize) -> Result<&crate::store::Scenario> {
    if number == 0 || number > set.scenarios.len() {
        return Err(Error::new(HarnessError::Validation(format!(
            "scenario number {number} is out of range (1..={})",
            set.scenarios.len()
        ))));
    }
    Ok(&set.scenarios[number - 1])
}

/// Repository context for composition, degrading to the current directory
/// when no project root resolves (simulate mode needs no root).
fn repository_context(config: &HarnessConfig) -> RepositoryContext {
    match paths::resolve_root(config.root_override.as_deref()) {
        Ok(root) => RepositoryContext::derive(&root),
        Err(_) => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            tracing::debug!("no project root; deriving context from cwd");
            RepositoryContext::derive(&cwd)
        }
    }
}

/// Workflow path to hand the dispatcher: the backfilled stored path when
/// present, otherwise the conventional location under the workflows dir.
///
/// Stored paths are root-relative, so they are re-anchored at the resolved
/// root here; a bare relative path would be absolutized against the current
/// directory during rebase and break when invoked from a subdirectory.
fn workflow_path_for(set: &ScenarioSet, basename: &str, config: &HarnessConfig) -> PathBuf {
    if set.workflow.is_empty() {
        return anchored(&config.workflows_dir, config).join(basename);
    }
    let stored = PathBuf::from(&set.workflow);
    if stored.is_absolute() {
        return stored;
    }
    match paths::resolve_root(config.root_override.as_deref()) {
        Ok(root) => root.join(stored),
        Err(_) => stored,
    }
}

/// Anchor a relative configured directory at the project root when one
/// resolves; otherwise leave it relative to the current directory.
fn anchored(dir: &Path, config: &HarnessConfig) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    match paths::resolve_root(config.root_override.as_deref()) {
        Ok(root) => root.join(dir),
        Err(_) => dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_for(tmp: &Path) -> HarnessConfig {
        HarnessConfig::new(
            Some(tmp.join("workflows")),
            Some(tmp.join("scenario-config")),
            None,
            Vec::new(),
        )
    }

    fn seed_workflow(tmp: &Path, name: &str, content: &str) {
        let dir = tmp.join("workflows");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_without_initialize_is_configuration_error_without_side_effects() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_for(tmp.path());
        let err = test("ci.yml", 1, RunMode::Simulate, &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HarnessError>(),
            Some(HarnessError::Configuration(_))
        ));
        assert!(
            !tmp.path().join("scenario-config").exists(),
            "test must not create the scenario dir"
        );
    }

    #[test]
    fn scenario_numbering_matches_listing() {
        let set = Trigger::parse("issues").generate();
        // Entry k in the listing is scenarios[k-1]; the same translation
        // backs `test`.
        for number in 1..=set.scenarios.len() {
            let picked = scenario_at(&set, number).unwrap();
            assert_eq!(picked.name, set.scenarios[number - 1].name);
        }
        for bad in [0, set.scenarios.len() + 1] {
            let err = scenario_at(&set, bad).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<HarnessError>(),
                Some(HarnessError::Validation(_))
            ));
        }
    }

    #[test]
    fn initialize_then_test_simulate_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_for(tmp.path());
        seed_workflow(
            tmp.path(),
            "release.yml",
            "name: Release\non:\n  issues:\n    types: [labeled]\njobs: {}\n",
        );

        initialize("release.yml", &config).unwrap();
        let set = store::load("release.yml", &tmp.path().join("scenario-config")).unwrap();
        assert_eq!(set.trigger, "issues");
        assert_eq!(set.scenarios.len(), 3);
        assert!(!set.workflow.is_empty(), "workflow path must be backfilled");

        test("release.yml", 2, RunMode::Simulate, &config).unwrap();
        let failed = test_all("release.yml", RunMode::Simulate, &config).unwrap();
        assert_eq!(failed, 0);
    }

    #[test]
    fn initialize_accepts_ordinal_selector() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_for(tmp.path());
        seed_workflow(tmp.path(), "a.yml", "name: A\non: push\njobs: {}\n");
        seed_workflow(tmp.path(), "b.yml", "name: B\non: pull_request\njobs: {}\n");

        initialize("2", &config).unwrap();
        let set = store::load("b.yml", &tmp.path().join("scenario-config")).unwrap();
        assert_eq!(set.trigger, "pull_request");
    }

    fn init_repo(dir: &Path) -> bool {
        std::process::Command::new("git")
            .args(["init", "--quiet"])
            .current_dir(dir)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    #[test]
    fn stored_workflow_path_is_anchored_at_the_root_not_the_cwd() {
        let tmp = tempfile::tempdir().unwrap();
        if !init_repo(tmp.path()) {
            eprintln!("Skipping: git not available");
            return;
        }
        let root = tmp.path().canonicalize().unwrap();
        let config = HarnessConfig::new(None, None, Some(root.clone()), Vec::new());

        let set = store::backfill_workflow_path(
            Trigger::parse("issues").generate(),
            ".github/workflows/release.yml",
        );
        let path = workflow_path_for(&set, "release.yml", &config);
        assert_eq!(path, root.join(".github/workflows/release.yml"));

        // The anchored path rebases to the stored root-relative form no
        // matter which directory the tool was started from; a bare relative
        // path would pick up the current directory here instead.
        assert_eq!(
            paths::rebase(&path, &root),
            format!(
                ".github{sep}workflows{sep}release.yml",
                sep = std::path::MAIN_SEPARATOR
            )
        );
    }

    #[test]
    fn test_all_aborts_only_on_failures_that_would_repeat() {
        for fatal in [
            HarnessError::ToolUnavailable("act".to_string()),
            HarnessError::EngineUnavailable("docker".to_string()),
            HarnessError::NotAProject("/nowhere".to_string()),
        ] {
            assert!(aborts_remaining_scenarios(&Error::new(fatal)));
        }
        // Scenario-local failures count and the loop moves on.
        assert!(!aborts_remaining_scenarios(&Error::new(
            HarnessError::ExternalProcess { code: 2 }
        )));
        assert!(!aborts_remaining_scenarios(&anyhow::anyhow!(
            "spawn act: no such file or directory"
        )));
    }

    #[test]
    fn list_requires_workflows_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_for(tmp.path());
        let err = discover_and_list(&config, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HarnessError>(),
            Some(HarnessError::Configuration(_))
        ));
    }
}
