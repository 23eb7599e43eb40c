//! Simulate/execute dispatch for composed events.
//!
//! Simulate renders the event for inspection; execute hands it to the
//! external runner with paths rebased to the project root. The dispatcher
//! runs and reports, it does not interpret runner-specific failure codes.

use anyhow::{Context, Error, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{HarnessConfig, SECRETS_FILE};
use crate::error::HarnessError;
use crate::paths;

/// External runner binary invoked for execute mode.
pub(crate) const RUNNER: &str = "act";
/// Container engine the runner depends on.
pub(crate) const ENGINE: &str = "docker";

/// Per-invocation execution mode; no persisted state machine, just a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunMode {
    Simulate,
    Execute,
}

/// One composed event ready for dispatch.
pub(crate) struct ExecutionRequest<'a> {
    pub(crate) scenario_name: &'a str,
    pub(crate) trigger: &'a str,
    pub(crate) workflow_path: &'a Path,
    pub(crate) event: &'a Value,
}

pub(crate) fn run(mode: RunMode, request: &ExecutionRequest<'_>, config: &HarnessConfig) -> Result<()> {
    match mode {
        RunMode::Simulate => simulate(request),
        RunMode::Execute => execute(request, config),
    }
}

fn simulate(request: &ExecutionRequest<'_>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(request.event)?;
    println!(
        "[simulate] scenario '{}' ({} trigger) on {}",
        request.scenario_name,
        request.trigger,
        request.workflow_path.display()
    );
    println!("{rendered}");
    Ok(())
}

fn execute(request: &ExecutionRequest<'_>, config: &HarnessConfig) -> Result<()> {
    if which::which(RUNNER).is_err() {
        return Err(Error::new(HarnessError::ToolUnavailable(
            RUNNER.to_string(),
        )));
    }
    if !engine_available() {
        return Err(Error::new(HarnessError::EngineUnavailable(
            ENGINE.to_string(),
        )));
    }

    // The runner operates from the project root; no root means nothing to
    // invoke it against.
    let root = paths::resolve_root(config.root_override.as_deref())?;

    let event_path = write_event_file(request, &root, config)?;
    let workflow_rel = paths::rebase(request.workflow_path, &root);
    let event_rel = paths::rebase(&event_path, &root);
    let secrets_present = root.join(SECRETS_FILE).is_file();
    let args = runner_args(
        request.trigger,
        &workflow_rel,
        &event_rel,
        secrets_present,
        &config.runner_flags,
    );

    tracing::info!(runner = RUNNER, ?args, root = %root.display(), "invoking runner");
    let status = Command::new(RUNNER)
        .args(&args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("spawn {RUNNER}"))?;

    if !status.success() {
        let code = status.code().unwrap_or(1);
        return Err(Error::new(HarnessError::ExternalProcess { code }));
    }
    println!(
        "[execute] scenario '{}' completed successfully",
        request.scenario_name
    );
    Ok(())
}

/// Probe the container engine without invoking the runner.
fn engine_available() -> bool {
    Command::new(ENGINE)
        .arg("info")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Persist the composed event where the runner can read it, under the
/// project root so the rebased path stays relative.
fn write_event_file(
    request: &ExecutionRequest<'_>,
    root: &Path,
    config: &HarnessConfig,
) -> Result<PathBuf> {
    let dir = if config.scenarios_dir.is_absolute() {
        config.scenarios_dir.clone()
    } else {
        root.join(&config.scenarios_dir)
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("create event dir {}", dir.display()))?;
    let path = dir.join("event.json");
    let json = serde_json::to_string_pretty(request.event)?;
    fs::write(&path, json).with_context(|| format!("write event file {}", path.display()))?;
    Ok(path)
}

/// Structured runner argv: trigger, rebased paths, optional secrets file,
/// then operator flags verbatim.
fn runner_args(
    trigger: &str,
    workflow_rel: &str,
    event_rel: &str,
    secrets_present: bool,
    extra_flags: &[String],
) -> Vec<String> {
    let mut args = vec![
        trigger.to_string(),
        "-W".to_string(),
        workflow_rel.to_string(),
        "-e".to_string(),
        event_rel.to_string(),
    ];
    if secrets_present {
        args.push("--secret-file".to_string());
        args.push(SECRETS_FILE.to_string());
    }
    args.extend(extra_flags.iter().cloned());
    args
}
