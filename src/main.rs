use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod compose;
mod config;
mod discovery;
mod dispatch;
mod error;
mod gitctx;
mod ops;
mod paths;
mod store;
mod templates;

use cli::{Command, CommonArgs, RootArgs};
use config::HarnessConfig;
use dispatch::RunMode;
use error::HarnessError;

fn main() -> ExitCode {
    let args = RootArgs::parse();
    init_tracing(verbose_flag(&args));

    match run(args) {
        Ok(code) => code,
        Err(err) => report(err),
    }
}

fn run(args: RootArgs) -> Result<ExitCode> {
    match args.command {
        Command::List(args) => {
            let config = harness_config(&args.common, None)?;
            ops::discover_and_list(&config, args.json)?;
        }
        Command::Init(args) => {
            let config = harness_config(&args.common, None)?;
            ops::initialize(&args.workflow, &config)?;
        }
        Command::Scenarios(args) => {
            let config = harness_config(&args.common, None)?;
            ops::list_scenarios(&args.workflow, &config, args.json)?;
        }
        Command::Test(args) => {
            let config = harness_config(&args.common, args.runner_flags.as_deref())?;
            let mode = run_mode(args.execute);
            ops::test(&args.workflow, args.number, mode, &config)?;
        }
        Command::TestAll(args) => {
            let config = harness_config(&args.common, args.runner_flags.as_deref())?;
            let mode = run_mode(args.execute);
            let failed = ops::test_all(&args.workflow, mode, &config)?;
            if failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn harness_config(common: &CommonArgs, runner_flags: Option<&str>) -> Result<HarnessConfig> {
    let flags = match runner_flags {
        Some(raw) => shell_words::split(raw).context("parse --runner-flags")?,
        None => Vec::new(),
    };
    Ok(HarnessConfig::new(
        common.workflows_dir.clone(),
        common.scenarios_dir.clone(),
        common.root.clone(),
        flags,
    ))
}

fn run_mode(execute: bool) -> RunMode {
    if execute {
        RunMode::Execute
    } else {
        RunMode::Simulate
    }
}

fn verbose_flag(args: &RootArgs) -> bool {
    match &args.command {
        Command::List(args) => args.common.verbose,
        Command::Init(args) => args.common.verbose,
        Command::Scenarios(args) => args.common.verbose,
        Command::Test(args) => args.common.verbose,
        Command::TestAll(args) => args.common.verbose,
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Classify a failure: warning-class kinds report and set the exit code,
/// everything else is an error abort.
fn report(err: anyhow::Error) -> ExitCode {
    match err.downcast_ref::<HarnessError>() {
        Some(kind) if kind.is_warning() => {
            eprintln!("warning: {kind}");
            exit_code_from(kind.exit_code())
        }
        Some(kind) => {
            eprintln!("error: {kind}");
            exit_code_from(kind.exit_code())
        }
        None => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn exit_code_from(code: i32) -> ExitCode {
    u8::try_from(code)
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}
