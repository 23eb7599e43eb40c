//! CLI argument parsing for the workflow test harness.
//!
//! The CLI is intentionally thin: flags resolve into a `HarnessConfig` once
//! per invocation and everything else lives in the operation layer.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "wfh",
    version,
    about = "Local scenario harness for event-driven workflow testing",
    after_help = "Commands:\n  list                         Discover workflows and their triggers\n  init <workflow>              Generate a scenario set for a workflow\n  scenarios <workflow>         List the numbered scenarios of a workflow\n  test <workflow> <number>     Run one scenario (simulate by default)\n  test-all <workflow>          Run every scenario sequentially\n\nExamples:\n  wfh list\n  wfh init release.yml\n  wfh init 2\n  wfh scenarios release.yml\n  wfh test release.yml 2\n  wfh test release.yml 2 --execute\n  wfh test-all release.yml --execute --runner-flags '--container-architecture linux/amd64'",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub(crate) struct RootArgs {
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Top-level commands, one per core operation.
#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    List(ListArgs),
    Init(InitArgs),
    Scenarios(ScenariosArgs),
    Test(TestArgs),
    TestAll(TestAllArgs),
}

/// Directory and root flags shared by every command.
#[derive(Parser, Debug)]
pub(crate) struct CommonArgs {
    /// Directory holding workflow definition files
    #[arg(long, value_name = "DIR")]
    pub(crate) workflows_dir: Option<PathBuf>,

    /// Directory holding scenario-set files
    #[arg(long, value_name = "DIR")]
    pub(crate) scenarios_dir: Option<PathBuf>,

    /// Project root (auto-detected from the current directory when omitted)
    #[arg(long, value_name = "DIR")]
    pub(crate) root: Option<PathBuf>,

    /// Emit a verbose transcript of the operation
    #[arg(long)]
    pub(crate) verbose: bool,
}

/// List discovered workflows.
#[derive(Parser, Debug)]
#[command(about = "Discover workflows and their triggers")]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub(crate) common: CommonArgs,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub(crate) json: bool,
}

/// Generate a scenario set for one workflow.
#[derive(Parser, Debug)]
#[command(about = "Generate a trigger-matched scenario set for a workflow")]
pub(crate) struct InitArgs {
    /// Workflow file name or its number from `wfh list`
    #[arg(value_name = "WORKFLOW")]
    pub(crate) workflow: String,

    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

/// List the scenarios of a workflow.
#[derive(Parser, Debug)]
#[command(about = "List the numbered scenarios of a workflow")]
pub(crate) struct ScenariosArgs {
    /// Workflow file name
    #[arg(value_name = "WORKFLOW")]
    pub(crate) workflow: String,

    #[command(flatten)]
    pub(crate) common: CommonArgs,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub(crate) json: bool,
}

/// Run a single scenario.
#[derive(Parser, Debug)]
#[command(about = "Run one scenario against a workflow")]
pub(crate) struct TestArgs {
    /// Workflow file name
    #[arg(value_name = "WORKFLOW")]
    pub(crate) workflow: String,

    /// 1-based scenario number from `wfh scenarios`
    #[arg(value_name = "NUMBER")]
    pub(crate) number: usize,

    #[command(flatten)]
    pub(crate) common: CommonArgs,

    /// Invoke the external runner instead of rendering the event
    #[arg(long)]
    pub(crate) execute: bool,

    /// Extra flags forwarded verbatim to the runner (shell-style string)
    #[arg(long, value_name = "FLAGS")]
    pub(crate) runner_flags: Option<String>,
}

/// Run every scenario of a workflow.
#[derive(Parser, Debug)]
#[command(about = "Run every scenario of a workflow sequentially")]
pub(crate) struct TestAllArgs {
    /// Workflow file name
    #[arg(value_name = "WORKFLOW")]
    pub(crate) workflow: String,

    #[command(flatten)]
    pub(crate) common: CommonArgs,

    /// Invoke the external runner instead of rendering the events
    #[arg(long)]
    pub(crate) execute: bool,

    /// Extra flags forwarded verbatim to the runner (shell-style string)
    #[arg(long, value_name = "FLAGS")]
    pub(crate) runner_flags: Option<String>,
}
