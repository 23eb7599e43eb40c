//! Typed failure kinds shared across the harness.
//!
//! Errors travel wrapped in `anyhow::Error` so call sites can attach context;
//! `main` downcasts to classify warning-class failures and pick exit codes.

use thiserror::Error;

/// Domain failures the harness distinguishes beyond plain context strings.
#[derive(Error, Debug)]
pub(crate) enum HarnessError {
    /// Missing or empty inputs the operator must fix (workflows dir,
    /// scenario-set file). Always fatal; message carries remediation.
    #[error("{0}")]
    Configuration(String),

    /// Bad operator input (non-numeric or out-of-range scenario number).
    #[error("{0}")]
    Validation(String),

    /// An explicit project-root override pointed at a path that is absent.
    #[error("directory not found: {0}")]
    DirectoryNotFound(String),

    /// No resolvable version-controlled project root.
    #[error("{0} is not inside a git repository (pass --root to point at one)")]
    NotAProject(String),

    /// External runner binary is not installed.
    #[error("runner `{0}` not found on PATH (install it to use execute mode)")]
    ToolUnavailable(String),

    /// Container engine behind the runner is not reachable.
    #[error("container engine `{0}` is not responding (is the daemon running?)")]
    EngineUnavailable(String),

    /// External runner exited non-zero; code is propagated, not interpreted.
    #[error("runner exited with status {code}")]
    ExternalProcess { code: i32 },
}

impl HarnessError {
    /// Warning-class failures abort the operation but are reported rather
    /// than escalated to a crash.
    pub(crate) fn is_warning(&self) -> bool {
        matches!(
            self,
            HarnessError::ToolUnavailable(_)
                | HarnessError::EngineUnavailable(_)
                | HarnessError::ExternalProcess { .. }
        )
    }

    /// Process exit code for this failure.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            HarnessError::ExternalProcess { code } => *code,
            _ => 1,
        }
    }
}
