//! Canned scenario templates per trigger type.
//!
//! `generate` is pure: the same trigger always yields the same template, with
//! no filesystem or repository dependence. Operators edit the result freely
//! after initialization.

use serde_json::json;

use crate::store::{Scenario, ScenarioSet};

/// Closed set of recognized triggers plus a catch-all carrying the raw name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Trigger {
    Issues,
    Push,
    PullRequest,
    WorkflowDispatch,
    Other(String),
}

impl Trigger {
    pub(crate) fn parse(raw: &str) -> Self {
        match raw {
            "issues" => Trigger::Issues,
            "push" => Trigger::Push,
            "pull_request" => Trigger::PullRequest,
            "workflow_dispatch" => Trigger::WorkflowDispatch,
            other => Trigger::Other(other.to_string()),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            Trigger::Issues => "issues",
            Trigger::Push => "push",
            Trigger::PullRequest => "pull_request",
            Trigger::WorkflowDispatch => "workflow_dispatch",
            Trigger::Other(raw) => raw,
        }
    }

    /// Build the canned scenario set for this trigger.
    ///
    /// The `workflow` field is left empty for the caller to backfill with the
    /// resolved relative path.
    pub(crate) fn generate(&self) -> ScenarioSet {
        let scenarios = match self {
            Trigger::Issues => issues_scenarios(),
            Trigger::Push => push_scenarios(),
            Trigger::PullRequest => pull_request_scenarios(),
            Trigger::WorkflowDispatch => workflow_dispatch_scenarios(),
            Trigger::Other(_) => default_scenarios(),
        };
        ScenarioSet {
            workflow: String::new(),
            trigger: self.as_str().to_string(),
            scenarios,
        }
    }
}

/// Labeled-issue scenarios modeling branch selection keyed on labels:
/// a version label, no version label but critical severity, and neither.
fn issues_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "Version label".to_string(),
            description: "Issue labeled with an explicit release version".to_string(),
            event: json!({
                "action": "labeled",
                "label": { "name": "v2.4" },
                "issue": {
                    "number": 101,
                    "title": "Ship the parser fix",
                    "labels": [
                        { "name": "bug" },
                        { "name": "v2.4" }
                    ]
                }
            }),
        },
        Scenario {
            name: "Critical without version".to_string(),
            description: "Critical issue with no version label targets the default branch"
                .to_string(),
            event: json!({
                "action": "labeled",
                "label": { "name": "planned" },
                "severity": "Critical",
                "issue": {
                    "number": 102,
                    "title": "Data loss on restart",
                    "labels": [
                        { "name": "bug" },
                        { "name": "planned" }
                    ]
                }
            }),
        },
        Scenario {
            name: "Routine planned work".to_string(),
            description: "Non-critical issue without a version label".to_string(),
            event: json!({
                "action": "labeled",
                "label": { "name": "planned" },
                "severity": "Low",
                "issue": {
                    "number": 103,
                    "title": "Polish help output",
                    "labels": [
                        { "name": "planned" }
                    ]
                }
            }),
        },
    ]
}

fn push_scenarios() -> Vec<Scenario> {
    vec![Scenario {
        name: "Push to default branch".to_string(),
        description: "Single commit pushed to the default branch".to_string(),
        event: json!({
            "ref": "refs/heads/main",
            "commits": [
                {
                    "id": "0000000000000000000000000000000000000001",
                    "message": "Update docs"
                }
            ]
        }),
    }]
}

fn pull_request_scenarios() -> Vec<Scenario> {
    vec![Scenario {
        name: "Opened pull request".to_string(),
        description: "Pull request opened against the default branch".to_string(),
        event: json!({
            "action": "opened",
            "pull_request": {
                "base": { "ref": "main" },
                "head": { "ref": "feature/change" }
            }
        }),
    }]
}

fn workflow_dispatch_scenarios() -> Vec<Scenario> {
    vec![Scenario {
        name: "Manual dispatch".to_string(),
        description: "Manual run with example inputs".to_string(),
        event: json!({
            "inputs": {
                "environment": "staging",
                "dry_run": "true"
            }
        }),
    }]
}

fn default_scenarios() -> Vec<Scenario> {
    vec![Scenario {
        name: "Default scenario".to_string(),
        description: "Fill in an event payload for this trigger".to_string(),
        event: json!({}),
    }]
}
