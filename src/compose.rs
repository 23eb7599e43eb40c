//! Event composition: scenario data plus live repository context.

use serde_json::{json, Value};
use std::path::Path;

use crate::gitctx;
use crate::store::Scenario;

/// Placeholder owner used when no remote is configured.
const OWNER_PLACEHOLDER: &str = "owner";
/// Branch used when the default branch cannot be determined.
const DEFAULT_BRANCH: &str = "main";

/// Repository metadata embedded into every composed event.
///
/// Derived fresh per invocation; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RepositoryContext {
    pub(crate) name: String,
    pub(crate) owner: String,
    pub(crate) default_branch: String,
}

impl RepositoryContext {
    /// Derive context from a resolved project root.
    ///
    /// Every field degrades to a placeholder rather than failing: a usable
    /// test event must not be blocked by incomplete repository metadata.
    pub(crate) fn derive(root: &Path) -> Self {
        let name = root
            .file_name()
            .map(|segment| segment.to_string_lossy().to_string())
            .unwrap_or_else(|| "repository".to_string());
        let owner = gitctx::remote_url(root)
            .and_then(|url| owner_from_remote_url(&url))
            .unwrap_or_else(|| {
                tracing::debug!("no usable remote; using placeholder owner");
                OWNER_PLACEHOLDER.to_string()
            });
        let default_branch =
            gitctx::default_branch(root).unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        Self {
            name,
            owner,
            default_branch,
        }
    }
}

/// Overlay repository context onto the scenario's event.
///
/// The synthesized `repository` key always wins over any scenario-supplied
/// one; scenario files cannot override repository fields.
pub(crate) fn compose(scenario: &Scenario, context: &RepositoryContext) -> Value {
    let mut event = scenario.event.clone();
    if !event.is_object() {
        event = json!({});
    }
    let repository = json!({
        "name": context.name,
        "owner": { "login": context.owner },
        "default_branch": context.default_branch,
    });
    if let Some(map) = event.as_object_mut() {
        map.insert("repository".to_string(), repository);
    }
    event
}

/// Extract the account segment from a remote URL, covering the ssh
/// (`git@host:owner/repo.git`) and https (`https://host/owner/repo`) forms.
fn owner_from_remote_url(url: &str) -> Option<String> {
    let path = if let Some((_, rest)) = url.split_once("://") {
        rest.split_once('/').map(|(_, path)| path)?
    } else if let Some((_, rest)) = url.split_once(':') {
        rest
    } else {
        return None;
    };
    let owner = path.split('/').next()?.trim();
    if owner.is_empty() {
        return None;
    }
    Some(owner.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> RepositoryContext {
        RepositoryContext {
            name: "demo".to_string(),
            owner: "acme".to_string(),
            default_branch: "main".to_string(),
        }
    }

    fn scenario(event: Value) -> Scenario {
        Scenario {
            name: "s".to_string(),
            description: String::new(),
            event,
        }
    }

    #[test]
    fn compose_injects_repository_object() {
        let event = compose(&scenario(json!({"action": "labeled"})), &context());
        assert_eq!(event["action"], "labeled");
        assert_eq!(event["repository"]["name"], "demo");
        assert_eq!(event["repository"]["owner"]["login"], "acme");
        assert_eq!(event["repository"]["default_branch"], "main");
    }

    #[test]
    fn synthesized_repository_wins_over_scenario_supplied() {
        let event = compose(
            &scenario(json!({"repository": {"name": "spoofed", "owner": {"login": "evil"}}})),
            &context(),
        );
        assert_eq!(event["repository"]["name"], "demo");
        assert_eq!(event["repository"]["owner"]["login"], "acme");
    }

    #[test]
    fn non_object_event_degrades_to_repository_only() {
        let event = compose(&scenario(json!("not an object")), &context());
        assert_eq!(event["repository"]["name"], "demo");
    }

    #[test]
    fn owner_parsed_from_ssh_and_https_remotes() {
        assert_eq!(
            owner_from_remote_url("git@github.com:acme/demo.git").as_deref(),
            Some("acme")
        );
        assert_eq!(
            owner_from_remote_url("https://github.com/acme/demo").as_deref(),
            Some("acme")
        );
        assert_eq!(owner_from_remote_url("not-a-url"), None);
    }
}
