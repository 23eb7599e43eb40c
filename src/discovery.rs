//! Workflow file discovery and trigger extraction.
//!
//! Discovery is recomputed on every call: ordinals are stable only within a
//! single call, and a stored ordinal is a snapshot, not an identity.

use anyhow::{Context, Error, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;

/// File extensions recognized as workflow definitions.
const WORKFLOW_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// One discovered workflow file, numbered within the current discovery call.
#[derive(Debug, Clone)]
pub(crate) struct WorkflowDescriptor {
    pub(crate) path: PathBuf,
    pub(crate) basename: String,
    pub(crate) declared_name: String,
    pub(crate) trigger: String,
    /// 1-based position after lexicographic sort by full path.
    pub(crate) ordinal: usize,
}

/// Name and trigger extracted from a workflow's front matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WorkflowMeta {
    pub(crate) declared_name: String,
    pub(crate) trigger: String,
}

/// Enumerate workflow files under `workflows_dir`, sorted and numbered.
pub(crate) fn discover(workflows_dir: &Path) -> Result<Vec<WorkflowDescriptor>> {
    if !workflows_dir.is_dir() {
        return Err(Error::new(HarnessError::Configuration(format!(
            "no workflows directory at {} (pass --workflows-dir or run from the project root)",
            workflows_dir.display()
        ))));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(workflows_dir)
        .with_context(|| format!("read workflows dir {}", workflows_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let recognized = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| WORKFLOW_EXTENSIONS.contains(&ext));
        if recognized {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(Error::new(HarnessError::Configuration(format!(
            "no workflow files found in {}",
            workflows_dir.display()
        ))));
    }

    let descriptors = files
        .into_iter()
        .enumerate()
        .map(|(idx, path)| {
            let meta = inspect(&path);
            let basename = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            WorkflowDescriptor {
                basename,
                declared_name: meta.declared_name,
                trigger: meta.trigger,
                ordinal: idx + 1,
                path,
            }
        })
        .collect();
    Ok(descriptors)
}

/// Resolve a workflow selector (basename or 1-based ordinal) against a
/// discovery result.
pub(crate) fn select<'a>(
    selector: &str,
    descriptors: &'a [WorkflowDescriptor],
) -> Result<&'a WorkflowDescriptor> {
    if let Ok(ordinal) = selector.parse::<usize>() {
        return descriptors
            .iter()
            .find(|descriptor| descriptor.ordinal == ordinal)
            .ok_or_else(|| {
                Error::new(HarnessError::Validation(format!(
                    "workflow number {ordinal} is out of range (1..={})",
                    descriptors.len()
                )))
            });
    }
    descriptors
        .iter()
        .find(|descriptor| descriptor.basename == selector)
        .ok_or_else(|| {
            Error::new(HarnessError::Validation(format!(
                "no workflow named {selector} (run `wfh list` to see choices)"
            )))
        })
}

/// Extract name and first trigger from a workflow file.
///
/// Strategies are tried in fixed priority order; both are lossy by contract
/// and degrade to empty fields rather than failing discovery.
pub(crate) fn inspect(path: &Path) -> WorkflowMeta {
    let Ok(content) = fs::read_to_string(path) else {
        return WorkflowMeta::default();
    };
    for reader in [FrontMatterReader::Yaml, FrontMatterReader::TextualScan] {
        if let Some(meta) = reader.read(&content) {
            return meta;
        }
    }
    WorkflowMeta::default()
}

/// Front-matter reading strategy.
///
/// `Yaml` is the capable structured reader; `TextualScan` is a best-effort
/// heuristic kept for files the YAML parser rejects. It may return empty
/// fields on unusual formatting, which is accepted.
enum FrontMatterReader {
    Yaml,
    TextualScan,
}

impl FrontMatterReader {
    fn read(&self, content: &str) -> Option<WorkflowMeta> {
        match self {
            FrontMatterReader::Yaml => read_yaml(content),
            FrontMatterReader::TextualScan => Some(scan_textual(content)),
        }
    }
}

fn read_yaml(content: &str) -> Option<WorkflowMeta> {
    let doc: serde_yaml::Value = serde_yaml::from_str(content).ok()?;
    if !doc.is_mapping() {
        return None;
    }

    let declared_name = doc
        .get("name")
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_string();

    // Some YAML parsers resolve a bare `on` key to boolean true.
    let triggers = doc
        .get("on")
        .or_else(|| doc.get(serde_yaml::Value::Bool(true)))?;
    let trigger = match triggers {
        serde_yaml::Value::String(single) => single.clone(),
        serde_yaml::Value::Sequence(list) => list
            .first()
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string(),
        serde_yaml::Value::Mapping(map) => map
            .iter()
            .next()
            .and_then(|(key, _)| key.as_str())
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    };
    Some(WorkflowMeta {
        declared_name,
        trigger,
    })
}

fn scan_textual(content: &str) -> WorkflowMeta {
    let name_re = Regex::new(r#"(?m)^name:\s*["']?([^"'\n#]+)"#).ok();
    let declared_name = name_re
        .and_then(|re| {
            re.captures(content)
                .map(|caps| caps[1].trim().to_string())
        })
        .unwrap_or_default();

    // First indented key line after the `on:` declaration.
    let mut trigger = String::new();
    let mut in_triggers = false;
    let key_re = Regex::new(r"^\s+([A-Za-z_][A-Za-z0-9_]*):").ok();
    for line in content.lines() {
        if line.starts_with("on:") {
            let inline = line["on:".len()..].trim();
            if !inline.is_empty() && !inline.starts_with('#') {
                trigger = inline
                    .trim_start_matches('[')
                    .split([',', ']'])
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .trim_matches(['"', '\''])
                    .to_string();
                break;
            }
            in_triggers = true;
            continue;
        }
        if in_triggers {
            if let Some(caps) = key_re.as_ref().and_then(|re| re.captures(line)) {
                trigger = caps[1].to_string();
                break;
            }
            if !line.trim().is_empty() && !line.starts_with(' ') {
                break;
            }
        }
    }
    WorkflowMeta {
        declared_name,
        trigger,
    }
}
