// src/tools.rs

//! Build tool requirements
//!
//! A recipe declares the tools it builds with as `name/version` pairs
//! (`cmake/3.24.1`, `ninja/1.11.1`). The tools hook probes PATH for each
//! one and reads its `--version` output. The declared version is a floor:
//! a newer installed tool satisfies the requirement, an older one does not.

use crate::error::{Error, Result};
use crate::recipe::Recipe;
use semver::Version;
use std::path::{Path, PathBuf};

/// One parsed `name/version` tool requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequirement {
    pub name: String,
    pub version: Version,
}

impl ToolRequirement {
    /// Parse a `name/version` pair as written in the recipe
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, version) = spec.split_once('/').ok_or_else(|| {
            Error::Parse(format!(
                "invalid tool requirement `{}`: expected `name/version`",
                spec
            ))
        })?;
        if name.is_empty() {
            return Err(Error::Parse(format!(
                "invalid tool requirement `{}`: empty tool name",
                spec
            )));
        }
        let version = Version::parse(version).map_err(|e| {
            Error::Parse(format!("invalid tool requirement `{}`: {}", spec, e))
        })?;
        Ok(Self {
            name: name.to_string(),
            version,
        })
    }
}

impl std::fmt::Display for ToolRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Result of probing PATH for one requirement
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub requirement: ToolRequirement,
    /// Where the tool was found, if anywhere
    pub path: Option<PathBuf>,
    /// Version reported by the tool, if it could be read
    pub found: Option<Version>,
}

impl ToolStatus {
    /// True when the tool is present and at least the declared version
    pub fn satisfied(&self) -> bool {
        match (&self.path, &self.found) {
            (Some(_), Some(found)) => *found >= self.requirement.version,
            _ => false,
        }
    }
}

/// Parse every tool requirement declared by the recipe
pub fn requirements(recipe: &Recipe) -> Result<Vec<ToolRequirement>> {
    recipe
        .build
        .tool_requires
        .iter()
        .map(|spec| ToolRequirement::parse(spec))
        .collect()
}

/// Probe PATH for every declared tool without failing on absence
pub fn check_tools(recipe: &Recipe) -> Result<Vec<ToolStatus>> {
    Ok(requirements(recipe)?.into_iter().map(probe).collect())
}

/// Probe PATH for every declared tool, failing on the first one that is
/// missing or too old
pub fn require_tools(recipe: &Recipe) -> Result<Vec<ToolStatus>> {
    let statuses = check_tools(recipe)?;
    for status in &statuses {
        if status.path.is_none() {
            return Err(Error::ToolMissing(status.requirement.name.clone()));
        }
        if !status.satisfied() {
            return Err(Error::ToolVersion {
                tool: status.requirement.name.clone(),
                found: status
                    .found
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                required: status.requirement.version.to_string(),
            });
        }
    }
    Ok(statuses)
}

fn probe(requirement: ToolRequirement) -> ToolStatus {
    let path = which::which(&requirement.name).ok();
    let found = path.as_deref().and_then(probe_version);
    ToolStatus {
        requirement,
        path,
        found,
    }
}

fn probe_version(tool: &Path) -> Option<Version> {
    let output = std::process::Command::new(tool)
        .arg("--version")
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    extract_version(stdout.lines().next()?)
}

/// Pull a semver-ish version out of a `--version` banner line.
///
/// Tools disagree on the shape of the line (`cmake version 3.24.1`,
/// `ninja 1.11.1`, `1.11.1.git.kitware.jobserver-1`), so take the first
/// whitespace token that starts with digits and pad it to three parts.
fn extract_version(line: &str) -> Option<Version> {
    for token in line.split_whitespace() {
        let token = token.trim_start_matches('v');
        let digits: String = token
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        let digits = digits.trim_matches('.');
        if digits.is_empty() {
            continue;
        }
        let mut parts: Vec<&str> = digits.split('.').take(3).collect();
        while parts.len() < 3 {
            parts.push("0");
        }
        if let Ok(version) = Version::parse(&parts.join(".")) {
            return Some(version);
        }
    }
    None
}
