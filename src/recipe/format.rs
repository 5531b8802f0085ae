// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe how to fetch, build, and package one
//! external CMake project. A recipe declares data only: metadata, the
//! settings it forwards, the tools and libraries it needs, toolchain
//! customization hooks, and the copy rules that shape the package tree. The
//! lifecycle runtime supplies all behavior.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete build recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Build requirements and build-tool configuration
    #[serde(default)]
    pub build: BuildSection,

    /// Toolchain customization hooks
    ///
    /// Present even when empty; most recipes leave both maps unset and the
    /// generated toolchain file carries only the forwarded settings.
    #[serde(default)]
    pub toolchain: ToolchainSection,

    /// Artifact copy rules applied by the package hook, in order
    #[serde(default)]
    pub package_copy: Vec<CopyRule>,
}

impl Recipe {
    /// Whether the recipe's settings list names `name`
    ///
    /// Only listed settings are forwarded into the generated toolchain file.
    pub fn forwards_setting(&self, name: &str) -> bool {
        self.package.settings.iter().any(|s| s == name)
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Settings forwarded verbatim into the generated toolchain file
    ///
    /// The usual full set is `["os", "arch", "compiler", "build_type"]`.
    /// Values come from the host (or command-line overrides); the recipe
    /// never interprets them.
    #[serde(default)]
    pub settings: Vec<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// License identifier (SPDX)
    #[serde(default)]
    pub license: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,
}

/// Build requirements section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSection {
    /// Required build tools as `name/version` pairs
    ///
    /// The version is a floor: the probe accepts any tool at least that new.
    /// Format: `["cmake/3.24.1", "ninja/1.11.1"]`
    #[serde(default)]
    pub tool_requires: Vec<String>,

    /// Library dependencies as `name` or `name/version` entries
    ///
    /// Each entry gets a `<name>-config.cmake` locator stub pointing at the
    /// dependency's package tree under the galley home.
    #[serde(default)]
    pub requires: Vec<String>,

    /// Build-file generator passed to cmake `-G`
    #[serde(default = "default_generator")]
    pub generator: String,

    /// Parallel build jobs (default: the build tool decides)
    #[serde(default)]
    pub jobs: Option<u32>,
}

fn default_generator() -> String {
    "Ninja".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            tool_requires: Vec::new(),
            requires: Vec::new(),
            generator: default_generator(),
            jobs: None,
        }
    }
}

/// Toolchain customization hooks
///
/// Sorted maps keep the generated file stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolchainSection {
    /// Extra cache variables written as `set(<key> "<value>" CACHE ...)`
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Preprocessor definitions written as `add_compile_definitions(...)`
    #[serde(default)]
    pub defines: BTreeMap<String, String>,
}

impl ToolchainSection {
    /// True when neither hook carries any entries
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.defines.is_empty()
    }
}

/// One artifact copy rule
///
/// Files under the origin folder whose names match `pattern` are copied,
/// flattened, into the package tree subfolder named by `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRule {
    /// File-name glob, e.g. `*.h`
    pub pattern: String,

    /// Folder the rule reads from
    pub from: CopyOrigin,

    /// Destination subfolder under the package tree, e.g. `api`
    pub to: String,
}

/// Origin folder of a copy rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyOrigin {
    /// The checked-out source tree
    Source,
    /// The cmake build tree
    Build,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RECIPE: &str = r#"
[package]
name = "aoc2022"
version = "0.1.0"
settings = ["os", "arch", "compiler", "build_type"]

[build]
tool_requires = ["cmake/3.24.1", "ninja/1.11.1"]
requires = []

[toolchain.variables]

[toolchain.defines]

[[package_copy]]
pattern = "*.h"
from = "source"
to = "api"

[[package_copy]]
pattern = "*.lib"
from = "build"
to = "lib"

[[package_copy]]
pattern = "*.dll"
from = "build"
to = "bin"
"#;

    #[test]
    fn test_parse_recipe() {
        let recipe: Recipe = toml::from_str(SAMPLE_RECIPE).unwrap();

        assert_eq!(recipe.package.name, "aoc2022");
        assert_eq!(recipe.package.version, "0.1.0");
        assert_eq!(
            recipe.package.settings,
            vec!["os", "arch", "compiler", "build_type"]
        );

        assert_eq!(
            recipe.build.tool_requires,
            vec!["cmake/3.24.1", "ninja/1.11.1"]
        );
        assert!(recipe.build.requires.is_empty());
        assert_eq!(recipe.build.generator, "Ninja");

        assert_eq!(recipe.package_copy.len(), 3);
        assert_eq!(recipe.package_copy[0].pattern, "*.h");
        assert_eq!(recipe.package_copy[0].from, CopyOrigin::Source);
        assert_eq!(recipe.package_copy[0].to, "api");
        assert_eq!(recipe.package_copy[1].from, CopyOrigin::Build);
        assert_eq!(recipe.package_copy[2].to, "bin");
    }

    #[test]
    fn test_toolchain_hooks_present_but_inert() {
        let recipe: Recipe = toml::from_str(SAMPLE_RECIPE).unwrap();
        assert!(recipe.toolchain.is_empty());
    }

    #[test]
    fn test_minimal_recipe() {
        let minimal = r#"
[package]
name = "hello"
version = "1.0"
"#;

        let recipe: Recipe = toml::from_str(minimal).unwrap();
        assert_eq!(recipe.package.name, "hello");
        assert!(recipe.package.settings.is_empty());
        assert!(recipe.build.tool_requires.is_empty());
        assert_eq!(recipe.build.generator, "Ninja"); // default
        assert!(recipe.build.jobs.is_none());
        assert!(recipe.toolchain.is_empty());
        assert!(recipe.package_copy.is_empty());
    }

    #[test]
    fn test_toolchain_hooks_parse() {
        let toml = r#"
[package]
name = "hooked"
version = "1.0"

[toolchain.variables]
MYVAR = "1"

[toolchain.defines]
MYDEFINE = "2"
"#;
        let recipe: Recipe = toml::from_str(toml).unwrap();
        assert!(!recipe.toolchain.is_empty());
        assert_eq!(recipe.toolchain.variables.get("MYVAR").unwrap(), "1");
        assert_eq!(recipe.toolchain.defines.get("MYDEFINE").unwrap(), "2");
    }

    #[test]
    fn test_forwards_setting() {
        let recipe: Recipe = toml::from_str(SAMPLE_RECIPE).unwrap();
        assert!(recipe.forwards_setting("os"));
        assert!(recipe.forwards_setting("build_type"));
        assert!(!recipe.forwards_setting("libc"));
    }

    #[test]
    fn test_custom_generator() {
        let toml = r#"
[package]
name = "make-based"
version = "1.0"

[build]
generator = "Unix Makefiles"
jobs = 4
"#;
        let recipe: Recipe = toml::from_str(toml).unwrap();
        assert_eq!(recipe.build.generator, "Unix Makefiles");
        assert_eq!(recipe.build.jobs, Some(4));
    }
}
