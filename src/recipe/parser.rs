// src/recipe/parser.rs

//! Recipe file parsing and validation

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::tools::ToolRequirement;
use std::path::{Path, PathBuf};

/// File name a recipe folder is expected to contain
pub const RECIPE_FILE_NAME: &str = "galley.toml";

/// Accept either a recipe folder or a direct path to the recipe file
pub fn resolve_recipe_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(RECIPE_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::Parse(format!("invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Parse(format!("cannot read recipe {}: {}", path.display(), e)))?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Returns warnings for omissions a recipe can legitimately carry; errors
/// only on values the lifecycle cannot run with.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    // Name and version become path segments under the galley home
    if recipe.package.name.is_empty() {
        return Err(Error::Parse("recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::Parse("recipe package version cannot be empty".to_string()));
    }
    for (field, value) in [
        ("name", &recipe.package.name),
        ("version", &recipe.package.version),
    ] {
        if value.contains('/') || value.contains(char::is_whitespace) {
            return Err(Error::Parse(format!(
                "recipe package {} `{}` may not contain `/` or whitespace",
                field, value
            )));
        }
    }

    // Tool requirements must be well-formed name/version pairs
    for entry in &recipe.build.tool_requires {
        ToolRequirement::parse(entry)?;
    }

    // Copy rules land inside the package tree; reject escapes
    for rule in &recipe.package_copy {
        if rule.pattern.is_empty() {
            return Err(Error::Parse("copy rule pattern cannot be empty".to_string()));
        }
        let to = Path::new(&rule.to);
        if to.is_absolute() || rule.to.split('/').any(|seg| seg == "..") {
            return Err(Error::Parse(format!(
                "copy rule destination `{}` must stay inside the package tree",
                rule.to
            )));
        }
    }

    // Settings names outside the known tuple are forwarded as nothing
    for name in &recipe.package.settings {
        if !matches!(name.as_str(), "os" | "arch" | "compiler" | "build_type") {
            warnings.push(format!("unknown setting `{}` will not be forwarded", name));
        }
    }

    if recipe.build.tool_requires.is_empty() {
        warnings.push("recipe declares no build tools".to_string());
    }
    if recipe.package_copy.is_empty() {
        warnings.push("recipe declares no copy rules; packaging will produce an empty tree".to_string());
    }
    if recipe.package.license.is_none() {
        warnings.push("missing package license".to_string());
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_recipe() {
        let content = r#"
[package]
name = "test"
version = "1.0"

[build]
tool_requires = ["cmake/3.24.1"]
"#;

        let recipe = parse_recipe(content).unwrap();
        assert_eq!(recipe.package.name, "test");
    }

    #[test]
    fn test_parse_invalid_recipe() {
        let content = "this is not valid toml at all {}";
        assert!(parse_recipe(content).is_err());
    }

    #[test]
    fn test_validate_empty_name() {
        let content = r#"
[package]
name = ""
version = "1.0"
"#;

        let recipe = parse_recipe(content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_name_with_separator() {
        let content = r#"
[package]
name = "evil/../../name"
version = "1.0"
"#;

        let recipe = parse_recipe(content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_bad_tool_requirement() {
        let content = r#"
[package]
name = "test"
version = "1.0"

[build]
tool_requires = ["cmake"]
"#;

        let recipe = parse_recipe(content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_copy_rule_escape() {
        let content = r#"
[package]
name = "test"
version = "1.0"

[[package_copy]]
pattern = "*.h"
from = "source"
to = "../outside"
"#;

        let recipe = parse_recipe(content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_warnings() {
        let content = r#"
[package]
name = "test"
version = "1.0"
settings = ["os", "libc"]
"#;

        let recipe = parse_recipe(content).unwrap();
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("libc")));
        assert!(warnings.iter().any(|w| w.contains("no build tools")));
        assert!(warnings.iter().any(|w| w.contains("no copy rules")));
        assert!(warnings.iter().any(|w| w.contains("license")));
    }

    #[test]
    fn test_resolve_recipe_path() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_recipe_path(temp.path()),
            temp.path().join(RECIPE_FILE_NAME)
        );

        let file = temp.path().join("other.toml");
        std::fs::write(&file, "").unwrap();
        assert_eq!(resolve_recipe_path(&file), file);
    }
}
