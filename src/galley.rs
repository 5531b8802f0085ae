// src/galley.rs

//! Galley: the lifecycle runtime for recipes
//!
//! The Galley owns the home directory and the host settings; a `Bake` is
//! one run of a recipe through the lifecycle hooks. Hooks always run in
//! the fixed order
//!
//! ```text
//! export -> source -> tools -> generate -> build -> package
//! ```
//!
//! `create` drives the whole sequence; the CLI also exposes each hook on
//! its own for piecemeal runs. No hook carries control flow of its own:
//! each one delegates to git, the generators, the cmake binary, or the
//! file system, and the first failure aborts the run.

use crate::cmake;
use crate::error::{Error, Result};
use crate::generate;
use crate::layout::Layout;
use crate::package::{self, PackageManifest};
use crate::pins::{PinsFile, SourcePin, PINS_FILE_NAME};
use crate::recipe::{self, Recipe, RECIPE_FILE_NAME};
use crate::scm;
use crate::settings::Settings;
use crate::tools::{self, ToolStatus};
use std::path::{Path, PathBuf};
use tracing::info;

/// The galley: home directory plus the settings every bake runs under
pub struct Galley {
    home: PathBuf,
    settings: Settings,
    /// Parallel-jobs override taking precedence over the recipe's value
    jobs: Option<u32>,
}

impl Galley {
    /// Create a galley rooted at an explicit home directory
    pub fn new(home: impl AsRef<Path>, settings: Settings) -> Self {
        Self {
            home: home.as_ref().to_path_buf(),
            settings,
            jobs: None,
        }
    }

    /// Create a galley rooted at `~/.galley`
    pub fn with_default_home(settings: Settings) -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Parse("cannot determine home directory".to_string()))?
            .join(".galley");
        Ok(Self::new(home, settings))
    }

    /// Override the parallel job count for build invocations
    pub fn with_jobs(mut self, jobs: Option<u32>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Folder holding per-recipe work trees
    pub fn builds_dir(&self) -> PathBuf {
        self.home.join("builds")
    }

    /// Folder an exported recipe copy and its pins live in
    pub fn exported_dir(&self, recipe: &Recipe) -> PathBuf {
        self.home
            .join("recipes")
            .join(&recipe.package.name)
            .join(&recipe.package.version)
    }

    /// Resolved work-tree layout for a recipe under this galley's settings
    pub fn layout_for(&self, recipe: &Recipe) -> Layout {
        Layout::new(
            &self.builds_dir().join(&recipe.package.name),
            &self.settings,
        )
    }

    /// Start one bake: parse and validate the recipe in `recipe_dir`
    pub fn bake(&self, recipe_dir: &Path) -> Result<Bake<'_>> {
        Bake::new(self, recipe_dir)
    }

    /// Run the whole lifecycle for the recipe in `recipe_dir`
    pub fn create(&self, recipe_dir: &Path) -> Result<CreateResult> {
        let mut bake = self.bake(recipe_dir)?;

        info!("export: capturing source pin");
        bake.export()?;

        info!("source: checking out pinned commit");
        bake.source()?;

        info!("tools: probing build requirements");
        bake.tools()?;

        info!("generate: writing toolchain and dependency files");
        bake.generate()?;

        info!("build: configuring and building");
        bake.build()?;

        info!("package: copying artifacts");
        let manifest = bake.package()?;

        Ok(bake.finish(manifest))
    }
}

/// One run of a recipe through the lifecycle
pub struct Bake<'a> {
    galley: &'a Galley,
    recipe_dir: PathBuf,
    recipe: Recipe,
    layout: Layout,
    log: String,
    warnings: Vec<String>,
}

/// Outcome of a completed `create` run
#[derive(Debug)]
pub struct CreateResult {
    /// The populated package folder
    pub package_dir: PathBuf,
    /// Manifest of every packaged file
    pub manifest: PackageManifest,
    /// Accumulated run log
    pub log: String,
    /// Warnings gathered along the way (validation, probe oddities)
    pub warnings: Vec<String>,
}

impl<'a> Bake<'a> {
    fn new(galley: &'a Galley, recipe_dir: &Path) -> Result<Self> {
        let recipe_path = recipe::parser::resolve_recipe_path(recipe_dir);
        let recipe = recipe::parse_recipe_file(&recipe_path)?;
        let warnings = recipe::validate_recipe(&recipe)?;

        let layout = galley.layout_for(&recipe);
        Ok(Self {
            galley,
            recipe_dir: recipe_dir.to_path_buf(),
            recipe,
            layout,
            log: String::new(),
            warnings,
        })
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }

    /// Export hook: copy the recipe into the galley home and record the
    /// `{url, commit}` pin of the repository it lives in
    pub fn export(&mut self) -> Result<SourcePin> {
        let pin = scm::capture_pin(&self.recipe_dir)?;

        let exported = self.galley.exported_dir(&self.recipe);
        std::fs::create_dir_all(&exported)?;
        let recipe_path = recipe::parser::resolve_recipe_path(&self.recipe_dir);
        std::fs::copy(&recipe_path, exported.join(RECIPE_FILE_NAME))?;
        PinsFile::new(pin.clone()).store(&exported.join(PINS_FILE_NAME))?;

        self.log_line(&format!("exported {} to {}", pin.url, exported.display()));
        Ok(pin)
    }

    /// Source hook: clone the pinned repository into the layout's source dir.
    ///
    /// The pin is read from the recipe folder if a pins file sits next to
    /// the recipe (the exported copy always does), falling back to the
    /// exported copy under the galley home.
    pub fn source(&mut self) -> Result<()> {
        let pin = self.find_pin()?;
        scm::clone_at_pin(&pin, &self.layout.source_dir)?;
        self.log_line(&format!(
            "checked out {} at {}",
            pin.url,
            &pin.commit[..pin.commit.len().min(12)]
        ));
        Ok(())
    }

    fn find_pin(&self) -> Result<SourcePin> {
        let local = self.recipe_dir.join(PINS_FILE_NAME);
        if local.is_file() {
            return Ok(PinsFile::load(&local)?.sources);
        }
        let exported = self.galley.exported_dir(&self.recipe).join(PINS_FILE_NAME);
        if exported.is_file() {
            return Ok(PinsFile::load(&exported)?.sources);
        }
        Err(Error::PinsMissing {
            recipe: self.recipe.package.name.clone(),
            searched: exported,
        })
    }

    /// Tools hook: probe PATH for every declared build tool, failing on
    /// any that is missing or older than the declared floor
    pub fn tools(&mut self) -> Result<Vec<ToolStatus>> {
        let statuses = tools::require_tools(&self.recipe)?;
        for status in &statuses {
            self.log_line(&format!(
                "tool {} found at {}",
                status.requirement,
                status
                    .path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ));
        }
        Ok(statuses)
    }

    /// Generate hook: write the toolchain script and one dependency config
    /// per library requirement into the generators dir
    pub fn generate(&mut self) -> Result<()> {
        let toolchain =
            generate::write_toolchain(&self.recipe, &self.galley.settings, &self.layout)?;
        self.log_line(&format!("wrote {}", toolchain.display()));

        let configs =
            generate::write_dependency_configs(&self.recipe, &self.galley.builds_dir(), &self.layout)?;
        for config in configs {
            self.log_line(&format!("wrote {}", config.display()));
        }
        Ok(())
    }

    /// Build hook: cmake configure then build against the generated files
    pub fn build(&mut self) -> Result<()> {
        let configure = cmake::configure(
            &self.layout,
            &self.recipe.build.generator,
            &self.galley.settings.build_type,
        )?;
        self.log.push_str(&configure.stdout);

        let jobs = self.galley.jobs.or(self.recipe.build.jobs);
        let build = cmake::build(&self.layout, jobs)?;
        self.log.push_str(&build.stdout);
        Ok(())
    }

    /// Package hook: apply the copy rules and write the manifest
    pub fn package(&mut self) -> Result<PackageManifest> {
        let manifest = package::package(&self.recipe, &self.layout)?;
        self.log_line(&format!(
            "packaged {} files into {}",
            manifest.files.len(),
            self.layout.package_dir.display()
        ));
        Ok(manifest)
    }

    /// Consume the bake into its result
    pub fn finish(self, manifest: PackageManifest) -> CreateResult {
        CreateResult {
            package_dir: self.layout.package_dir,
            manifest,
            log: self.log,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPE: &str = r#"
[package]
name = "aoc2022"
version = "0.1.0"
license = "MIT"
settings = ["os", "arch", "compiler", "build_type"]

[build]
tool_requires = ["cmake/3.24.1", "ninja/1.11.1"]

[[package_copy]]
pattern = "*.h"
from = "source"
to = "api"
"#;

    fn write_recipe(dir: &Path) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(RECIPE_FILE_NAME), RECIPE).unwrap();
    }

    fn galley(home: &Path) -> Galley {
        Galley::new(home, Settings::detect().with_build_type("Release"))
    }

    #[test]
    fn test_bake_rejects_invalid_recipe() {
        let temp = tempfile::tempdir().unwrap();
        let recipe_dir = temp.path().join("recipe");
        std::fs::create_dir_all(&recipe_dir).unwrap();
        std::fs::write(
            recipe_dir.join(RECIPE_FILE_NAME),
            "[package]\nname = \"\"\nversion = \"1.0\"\n",
        )
        .unwrap();

        assert!(galley(&temp.path().join("home")).bake(&recipe_dir).is_err());
    }

    #[test]
    fn test_export_writes_recipe_copy_and_pin() {
        let temp = tempfile::tempdir().unwrap();
        let recipe_dir = temp.path().join("recipe");
        write_recipe(&recipe_dir);

        let repo = git2::Repository::init(&recipe_dir).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "galley-test").unwrap();
        config.set_str("user.email", "galley@example.invalid").unwrap();
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = repo.signature().unwrap();
        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, "recipe", &tree, &[])
            .unwrap();
        repo.remote("origin", "https://example.com/aoc2022.git")
            .unwrap();

        let galley = galley(&temp.path().join("home"));
        let mut bake = galley.bake(&recipe_dir).unwrap();
        let pin = bake.export().unwrap();
        assert_eq!(pin.commit, oid.to_string());

        let exported = galley.exported_dir(bake.recipe());
        assert!(exported.join(RECIPE_FILE_NAME).is_file());
        let pins = PinsFile::load(&exported.join(PINS_FILE_NAME)).unwrap();
        assert_eq!(pins.sources, pin);
    }

    #[test]
    fn test_source_without_pin_reports_where_it_looked() {
        let temp = tempfile::tempdir().unwrap();
        let recipe_dir = temp.path().join("recipe");
        write_recipe(&recipe_dir);

        let galley = galley(&temp.path().join("home"));
        let mut bake = galley.bake(&recipe_dir).unwrap();
        let err = bake.source().unwrap_err();
        match err {
            Error::PinsMissing { recipe, searched } => {
                assert_eq!(recipe, "aoc2022");
                assert!(searched.starts_with(galley.home()));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_source_failure_leaves_no_package_output() {
        let temp = tempfile::tempdir().unwrap();
        let recipe_dir = temp.path().join("recipe");
        write_recipe(&recipe_dir);
        PinsFile::new(SourcePin {
            url: temp.path().join("no-such-upstream").display().to_string(),
            commit: "0123456789abcdef0123456789abcdef01234567".to_string(),
        })
        .store(&recipe_dir.join(PINS_FILE_NAME))
        .unwrap();

        let galley = galley(&temp.path().join("home"));
        let mut bake = galley.bake(&recipe_dir).unwrap();
        assert!(bake.source().is_err());
        assert!(!bake.layout().package_dir.exists());
    }

    #[test]
    fn test_validation_warnings_carried_into_result() {
        let temp = tempfile::tempdir().unwrap();
        let recipe_dir = temp.path().join("recipe");
        std::fs::create_dir_all(&recipe_dir).unwrap();
        // No tools, no copy rules, no license
        std::fs::write(
            recipe_dir.join(RECIPE_FILE_NAME),
            "[package]\nname = \"bare\"\nversion = \"1.0\"\n",
        )
        .unwrap();

        let galley = galley(&temp.path().join("home"));
        let bake = galley.bake(&recipe_dir).unwrap();
        let result = bake.finish(PackageManifest::default());
        assert!(result.warnings.iter().any(|w| w.contains("no build tools")));
    }
}
