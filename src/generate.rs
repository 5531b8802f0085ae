// src/generate.rs

//! Build system integration files
//!
//! The generate hook writes two kinds of files into the generators dir:
//! a cmake toolchain script carrying the forwarded settings and the
//! recipe's inert variable/define hooks, and one `<name>-config.cmake`
//! per library requirement so `find_package` resolves against package
//! folders under the galley home. Rendering is pure string building over
//! ordered maps, so the same recipe and settings always produce the same
//! bytes.

use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::recipe::Recipe;
use crate::settings::Settings;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Render the toolchain script for a recipe under the given settings
pub fn render_toolchain(recipe: &Recipe, settings: &Settings) -> String {
    let mut out = String::new();
    out.push_str("# Generated by galley; do not edit.\n");
    out.push_str("list(PREPEND CMAKE_PREFIX_PATH \"${CMAKE_CURRENT_LIST_DIR}\")\n");

    for name in &recipe.package.settings {
        if let Some(value) = settings.get(name) {
            out.push_str(&format!(
                "set(GALLEY_{} \"{}\")\n",
                name.to_uppercase(),
                value
            ));
        }
    }
    if recipe.forwards_setting("build_type") {
        out.push_str(&format!(
            "set(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"Build type\")\n",
            settings.build_type
        ));
    }
    for (key, value) in &recipe.toolchain.variables {
        out.push_str(&format!(
            "set({} \"{}\" CACHE STRING \"Recipe variable\")\n",
            key, value
        ));
    }
    for (key, value) in &recipe.toolchain.defines {
        out.push_str(&format!("add_compile_definitions(\"{}={}\")\n", key, value));
    }
    out
}

/// Write the toolchain script into the layout's generators dir
pub fn write_toolchain(recipe: &Recipe, settings: &Settings, layout: &Layout) -> Result<PathBuf> {
    layout.create_dirs()?;
    let path = layout.toolchain_file();
    std::fs::write(&path, render_toolchain(recipe, settings))?;
    debug!("wrote toolchain {}", path.display());
    Ok(path)
}

/// Write a `<name>-config.cmake` for every library requirement.
///
/// `builds_root` is the folder holding per-recipe work trees; each
/// requirement must already have a `package/` folder there. A requirement
/// may be written as `name` or `name/version`; only the name selects the
/// package folder.
pub fn write_dependency_configs(
    recipe: &Recipe,
    builds_root: &Path,
    layout: &Layout,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for entry in &recipe.build.requires {
        let name = match entry.split_once('/') {
            Some((name, _)) => name,
            None => entry.as_str(),
        };
        let package_dir = builds_root.join(name).join("package");
        if !package_dir.is_dir() {
            return Err(Error::DependencyMissing(name.to_string()));
        }

        layout.create_dirs()?;
        let path = layout.generators_dir.join(format!("{}-config.cmake", name));
        std::fs::write(&path, render_dependency_config(name, &package_dir))?;
        debug!("wrote dependency config {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn render_dependency_config(name: &str, package_dir: &Path) -> String {
    let mut out = String::new();
    out.push_str("# Generated by galley; do not edit.\n");
    out.push_str(&format!("set({}_FOUND TRUE)\n", name));
    out.push_str(&format!(
        "set({}_INCLUDE_DIRS \"{}\")\n",
        name,
        package_dir.join("api").display()
    ));
    out.push_str(&format!(
        "set({}_LIB_DIRS \"{}\")\n",
        name,
        package_dir.join("lib").display()
    ));
    out.push_str(&format!(
        "include_directories(\"${{{}_INCLUDE_DIRS}}\")\n",
        name
    ));
    out.push_str(&format!("link_directories(\"${{{}_LIB_DIRS}}\")\n", name));
    out
}
