// src/package.rs

//! Packaging
//!
//! The package hook rebuilds the package folder from scratch on every run:
//! it applies the recipe's copy rules against the source and build trees,
//! then writes a manifest recording the relative path, size and sha256 of
//! every packaged file. Rules match on file name and copies flatten into
//! the rule's destination folder. File walks are sorted, so the same
//! inputs always produce the same package tree and the same manifest
//! bytes.

use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::recipe::{CopyOrigin, CopyRule, Recipe};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// File name of the manifest written into the package folder
pub const MANIFEST_FILE_NAME: &str = "package.manifest.toml";

/// One packaged file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path relative to the package folder
    pub path: String,
    pub size: u64,
    pub sha256: String,
}

/// Manifest of everything the package hook copied, sorted by path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub files: Vec<ManifestEntry>,
}

impl PackageManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Parse(format!("cannot read manifest {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| Error::Parse(format!("invalid manifest: {}", e)))
    }

    pub fn store(&self, path: &Path) -> Result<()> {
        let content = toml::to_string(self)
            .map_err(|e| Error::Parse(format!("cannot serialize manifest: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Apply the recipe's copy rules and write the manifest.
///
/// Any previous package folder is removed first so reruns never keep
/// files a rule no longer matches. The manifest is computed before it is
/// stored, so it never lists itself.
pub fn package(recipe: &Recipe, layout: &Layout) -> Result<PackageManifest> {
    if layout.package_dir.exists() {
        std::fs::remove_dir_all(&layout.package_dir)?;
    }
    std::fs::create_dir_all(&layout.package_dir)?;

    let mut copied = 0;
    for rule in &recipe.package_copy {
        copied += apply_rule(rule, layout)?;
    }
    info!(
        "packaged {} files into {}",
        copied,
        layout.package_dir.display()
    );

    let manifest = manifest_for(&layout.package_dir)?;
    manifest.store(&layout.package_dir.join(MANIFEST_FILE_NAME))?;
    Ok(manifest)
}

/// Hash every file under `dir` into a manifest, sorted by path
pub fn manifest_for(dir: &Path) -> Result<PackageManifest> {
    let mut files = Vec::new();
    for path in collect_files(dir)? {
        let content = std::fs::read(&path)?;
        let rel = path.strip_prefix(dir).unwrap_or(&path);
        files.push(ManifestEntry {
            path: rel.to_string_lossy().into_owned(),
            size: content.len() as u64,
            sha256: hex::encode(Sha256::digest(&content)),
        });
    }
    Ok(PackageManifest { files })
}

fn apply_rule(rule: &CopyRule, layout: &Layout) -> Result<usize> {
    let origin = match rule.from {
        CopyOrigin::Source => &layout.source_dir,
        CopyOrigin::Build => &layout.build_dir,
    };
    let pattern = Pattern::new(&rule.pattern).map_err(|e| {
        Error::Parse(format!("invalid copy pattern `{}`: {}", rule.pattern, e))
    })?;

    let dest_dir = layout.package_dir.join(&rule.to);
    let mut copied = 0;
    for path in collect_files(origin)? {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if !pattern.matches(name) {
            continue;
        }
        std::fs::create_dir_all(&dest_dir)?;
        std::fs::copy(&path, dest_dir.join(name))?;
        copied += 1;
    }
    Ok(copied)
}

/// Walk a tree and return every regular file, sorted
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
