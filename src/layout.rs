// src/layout.rs

//! Work tree layout
//!
//! Every recipe builds inside one work tree under the galley home:
//!
//! ```text
//! builds/<name>/
//!     src/                          pinned source checkout
//!     build/<build_type>/           cmake binary dir
//!     build/<build_type>/generators/  toolchain and dependency configs
//!     package/                      copied build products and manifest
//! ```
//!
//! The build dir is keyed by build type so Debug and Release configure
//! into separate binary dirs.

use crate::error::Result;
use crate::settings::Settings;
use std::path::{Path, PathBuf};

/// File name of the generated cmake toolchain script
pub const TOOLCHAIN_FILE_NAME: &str = "galley_toolchain.cmake";

/// Resolved folders of one recipe's work tree
#[derive(Debug, Clone)]
pub struct Layout {
    pub work_dir: PathBuf,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub generators_dir: PathBuf,
    pub package_dir: PathBuf,
}

impl Layout {
    pub fn new(work_dir: &Path, settings: &Settings) -> Self {
        let build_dir = work_dir.join("build").join(&settings.build_type);
        Self {
            work_dir: work_dir.to_path_buf(),
            source_dir: work_dir.join("src"),
            generators_dir: build_dir.join("generators"),
            build_dir,
            package_dir: work_dir.join("package"),
        }
    }

    /// Full path of the toolchain file the generate hook writes
    pub fn toolchain_file(&self) -> PathBuf {
        self.generators_dir.join(TOOLCHAIN_FILE_NAME)
    }

    /// Create the folders the generate hook writes into.
    ///
    /// Only the generators dir is made here: the clone creates the source
    /// dir, cmake creates the build dir and the package hook rebuilds the
    /// package dir from scratch.
    pub fn create_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.generators_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let settings = Settings::detect().with_build_type("Release");
        let layout = Layout::new(Path::new("/tmp/galley/builds/aoc2022"), &settings);

        assert_eq!(
            layout.source_dir,
            Path::new("/tmp/galley/builds/aoc2022/src")
        );
        assert_eq!(
            layout.build_dir,
            Path::new("/tmp/galley/builds/aoc2022/build/Release")
        );
        assert_eq!(
            layout.generators_dir,
            Path::new("/tmp/galley/builds/aoc2022/build/Release/generators")
        );
        assert_eq!(
            layout.package_dir,
            Path::new("/tmp/galley/builds/aoc2022/package")
        );
        assert_eq!(
            layout.toolchain_file(),
            Path::new("/tmp/galley/builds/aoc2022/build/Release/generators/galley_toolchain.cmake")
        );
    }

    #[test]
    fn test_build_dir_keyed_by_build_type() {
        let work = Path::new("/tmp/galley/builds/aoc2022");
        let debug = Layout::new(work, &Settings::detect().with_build_type("Debug"));
        let release = Layout::new(work, &Settings::detect().with_build_type("Release"));
        assert_ne!(debug.build_dir, release.build_dir);
        assert_eq!(debug.package_dir, release.package_dir);
    }

    #[test]
    fn test_create_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let layout = Layout::new(&temp.path().join("w"), &Settings::detect());
        layout.create_dirs().unwrap();
        assert!(layout.generators_dir.is_dir());
        assert!(!layout.source_dir.exists());
        assert!(!layout.package_dir.exists());
    }
}
