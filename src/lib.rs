// src/lib.rs

//! galley
//!
//! A source-build recipe runner for CMake projects. A recipe is a TOML
//! file declaring metadata, forwarded settings, build-tool requirements,
//! toolchain hooks, and artifact copy rules; galley drives it through a
//! fixed lifecycle:
//!
//! - export: copy the recipe into the galley home and pin its repository's
//!   `{url, commit}`
//! - source: clone the pinned repository at exactly that commit
//! - tools: probe PATH for the declared build tools
//! - generate: write the cmake toolchain script and dependency configs
//! - build: cmake configure and build
//! - package: glob-copy artifacts into the package tree and write a
//!   manifest of their digests
//!
//! Every hook is a thin delegation to git, the cmake binary, or the file
//! system; failures are surfaced verbatim and the first one aborts the run.

pub mod cmake;
mod error;
pub mod galley;
pub mod generate;
pub mod layout;
pub mod package;
pub mod pins;
pub mod recipe;
pub mod scm;
pub mod settings;
pub mod tools;

pub use error::{Error, Result};
pub use galley::{Bake, CreateResult, Galley};
pub use layout::Layout;
pub use package::PackageManifest;
pub use pins::{PinsFile, SourcePin};
pub use recipe::Recipe;
pub use settings::Settings;
