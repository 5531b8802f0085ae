// src/error.rs

//! Error types for galley
//!
//! Every failure mode maps onto the surface of the tool that produced it
//! (git, cmake, the file system, the TOML parser). Errors are surfaced
//! verbatim; any failing lifecycle hook aborts the run.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// All errors that galley can produce
#[derive(Debug, Error)]
pub enum Error {
    /// File-system failure, surfaced as-is
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure from the version-control client, surfaced as-is
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// Recipe or pins file could not be parsed or failed validation
    #[error("{0}")]
    Parse(String),

    /// The recipe folder is not inside a git work tree, or has no usable
    /// `origin` remote to capture at export time
    #[error("cannot capture source provenance for {}: {reason}", .path.display())]
    Provenance { path: PathBuf, reason: String },

    /// `source` was invoked before any pin record was written
    #[error("no pinned sources for {recipe}: run `galley export` first (looked in {})", .searched.display())]
    PinsMissing { recipe: String, searched: PathBuf },

    /// A declared build tool is not on PATH
    #[error("required build tool `{0}` not found on PATH")]
    ToolMissing(String),

    /// A declared build tool is present but too old, or its version could
    /// not be read
    #[error("build tool `{tool}` version {found} does not satisfy required {required}")]
    ToolVersion {
        tool: String,
        found: String,
        required: String,
    },

    /// A delegated build step (cmake configure/build) exited non-zero
    #[error("{phase} failed{}: {stderr}", .code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
    BuildStep {
        phase: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A library requirement has no package folder to point the build at
    #[error("dependency `{0}` has no package folder under the galley home")]
    DependencyMissing(String),
}
