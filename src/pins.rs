// src/pins.rs

//! Pinned source records
//!
//! `galley export` reads the recipe repository's remote url and HEAD commit
//! and stores them as a pins file next to the exported recipe copy. The
//! source hook later consumes that pin to reproduce the exact same working
//! tree. The file carries the url and commit and nothing else, so identical
//! inputs always serialize to identical bytes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name the pin record is stored under, next to the exported recipe
pub const PINS_FILE_NAME: &str = "galley.pins.toml";

/// One pinned version-control reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePin {
    /// Clone url of the source repository
    pub url: String,
    /// Exact commit to check out
    pub commit: String,
}

/// The on-disk pins file: a `[sources]` table holding one pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinsFile {
    pub sources: SourcePin,
}

impl PinsFile {
    pub fn new(sources: SourcePin) -> Self {
        Self { sources }
    }

    /// Read a pins file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Parse(format!("cannot read pins {}: {}", path.display(), e)))?;
        toml::from_str(&content).map_err(|e| Error::Parse(format!("invalid pins file: {}", e)))
    }

    /// Write the pins file
    pub fn store(&self, path: &Path) -> Result<()> {
        let content = toml::to_string(self)
            .map_err(|e| Error::Parse(format!("cannot serialize pins: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
