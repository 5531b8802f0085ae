// src/recipe/mod.rs

//! Recipe system for source builds
//!
//! A recipe defines everything the lifecycle needs to build one external
//! CMake project:
//! - The settings it forwards into the generated toolchain file
//! - Required build tools and library dependencies
//! - Toolchain customization hooks
//! - Copy rules shaping the final package tree
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "aoc2022"
//! version = "0.1.0"
//! settings = ["os", "arch", "compiler", "build_type"]
//!
//! [build]
//! tool_requires = ["cmake/3.24.1", "ninja/1.11.1"]
//!
//! [[package_copy]]
//! pattern = "*.h"
//! from = "source"
//! to = "api"
//! ```
//!
//! The source to build is not part of the recipe file: it is pinned by
//! `galley export`, which records the recipe repository's url and commit in
//! a pins file next to the exported recipe.

mod format;
pub mod parser;

pub use format::{BuildSection, CopyOrigin, CopyRule, PackageSection, Recipe, ToolchainSection};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe, RECIPE_FILE_NAME};
