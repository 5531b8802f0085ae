// src/settings.rs

//! Build-variant settings
//!
//! The `{os, arch, compiler, build_type}` tuple identifies one build variant.
//! galley never interprets these values — they are detected from the host (or
//! overridden on the command line) and forwarded verbatim into the generated
//! toolchain file.

use std::fmt;

/// The opaque build-variant tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub os: String,
    pub arch: String,
    pub compiler: String,
    pub build_type: String,
}

impl Settings {
    /// Detect default settings from the host
    ///
    /// `os` and `arch` come from the platform constants; the compiler default
    /// is the platform's conventional one. The build type defaults to Release.
    pub fn detect() -> Self {
        let os = std::env::consts::OS.to_string();
        let arch = std::env::consts::ARCH.to_string();
        let compiler = default_compiler(&os).to_string();

        Self {
            os,
            arch,
            compiler,
            build_type: "Release".to_string(),
        }
    }

    /// Override the build type
    pub fn with_build_type(mut self, build_type: impl Into<String>) -> Self {
        self.build_type = build_type.into();
        self
    }

    /// Override the compiler
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Override the target OS
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    /// Override the target architecture
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    /// Look up a settings value by the name a recipe declares
    ///
    /// Returns `None` for names this tuple does not carry; the recipe's
    /// `settings` list selects which of these are forwarded at generate time.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "os" => Some(&self.os),
            "arch" => Some(&self.arch),
            "compiler" => Some(&self.compiler),
            "build_type" => Some(&self.build_type),
            _ => None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.os, self.arch, self.compiler, self.build_type
        )
    }
}

fn default_compiler(os: &str) -> &'static str {
    match os {
        "windows" => "msvc",
        "macos" => "apple-clang",
        _ => "gcc",
    }
}
