// src/cmake.rs

//! cmake invocation
//!
//! Thin wrappers around the cmake command line. Configure and build are
//! separate steps so the build hook can rerun compilation without
//! reconfiguring from scratch. A failing step carries its phase name,
//! exit code and captured stderr so the caller can surface exactly what
//! the tool printed.

use crate::error::{Error, Result};
use crate::layout::Layout;
use std::process::Command;
use tracing::info;

/// Captured output of one delegated cmake step
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `cmake -S <src> -B <build>` against the generated toolchain
pub fn configure(layout: &Layout, generator: &str, build_type: &str) -> Result<StepOutput> {
    let toolchain = layout.toolchain_file();
    let mut cmd = Command::new("cmake");
    cmd.arg("-S")
        .arg(&layout.source_dir)
        .arg("-B")
        .arg(&layout.build_dir)
        .arg("-G")
        .arg(generator)
        .arg(format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display()))
        .arg(format!("-DCMAKE_BUILD_TYPE={}", build_type));

    info!(
        "configuring {} with generator {}",
        layout.source_dir.display(),
        generator
    );
    run_step("configure", cmd)
}

/// Run `cmake --build <build>`, bounded to `jobs` parallel jobs if given
pub fn build(layout: &Layout, jobs: Option<u32>) -> Result<StepOutput> {
    let mut cmd = Command::new("cmake");
    cmd.arg("--build").arg(&layout.build_dir);
    if let Some(jobs) = jobs {
        cmd.arg("--parallel").arg(jobs.to_string());
    }

    info!("building {}", layout.build_dir.display());
    run_step("build", cmd)
}

fn run_step(phase: &str, mut cmd: Command) -> Result<StepOutput> {
    let output = cmd.output().map_err(|e| Error::BuildStep {
        phase: phase.to_string(),
        code: None,
        stderr: format!("failed to launch {:?}: {}", cmd.get_program(), e),
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(Error::BuildStep {
            phase: phase.to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    Ok(StepOutput { stdout, stderr })
}
