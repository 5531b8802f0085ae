// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use galley::{Galley, Settings};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "galley")]
#[command(author, version, about = "Source-build recipe runner: pinned git checkouts, CMake toolchain generation, and artifact packaging", long_about = None)]
struct Cli {
    /// Galley home directory (default: ~/.galley)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Build type forwarded into the toolchain file (default: Release)
    #[arg(long, global = true)]
    build_type: Option<String>,

    /// Compiler forwarded into the toolchain file (default: host convention)
    #[arg(long, global = true)]
    compiler: Option<String>,

    /// Target OS (default: detected from the host)
    #[arg(long, global = true)]
    os: Option<String>,

    /// Target architecture (default: detected from the host)
    #[arg(long, global = true)]
    arch: Option<String>,

    /// Parallel build jobs (default: the recipe's value, else the tool decides)
    #[arg(short, long, global = true)]
    jobs: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the recipe into the galley home and pin its source commit
    Export {
        /// Recipe folder (containing galley.toml)
        recipe_dir: PathBuf,
    },
    /// Clone the pinned source at its exact commit
    Source {
        recipe_dir: PathBuf,
    },
    /// Probe PATH for the recipe's declared build tools
    Tools {
        recipe_dir: PathBuf,
    },
    /// Write the toolchain script and dependency configs
    Generate {
        recipe_dir: PathBuf,
    },
    /// Configure and build (implies generate)
    Build {
        recipe_dir: PathBuf,
    },
    /// Copy built artifacts into the package tree
    Package {
        recipe_dir: PathBuf,
    },
    /// Run the whole lifecycle: export, source, tools, generate, build, package
    Create {
        recipe_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::detect();
    if let Some(os) = &cli.os {
        settings = settings.with_os(os.clone());
    }
    if let Some(arch) = &cli.arch {
        settings = settings.with_arch(arch.clone());
    }
    if let Some(compiler) = &cli.compiler {
        settings = settings.with_compiler(compiler.clone());
    }
    if let Some(build_type) = &cli.build_type {
        settings = settings.with_build_type(build_type.clone());
    }

    let galley = match &cli.home {
        Some(home) => Galley::new(home, settings),
        None => Galley::with_default_home(settings)?,
    }
    .with_jobs(cli.jobs);

    match cli.command {
        Commands::Export { recipe_dir } => {
            let mut bake = galley.bake(&recipe_dir)?;
            let pin = bake.export()?;
            println!("Pinned {} at {}", pin.url, pin.commit);
            Ok(())
        }
        Commands::Source { recipe_dir } => {
            let mut bake = galley.bake(&recipe_dir)?;
            bake.source()?;
            println!("Source checked out at {}", bake.layout().source_dir.display());
            Ok(())
        }
        Commands::Tools { recipe_dir } => {
            let bake = galley.bake(&recipe_dir)?;
            let statuses = galley::tools::check_tools(bake.recipe())?;
            let mut missing = false;
            for status in &statuses {
                match (&status.path, &status.found) {
                    (Some(path), Some(found)) if status.satisfied() => {
                        println!("ok       {} ({} at {})", status.requirement, found, path.display());
                    }
                    (Some(path), found) => {
                        missing = true;
                        let found = found
                            .as_ref()
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "unknown version".to_string());
                        println!("too old  {} ({} at {})", status.requirement, found, path.display());
                    }
                    _ => {
                        missing = true;
                        println!("missing  {}", status.requirement);
                    }
                }
            }
            if missing {
                return Err(anyhow::anyhow!("build tool requirements not satisfied"));
            }
            Ok(())
        }
        Commands::Generate { recipe_dir } => {
            let mut bake = galley.bake(&recipe_dir)?;
            bake.generate()?;
            println!(
                "Generated files in {}",
                bake.layout().generators_dir.display()
            );
            Ok(())
        }
        Commands::Build { recipe_dir } => {
            let mut bake = galley.bake(&recipe_dir)?;
            bake.generate()?;
            bake.build()?;
            println!("Built {}", bake.layout().build_dir.display());
            Ok(())
        }
        Commands::Package { recipe_dir } => {
            let mut bake = galley.bake(&recipe_dir)?;
            let manifest = bake.package()?;
            println!(
                "Packaged {} files into {}",
                manifest.files.len(),
                bake.layout().package_dir.display()
            );
            Ok(())
        }
        Commands::Create { recipe_dir } => {
            info!("Creating package from {}", recipe_dir.display());
            let result = galley.create(&recipe_dir)?;
            for warning in &result.warnings {
                eprintln!("warning: {}", warning);
            }
            println!(
                "Packaged {} files into {}",
                result.manifest.files.len(),
                result.package_dir.display()
            );
            Ok(())
        }
    }
}
