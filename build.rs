// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe folder
fn recipe_dir_arg() -> Arg {
    Arg::new("recipe_dir")
        .required(true)
        .value_name("RECIPE_DIR")
        .help("Recipe folder containing galley.toml")
}

fn build_cli() -> Command {
    Command::new("galley")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Galley Contributors")
        .about("Source-build recipe runner: pinned git checkouts, CMake toolchain generation, and artifact packaging")
        .subcommand_required(true)
        .arg(
            Arg::new("home")
                .long("home")
                .global(true)
                .value_name("DIR")
                .help("Galley home directory (default: ~/.galley)"),
        )
        .arg(
            Arg::new("build_type")
                .long("build-type")
                .global(true)
                .help("Build type forwarded into the toolchain file"),
        )
        .arg(
            Arg::new("compiler")
                .long("compiler")
                .global(true)
                .help("Compiler forwarded into the toolchain file"),
        )
        .arg(Arg::new("os").long("os").global(true).help("Target OS"))
        .arg(
            Arg::new("arch")
                .long("arch")
                .global(true)
                .help("Target architecture"),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .global(true)
                .help("Parallel build jobs"),
        )
        .subcommand(
            Command::new("export")
                .about("Export the recipe into the galley home and pin its source commit")
                .arg(recipe_dir_arg()),
        )
        .subcommand(
            Command::new("source")
                .about("Clone the pinned source at its exact commit")
                .arg(recipe_dir_arg()),
        )
        .subcommand(
            Command::new("tools")
                .about("Probe PATH for the recipe's declared build tools")
                .arg(recipe_dir_arg()),
        )
        .subcommand(
            Command::new("generate")
                .about("Write the toolchain script and dependency configs")
                .arg(recipe_dir_arg()),
        )
        .subcommand(
            Command::new("build")
                .about("Configure and build (implies generate)")
                .arg(recipe_dir_arg()),
        )
        .subcommand(
            Command::new("package")
                .about("Copy built artifacts into the package tree")
                .arg(recipe_dir_arg()),
        )
        .subcommand(
            Command::new("create")
                .about("Run the whole lifecycle: export, source, tools, generate, build, package")
                .arg(recipe_dir_arg()),
        )
}

fn main() {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR").map(PathBuf::from) {
        Ok(dir) => dir,
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("galley.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
