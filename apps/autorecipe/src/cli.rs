//! Command line interface definition

use clap::Parser;
use std::path::PathBuf;

/// autorecipe - Generate a rattler-build recipe.yaml from pyproject.toml
#[derive(Parser)]
#[command(name = "autorecipe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate a rattler-build recipe.yaml from pyproject.toml")]
#[command(long_about = None)]
pub struct Cli {
    /// Path to pyproject.toml [default: pyproject.toml]
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Where to write the recipe [default: recipe/recipe.yaml in the project]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Replace an existing recipe instead of moving it to .bak
    #[arg(long)]
    pub overwrite: bool,

    /// Python interpreter used for dynamic version queries
    #[arg(long, value_name = "EXE")]
    pub python: Option<String>,

    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}

/// Replace a leading `~` with the home directory
pub fn expand_home(path: PathBuf) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path;
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path,
    }
}
