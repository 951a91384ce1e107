//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// spargeattn-build - build configuration for the SpargeAttn CUDA extension
#[derive(Parser)]
#[command(name = "spargeattn-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root containing csrc/ (defaults to current directory)
    #[arg(long, global = true, env = "SPARGEATTN_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Emit the package descriptor as JSON
    Configure(ConfigureArgs),

    /// Show the assembled compiler, nvcc and linker flags
    Flags(FlagsArgs),

    /// Show the detected build environment
    Env,

    /// Record the nightly PyTorch index in pyproject.toml
    PatchPyproject(PatchPyprojectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ConfigureArgs {
    /// Write the descriptor to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Show host compiler flags only
    #[arg(long)]
    pub cxx: bool,

    /// Show nvcc flags only
    #[arg(long)]
    pub nvcc: bool,

    /// Show linker flags only
    #[arg(long)]
    pub link: bool,
}

#[derive(Args)]
pub struct PatchPyprojectArgs {
    /// PyTorch version being built against
    #[arg(long)]
    pub pytorch_version: String,

    /// CUDA version being built against (e.g. 12.4)
    #[arg(long)]
    pub cuda_version: String,

    /// Path to pyproject.toml
    #[arg(long, default_value = "pyproject.toml")]
    pub manifest_path: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
