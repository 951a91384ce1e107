//! spargeattn-build CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("spargeattn_build=debug")
    } else {
        EnvFilter::new("spargeattn_build=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let project_dir = match cli.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let color = !cli.no_color;

    match cli.command {
        Commands::Configure(args) => commands::configure::execute(args, &project_dir, color),
        Commands::Flags(args) => commands::flags::execute(args, &project_dir),
        Commands::Env => commands::env::execute(&project_dir),
        Commands::PatchPyproject(args) => commands::patch_pyproject::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
