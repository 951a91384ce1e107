//! `spargeattn-build configure` command

use std::path::Path;

use anyhow::Result;

use crate::cli::ConfigureArgs;
use spargeattn_build::core::BuildEnv;
use spargeattn_build::ops::configure::{
    configure, load_project_config, render_descriptor, write_descriptor,
};
use spargeattn_build::util::diagnostic::emit;

pub fn execute(args: ConfigureArgs, project_dir: &Path, color: bool) -> Result<()> {
    let config = load_project_config(project_dir);
    let env = BuildEnv::detect(&config.build)?;

    let configured = configure(project_dir, &env, &config.build)?;
    for warning in &configured.warnings {
        emit(warning, color);
    }

    match args.out {
        Some(out) => {
            write_descriptor(&configured.package, &out)?;
            tracing::info!("Wrote package descriptor to {}", out.display());
        }
        None => print!("{}", render_descriptor(&configured.package)?),
    }

    Ok(())
}
