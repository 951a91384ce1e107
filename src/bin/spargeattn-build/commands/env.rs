//! `spargeattn-build env` command

use std::path::Path;

use anyhow::Result;

use spargeattn_build::core::env::{ARCH_LIST_VAR, CUDA_HOME_VARS, NVCC_THREADS_VAR, VERSION_SUFFIX_VAR};
use spargeattn_build::core::BuildEnv;
use spargeattn_build::ops::configure::load_project_config;
use spargeattn_build::util::config::{global_config_path, project_config_path};

pub fn execute(project_dir: &Path) -> Result<()> {
    let config = load_project_config(project_dir);
    let env = BuildEnv::detect(&config.build)?;

    println!("Build environment:");
    println!();
    println!("  Platform: {}", env.platform);
    match &env.cuda_home {
        Some(home) => println!("  CUDA:     {} (from {})", home.path.display(), home.source),
        None => println!("  CUDA:     not found"),
    }
    println!("  Arch:     {}", env.arch_list);
    println!("  Threads:  {}", env.nvcc_threads);
    println!("  Version:  {}", env.version);

    println!();
    println!("Config:");
    if let Some(global) = global_config_path() {
        println!("  Global:   {}{}", global.display(), presence(&global));
    }
    let project = project_config_path(project_dir);
    println!("  Project:  {}{}", project.display(), presence(&project));

    println!();
    println!("Environment:");
    for var in CUDA_HOME_VARS
        .iter()
        .chain([ARCH_LIST_VAR, NVCC_THREADS_VAR, VERSION_SUFFIX_VAR].iter())
    {
        if let Ok(value) = std::env::var(var) {
            println!("  {}={}", var, value);
        }
    }

    Ok(())
}

fn presence(path: &Path) -> &'static str {
    if path.exists() {
        ""
    } else {
        " (not present)"
    }
}
