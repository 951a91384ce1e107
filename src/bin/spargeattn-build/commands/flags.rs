//! `spargeattn-build flags` command

use std::path::Path;

use anyhow::Result;

use crate::cli::FlagsArgs;
use spargeattn_build::core::BuildEnv;
use spargeattn_build::ops::configure::{build_flags, load_project_config};

pub fn execute(args: FlagsArgs, project_dir: &Path) -> Result<()> {
    let config = load_project_config(project_dir);
    let env = BuildEnv::detect(&config.build)?;
    let flags = build_flags(&env, &config.build)?;

    let all = !(args.cxx || args.nvcc || args.link);
    let mut first = true;
    let mut section = |title: String, values: &[String]| {
        if !first {
            println!();
        }
        first = false;
        println!("# {}:", title);
        for value in values {
            println!("  {}", value);
        }
    };

    if all || args.cxx {
        let mut cxx = flags.cxx.clone();
        cxx.extend(flags.macros.iter().map(|d| d.to_flag()));
        section(format!("Host compiler flags ({:?})", flags.host_compiler), cxx.as_slice());
    }

    if all || args.nvcc {
        section("nvcc flags".to_string(), flags.nvcc.as_slice());
    }

    if all || args.link {
        section("Link flags".to_string(), flags.link.as_slice());
    }

    Ok(())
}
