//! Implementation of `spargeattn-build configure`.
//!
//! Linear pipeline: environment, flags, sources, extension, package.

use std::path::Path;

use anyhow::{Context, Result};

use crate::builder::extension::{ExtensionDescriptor, EXTENSION_NAME};
use crate::builder::flags::{assemble_flags, BuildFlags, FlagInputs};
use crate::builder::package::PackageDescriptor;
use crate::builder::sources::locate_sources;
use crate::core::env::BuildEnv;
use crate::util::config::{self, BuildConfig, Config};
use crate::util::diagnostic::Diagnostic;
use crate::util::fs;

/// Result of a configure run.
#[derive(Debug, Clone)]
pub struct Configured {
    pub package: PackageDescriptor,
    /// Non-fatal problems encountered along the way
    pub warnings: Vec<Diagnostic>,
}

/// Load merged global and project configuration for `project_root`.
pub fn load_project_config(project_root: &Path) -> Config {
    let global = config::global_config_path();
    config::load_config(global.as_deref(), &config::project_config_path(project_root))
}

/// Assemble flags, failing when no CUDA toolkit is available.
pub fn build_flags(env: &BuildEnv, build: &BuildConfig) -> Result<BuildFlags> {
    let cuda_home = env.require_cuda_home()?;
    tracing::info!("Using CUDA toolkit at {}", cuda_home.display());

    Ok(assemble_flags(&FlagInputs {
        platform: &env.platform,
        arch_list: &env.arch_list,
        nvcc_threads: env.nvcc_threads,
        extension_name: EXTENSION_NAME,
        extra: build,
    }))
}

/// Produce the package descriptor for the project at `project_root`.
pub fn configure(project_root: &Path, env: &BuildEnv, build: &BuildConfig) -> Result<Configured> {
    let flags = build_flags(env, build)?;

    let (sources, warnings) = locate_sources(project_root)?;
    tracing::info!(
        "Configuring {} v{} ({} sources, arch {})",
        EXTENSION_NAME,
        env.version,
        sources.len(),
        env.arch_list
    );

    let extension = ExtensionDescriptor::new(project_root, sources, flags);
    let package = PackageDescriptor::new(project_root, env.version.clone(), extension)?;

    Ok(Configured { package, warnings })
}

/// Render the descriptor as pretty JSON.
pub fn render_descriptor(package: &PackageDescriptor) -> Result<String> {
    let mut json =
        serde_json::to_string_pretty(package).context("failed to serialize package descriptor")?;
    json.push('\n');
    Ok(json)
}

/// Write the rendered descriptor to a file.
pub fn write_descriptor(package: &PackageDescriptor, out: &Path) -> Result<()> {
    fs::write_string(out, &render_descriptor(package)?)
}
