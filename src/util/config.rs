//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.spargeattn/config.toml` - User-wide defaults
//! - Project: `.spargeattn/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Environment
//! variables take precedence over both (see [`crate::core::env`]).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Target architectures, semicolon-separated (e.g. "8.0;8.6")
    pub arch_list: Option<String>,

    /// Value passed to nvcc `--threads`
    pub nvcc_threads: Option<usize>,

    /// Flags appended to the host compiler flag set
    pub extra_cxx_flags: Vec<String>,

    /// Flags appended to the nvcc flag set
    pub extra_nvcc_flags: Vec<String>,

    /// Flags appended to the linker flag set
    pub extra_link_flags: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.arch_list.is_some() {
            self.build.arch_list = other.build.arch_list;
        }
        if other.build.nvcc_threads.is_some() {
            self.build.nvcc_threads = other.build.nvcc_threads;
        }
        if !other.build.extra_cxx_flags.is_empty() {
            self.build.extra_cxx_flags = other.build.extra_cxx_flags;
        }
        if !other.build.extra_nvcc_flags.is_empty() {
            self.build.extra_nvcc_flags = other.build.extra_nvcc_flags;
        }
        if !other.build.extra_link_flags.is_empty() {
            self.build.extra_link_flags = other.build.extra_link_flags;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.spargeattn/config.toml)
/// 2. Global config (~/.spargeattn/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global) = global_path {
        config.merge(Config::load_or_default(global));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.spargeattn).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".spargeattn"))
}

/// Get the global config path (~/.spargeattn/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.spargeattn/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".spargeattn").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_build_section() {
        let config: Config = toml::from_str(
            r#"
[build]
arch_list = "8.9;9.0"
nvcc_threads = 4
extra_nvcc_flags = ["-lineinfo"]
"#,
        )
        .unwrap();

        assert_eq!(config.build.arch_list.as_deref(), Some("8.9;9.0"));
        assert_eq!(config.build.nvcc_threads, Some(4));
        assert_eq!(config.build.extra_nvcc_flags, vec!["-lineinfo"]);
        assert!(config.build.extra_cxx_flags.is_empty());
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");

        std::fs::write(
            &global,
            "[build]\narch_list = \"7.5\"\nnvcc_threads = 2\n",
        )
        .unwrap();
        std::fs::write(&project, "[build]\narch_list = \"9.0\"\n").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.build.arch_list.as_deref(), Some("9.0"));
        assert_eq!(config.build.nvcc_threads, Some(2));
    }

    #[test]
    fn test_missing_and_invalid_files_fall_back() {
        let tmp = TempDir::new().unwrap();
        let broken = tmp.path().join("broken.toml");
        std::fs::write(&broken, "[build\n").unwrap();

        let config = load_config(Some(&broken), &tmp.path().join("missing.toml"));
        assert!(config.build.arch_list.is_none());
        assert!(config.build.nvcc_threads.is_none());
    }

    #[test]
    fn test_project_config_path() {
        let path = project_config_path(Path::new("/proj"));
        assert_eq!(path, Path::new("/proj/.spargeattn/config.toml"));
    }
}
