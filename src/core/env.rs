//! Build environment probing.
//!
//! All environment-derived settings are read once into a [`BuildEnv`].
//! Precedence for each setting: environment variable, then config file,
//! then built-in default. Empty variables count as unset.
//!
//! CUDA toolkit detection order:
//! 1. `CUDA_HOME`
//! 2. `CUDA_PATH`
//! 3. The toolkit containing an `nvcc` found on `PATH`
//! 4. `/usr/local/cuda` (non-Windows only)

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::arch::ArchList;
use crate::core::platform::HostPlatform;
use crate::core::version::{PackageVersion, BASE_VERSION};
use crate::util::config::BuildConfig;
use crate::util::diagnostic::CudaNotFoundError;

/// Suffix appended to the package version (e.g. `+cu124`).
pub const VERSION_SUFFIX_VAR: &str = "SPARGEATTN_WHEEL_VERSION_SUFFIX";

/// Semicolon-separated target architectures.
pub const ARCH_LIST_VAR: &str = "TORCH_CUDA_ARCH_LIST";

/// Toolkit root variables, in lookup order.
pub const CUDA_HOME_VARS: [&str; 2] = ["CUDA_HOME", "CUDA_PATH"];

/// Override for nvcc `--threads`.
pub const NVCC_THREADS_VAR: &str = "NVCC_THREADS";

/// Upper bound for the default nvcc thread count.
pub const MAX_NVCC_THREADS: usize = 8;

const DEFAULT_UNIX_CUDA_HOME: &str = "/usr/local/cuda";

/// Where the CUDA toolkit root was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CudaHomeSource {
    /// Named environment variable
    Env(&'static str),
    /// Derived from `nvcc` on `PATH`
    Nvcc,
    /// Well-known install location
    Default,
}

impl fmt::Display for CudaHomeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CudaHomeSource::Env(var) => write!(f, "${}", var),
            CudaHomeSource::Nvcc => write!(f, "nvcc on PATH"),
            CudaHomeSource::Default => write!(f, "default location"),
        }
    }
}

/// A located CUDA toolkit root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CudaHome {
    pub path: PathBuf,
    pub source: CudaHomeSource,
}

/// Settings detected from the environment for one invocation.
#[derive(Debug, Clone)]
pub struct BuildEnv {
    /// Host platform, selects the host compiler flag set
    pub platform: HostPlatform,
    /// CUDA toolkit root, if any was found
    pub cuda_home: Option<CudaHome>,
    /// Target architectures
    pub arch_list: ArchList,
    /// Package version including the wheel suffix
    pub version: PackageVersion,
    /// nvcc `--threads` value
    pub nvcc_threads: usize,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl BuildEnv {
    /// Build from an arbitrary variable lookup.
    ///
    /// Only environment variables are consulted for the CUDA root; the
    /// filesystem fallbacks live in [`BuildEnv::detect`].
    pub fn from_lookup<F>(lookup: F, platform: HostPlatform, config: &BuildConfig) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cuda_home = cuda_home_from_lookup(&lookup);

        let arch_list = match non_empty(lookup(ARCH_LIST_VAR)) {
            Some(list) => list
                .parse::<ArchList>()
                .with_context(|| format!("invalid {}", ARCH_LIST_VAR))?,
            None => match config.arch_list.as_deref() {
                Some(list) => list
                    .parse::<ArchList>()
                    .context("invalid `build.arch_list` in config")?,
                None => ArchList::default(),
            },
        };

        let suffix = lookup(VERSION_SUFFIX_VAR).unwrap_or_default();
        let version = PackageVersion::new(BASE_VERSION, suffix);

        let nvcc_threads = match non_empty(lookup(NVCC_THREADS_VAR)) {
            Some(n) => n
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{} must be a non-negative integer", NVCC_THREADS_VAR))?,
            None => config
                .nvcc_threads
                .unwrap_or_else(|| default_nvcc_threads(&platform)),
        };

        Ok(BuildEnv {
            platform,
            cuda_home,
            arch_list,
            version,
            nvcc_threads,
        })
    }

    /// Detect from the process environment and well-known toolkit locations.
    pub fn detect(config: &BuildConfig) -> Result<Self> {
        let platform = HostPlatform::host();
        let mut env = Self::from_lookup(|name| std::env::var(name).ok(), platform, config)?;

        if env.cuda_home.is_none() {
            env.cuda_home = cuda_home_from_filesystem(&env.platform);
        }

        match &env.cuda_home {
            Some(home) => tracing::debug!(
                "CUDA toolkit: {} (from {})",
                home.path.display(),
                home.source
            ),
            None => tracing::debug!("CUDA toolkit not found"),
        }

        Ok(env)
    }

    /// The CUDA root, or the hard error reported when it is missing.
    pub fn require_cuda_home(&self) -> Result<&Path, CudaNotFoundError> {
        self.cuda_home
            .as_ref()
            .map(|home| home.path.as_path())
            .ok_or(CudaNotFoundError)
    }
}

fn cuda_home_from_lookup<F>(lookup: &F) -> Option<CudaHome>
where
    F: Fn(&str) -> Option<String>,
{
    CUDA_HOME_VARS.iter().find_map(|&var| {
        non_empty(lookup(var)).map(|path| CudaHome {
            path: PathBuf::from(path),
            source: CudaHomeSource::Env(var),
        })
    })
}

fn cuda_home_from_filesystem(platform: &HostPlatform) -> Option<CudaHome> {
    // nvcc lives in <root>/bin
    if let Some(root) = which::which("nvcc")
        .ok()
        .and_then(|nvcc| nvcc.parent().and_then(Path::parent).map(Path::to_path_buf))
    {
        return Some(CudaHome {
            path: root,
            source: CudaHomeSource::Nvcc,
        });
    }

    if !platform.is_windows() {
        let default = PathBuf::from(DEFAULT_UNIX_CUDA_HOME);
        if default.is_dir() {
            return Some(CudaHome {
                path: default,
                source: CudaHomeSource::Default,
            });
        }
    }

    None
}

/// Default nvcc thread count: bounded by the CPU count on Windows, fixed elsewhere.
pub fn default_nvcc_threads(platform: &HostPlatform) -> usize {
    if platform.is_windows() {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(MAX_NVCC_THREADS)
    } else {
        MAX_NVCC_THREADS
    }
}
