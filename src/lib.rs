//! spargeattn-build - build configuration for the SpargeAttn CUDA extension
//!
//! This crate detects the build environment, assembles host compiler and
//! nvcc flags, locates the kernel sources and describes the resulting
//! extension and package for the Python packaging framework. It also
//! patches `pyproject.toml` for nightly PyTorch wheel indexes.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use builder::{BuildFlags, ExtensionDescriptor, PackageDescriptor, SourceSet};
pub use self::core::{ArchList, ArchToken, BuildEnv, HostPlatform, PackageVersion};
pub use util::{Config, Diagnostic};
