//! Core data types: platform, architectures, versions and the detected environment.

pub mod arch;
pub mod env;
pub mod platform;
pub mod version;

pub use arch::{ArchList, ArchToken};
pub use env::BuildEnv;
pub use platform::HostPlatform;
pub use version::PackageVersion;
