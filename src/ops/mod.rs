//! High-level operations behind the CLI commands.

pub mod configure;
pub mod patch_pyproject;

pub use configure::{configure, Configured};
pub use patch_pyproject::{patch_pyproject, PatchOutcome};
