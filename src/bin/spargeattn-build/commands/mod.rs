//! Command implementations

pub mod completions;
pub mod configure;
pub mod env;
pub mod flags;
pub mod patch_pyproject;
