//! Build description: flags, sources, the extension and the package.

pub mod extension;
pub mod flags;
pub mod package;
pub mod sources;

pub use extension::ExtensionDescriptor;
pub use flags::{assemble_flags, BuildFlags, Define, FlagInputs, HostCompiler};
pub use package::{PackageDescriptor, Requirement};
pub use sources::{locate_sources, SourceSet};
