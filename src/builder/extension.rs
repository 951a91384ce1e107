//! Native extension descriptor.

use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use super::flags::{BuildFlags, Define};
use super::sources::{SourceSet, SOURCE_DIR};

/// Python package that hosts the extension.
pub const PACKAGE_DIR: &str = "spas_sage_attn";

/// Importable name of the compiled extension module.
pub const EXTENSION_NAME: &str = "spas_sage_attn._C";

/// Per-compiler extra arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileArgs {
    pub cxx: Vec<String>,
    pub nvcc: Vec<String>,
}

/// Declarative description of the CUDA extension to compile and link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionDescriptor {
    pub name: String,
    pub sources: Vec<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    pub extra_compile_args: CompileArgs,
    pub extra_link_args: Vec<String>,
    #[serde(serialize_with = "serialize_macros")]
    pub define_macros: Vec<Define>,
}

impl ExtensionDescriptor {
    /// Aggregate sources and flags for the extension rooted at `root`.
    pub fn new(root: &Path, sources: SourceSet, flags: BuildFlags) -> Self {
        ExtensionDescriptor {
            name: EXTENSION_NAME.to_string(),
            sources: sources.paths,
            include_dirs: vec![root.join(SOURCE_DIR), root.join(PACKAGE_DIR)],
            extra_compile_args: CompileArgs {
                cxx: flags.cxx,
                nvcc: flags.nvcc,
            },
            extra_link_args: flags.link,
            define_macros: flags.macros,
        }
    }
}

// Macros are (name, value-or-null) pairs on the wire.
fn serialize_macros<S>(macros: &[Define], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(macros.iter().map(|d| (&d.name, &d.value)))
}
