//! Native source discovery.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::diagnostic::Diagnostic;
use crate::util::fs::glob_files;

/// Directory holding the kernel sources, relative to the project root.
pub const SOURCE_DIR: &str = "csrc";

/// Patterns collected from [`SOURCE_DIR`], in emission order.
pub const SOURCE_PATTERNS: &[&str] = &["*.cpp", "*.cu"];

/// Placeholder source used when the directory holds no sources.
pub const FALLBACK_SOURCE: &str = "csrc/dummy.cpp";

/// The located sources. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    pub paths: Vec<PathBuf>,
    /// Whether `paths` is the placeholder
    pub used_fallback: bool,
}

impl SourceSet {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Find `csrc/*.cpp` then `csrc/*.cu` under `root`.
///
/// Returns the source set and any warnings raised. An empty result is
/// replaced by [`FALLBACK_SOURCE`] with a single warning.
pub fn locate_sources(root: &Path) -> Result<(SourceSet, Vec<Diagnostic>)> {
    let dir = root.join(SOURCE_DIR);

    let mut paths = Vec::new();
    for pattern in SOURCE_PATTERNS {
        paths.extend(glob_files(&dir, pattern)?);
    }

    if !paths.is_empty() {
        tracing::debug!("found {} sources in {}", paths.len(), dir.display());
        return Ok((
            SourceSet {
                paths,
                used_fallback: false,
            },
            Vec::new(),
        ));
    }

    tracing::debug!("no sources under {}, using placeholder", dir.display());
    let warning = Diagnostic::warning(format!("no source files found in {} directory", SOURCE_DIR))
        .with_location(&dir)
        .with_context(format!("substituting placeholder `{}`", FALLBACK_SOURCE))
        .with_suggestion("Check out the kernel sources (*.cpp, *.cu) into csrc/");

    Ok((
        SourceSet {
            paths: vec![PathBuf::from(FALLBACK_SOURCE)],
            used_fallback: true,
        },
        vec![warning],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_dir_uses_fallback() {
        let tmp = TempDir::new().unwrap();

        let (sources, warnings) = locate_sources(tmp.path()).unwrap();
        assert_eq!(sources.paths, vec![PathBuf::from(FALLBACK_SOURCE)]);
        assert!(sources.used_fallback);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_non_matching_dir_uses_fallback() {
        let tmp = TempDir::new().unwrap();
        let csrc = tmp.path().join("csrc");
        fs::create_dir(&csrc).unwrap();
        fs::write(csrc.join("kernel.h"), "").unwrap();
        fs::write(csrc.join("notes.txt"), "").unwrap();

        let (sources, warnings) = locate_sources(tmp.path()).unwrap();
        assert_eq!(sources.len(), 1);
        assert!(sources.used_fallback);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("no source files"));
    }

    #[test]
    fn test_cpp_before_cu() {
        let tmp = TempDir::new().unwrap();
        let csrc = tmp.path().join("csrc");
        fs::create_dir(&csrc).unwrap();
        for name in ["qk_int8.cu", "fused.cu", "pybind.cpp", "utils.cpp", "attn.h"] {
            fs::write(csrc.join(name), "").unwrap();
        }

        let (sources, warnings) = locate_sources(tmp.path()).unwrap();
        assert!(warnings.is_empty());
        assert!(!sources.used_fallback);
        assert_eq!(sources.len(), 4);
        assert_eq!(
            sources.paths,
            vec![
                csrc.join("pybind.cpp"),
                csrc.join("utils.cpp"),
                csrc.join("fused.cu"),
                csrc.join("qk_int8.cu"),
            ]
        );
    }

    #[test]
    fn test_root_with_glob_metacharacters() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("proj[v1]");
        let csrc = root.join("csrc");
        fs::create_dir_all(&csrc).unwrap();
        fs::write(csrc.join("pybind.cpp"), "").unwrap();
        fs::write(csrc.join("qattn.cu"), "").unwrap();

        let (sources, warnings) = locate_sources(&root).unwrap();
        assert!(warnings.is_empty());
        assert!(!sources.used_fallback);
        assert_eq!(sources.paths, vec![csrc.join("pybind.cpp"), csrc.join("qattn.cu")]);
    }
}
