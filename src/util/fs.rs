//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{glob, Pattern};

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, replacing its contents.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Find files matching a single glob pattern relative to a base directory.
///
/// `base` is matched literally. Results are sorted. Unreadable entries are
/// logged and skipped.
pub fn glob_files(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let escaped = PathBuf::from(Pattern::escape(&base.to_string_lossy()));
    let full_pattern = escaped.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let mut results = Vec::new();
    for entry in glob(&pattern_str).with_context(|| format!("invalid glob pattern: {}", pattern))? {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    results.push(path);
                }
            }
            Err(e) => {
                tracing::warn!("glob error: {}", e);
            }
        }
    }

    results.sort();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_files_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.cu"), "").unwrap();
        fs::write(tmp.path().join("a.cu"), "").unwrap();
        fs::write(tmp.path().join("c.cpp"), "").unwrap();
        fs::create_dir(tmp.path().join("dir.cu")).unwrap();

        let found = glob_files(tmp.path(), "*.cu").unwrap();
        assert_eq!(
            found,
            vec![tmp.path().join("a.cu"), tmp.path().join("b.cu")]
        );
    }

    #[test]
    fn test_glob_base_is_literal() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("build[1]");
        fs::create_dir(&base).unwrap();
        fs::write(base.join("qattn.cu"), "").unwrap();

        let found = glob_files(&base, "*.cu").unwrap();
        assert_eq!(found, vec![base.join("qattn.cu")]);
    }

    #[test]
    fn test_glob_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let found = glob_files(&tmp.path().join("nope"), "*.cpp").unwrap();
        assert!(found.is_empty());
    }
}
