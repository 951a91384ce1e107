//! Implementation of `spargeattn-build patch-pyproject`.
//!
//! Nightly PyTorch wheels come from a per-CUDA-version index. When the
//! requested PyTorch version is a nightly, the index URL is recorded in the
//! simpleindex distribution table of `pyproject.toml`.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use url::Url;

use crate::util::diagnostic::MetadataNotFoundError;
use crate::util::fs;

/// Line after which the nightly URL is inserted.
pub const ANCHOR: &str = "[[tool.simpleindex.distributions]]";

const NIGHTLY_INDEX: &str = "https://download.pytorch.org/whl/nightly/";

/// What patching did to the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The URL line was inserted after the anchor
    Inserted(String),
    /// The URL was already present
    AlreadyPresent(String),
    /// Not a nightly version; nothing to record
    NotNightly,
    /// Nightly, but the file has no anchor line
    AnchorMissing(String),
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOutcome::Inserted(url) => write!(f, "added nightly index {}", url),
            PatchOutcome::AlreadyPresent(url) => write!(f, "nightly index {} already present", url),
            PatchOutcome::NotNightly => write!(f, "no nightly index needed"),
            PatchOutcome::AnchorMissing(url) => {
                write!(f, "no `{}` table to record {} in", ANCHOR, url)
            }
        }
    }
}

/// Whether a PyTorch version string names a nightly build.
pub fn is_nightly(pytorch_version: &str) -> bool {
    pytorch_version.to_lowercase().contains("nightly")
}

/// Nightly wheel index for a CUDA version: `12.4` -> `.../whl/nightly/cu124`.
///
/// The returned text is recorded verbatim; it only has to parse as a URL.
pub fn nightly_index_url(cuda_version: &str) -> Result<String> {
    let url = format!("{}cu{}", NIGHTLY_INDEX, cuda_version.trim().replace('.', ""));
    Url::parse(&url).with_context(|| format!("invalid CUDA version `{}`", cuda_version))?;
    Ok(url)
}

/// Apply the patch to file contents in memory.
///
/// Inserts `nightly_url = "<url>"` directly after the first anchor line.
pub fn patch_contents(
    content: &str,
    pytorch_version: &str,
    cuda_version: &str,
) -> Result<(String, PatchOutcome)> {
    if !is_nightly(pytorch_version) {
        return Ok((content.to_string(), PatchOutcome::NotNightly));
    }

    let url = nightly_index_url(cuda_version)?;
    if content.contains(&url) {
        return Ok((content.to_string(), PatchOutcome::AlreadyPresent(url)));
    }

    let mut patched = String::with_capacity(content.len() + url.len() + 16);
    let mut inserted = false;
    for line in content.split_inclusive('\n') {
        patched.push_str(line);
        if !inserted && line.trim() == ANCHOR {
            if !line.ends_with('\n') {
                patched.push('\n');
            }
            patched.push_str(&format!("nightly_url = \"{}\"\n", url));
            inserted = true;
        }
    }

    if inserted {
        Ok((patched, PatchOutcome::Inserted(url)))
    } else {
        Ok((content.to_string(), PatchOutcome::AnchorMissing(url)))
    }
}

/// Patch the metadata file at `path` in place.
///
/// Fails only when the file does not exist (or cannot be read/written);
/// the file is never created.
pub fn patch_pyproject(path: &Path, pytorch_version: &str, cuda_version: &str) -> Result<PatchOutcome> {
    if !path.is_file() {
        return Err(MetadataNotFoundError {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = fs::read_to_string(path)?;
    let (patched, outcome) = patch_contents(&content, pytorch_version, cuda_version)?;

    if let PatchOutcome::AnchorMissing(_) = &outcome {
        tracing::warn!("{}", outcome);
    } else {
        tracing::debug!("{}", outcome);
    }

    fs::write_string(path, &patched)?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PYPROJECT: &str = "\
[project]
name = \"spas_sage_attn\"

[[tool.simpleindex.distributions]]
name = \"torch\"
";

    #[test]
    fn test_nightly_detection() {
        assert!(is_nightly("2.6.0.dev20241112+nightly"));
        assert!(is_nightly("Nightly"));
        assert!(!is_nightly("2.5.1"));
    }

    #[test]
    fn test_nightly_url() {
        assert_eq!(
            nightly_index_url("12.4").unwrap(),
            "https://download.pytorch.org/whl/nightly/cu124"
        );
        assert_eq!(
            nightly_index_url("12.8.1").unwrap(),
            "https://download.pytorch.org/whl/nightly/cu1281"
        );
    }

    #[test]
    fn test_nightly_url_is_not_resolved() {
        assert_eq!(
            nightly_index_url("12.4/rc 1").unwrap(),
            "https://download.pytorch.org/whl/nightly/cu124/rc 1"
        );
        assert_eq!(
            nightly_index_url("12.4?x#y").unwrap(),
            "https://download.pytorch.org/whl/nightly/cu124?x#y"
        );

        let (once, outcome) = patch_contents(PYPROJECT, "nightly", "12.4 rc").unwrap();
        assert!(once.contains("nightly_url = \"https://download.pytorch.org/whl/nightly/cu124 rc\""));
        assert!(matches!(outcome, PatchOutcome::Inserted(_)));

        let (twice, outcome) = patch_contents(&once, "nightly", "12.4 rc").unwrap();
        assert_eq!(once, twice);
        assert!(matches!(outcome, PatchOutcome::AlreadyPresent(_)));
    }

    #[test]
    fn test_inserts_one_line_after_anchor() {
        let (patched, outcome) = patch_contents(PYPROJECT, "nightly", "12.4").unwrap();
        assert!(matches!(outcome, PatchOutcome::Inserted(_)));

        let before: Vec<&str> = PYPROJECT.lines().collect();
        let after: Vec<&str> = patched.lines().collect();
        assert_eq!(after.len(), before.len() + 1);

        let anchor = after.iter().position(|l| *l == ANCHOR).unwrap();
        assert_eq!(
            after[anchor + 1],
            "nightly_url = \"https://download.pytorch.org/whl/nightly/cu124\""
        );
        assert_eq!(after[anchor + 2], "name = \"torch\"");
    }

    #[test]
    fn test_idempotent() {
        let (once, _) = patch_contents(PYPROJECT, "2.6.0-NIGHTLY", "12.4").unwrap();
        let (twice, outcome) = patch_contents(&once, "2.6.0-NIGHTLY", "12.4").unwrap();
        assert_eq!(once, twice);
        assert!(matches!(outcome, PatchOutcome::AlreadyPresent(_)));
    }

    #[test]
    fn test_only_first_anchor() {
        let content = format!("{}\n{}\n", ANCHOR, ANCHOR);
        let (patched, _) = patch_contents(&content, "nightly", "12.4").unwrap();
        assert_eq!(patched.matches("nightly_url").count(), 1);
    }

    #[test]
    fn test_anchor_without_trailing_newline() {
        let (patched, _) = patch_contents(ANCHOR, "nightly", "11.8").unwrap();
        assert_eq!(
            patched,
            format!(
                "{}\nnightly_url = \"https://download.pytorch.org/whl/nightly/cu118\"\n",
                ANCHOR
            )
        );
    }

    #[test]
    fn test_indented_anchor() {
        let content = format!("  {}\n  name = \"torch\"\n", ANCHOR);
        let (patched, outcome) = patch_contents(&content, "nightly", "12.4").unwrap();
        assert!(matches!(outcome, PatchOutcome::Inserted(_)));

        let lines: Vec<&str> = patched.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].trim(), ANCHOR);
        assert_eq!(
            lines[1],
            "nightly_url = \"https://download.pytorch.org/whl/nightly/cu124\""
        );
    }

    #[test]
    fn test_crlf_anchor() {
        let content = format!("{}\r\nname = \"torch\"\r\n", ANCHOR);
        let (_, outcome) = patch_contents(&content, "nightly", "12.4").unwrap();
        assert!(matches!(outcome, PatchOutcome::Inserted(_)));
    }

    #[test]
    fn test_not_nightly_or_no_anchor_unchanged() {
        let (patched, outcome) = patch_contents(PYPROJECT, "2.5.1", "12.4").unwrap();
        assert_eq!(patched, PYPROJECT);
        assert_eq!(outcome, PatchOutcome::NotNightly);

        let (patched, outcome) = patch_contents("[project]\n", "nightly", "12.4").unwrap();
        assert_eq!(patched, "[project]\n");
        assert!(matches!(outcome, PatchOutcome::AnchorMissing(_)));
    }

    #[test]
    fn test_patch_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pyproject.toml");
        std::fs::write(&path, PYPROJECT).unwrap();

        patch_pyproject(&path, "nightly", "12.4").unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        assert!(first.contains("cu124"));

        patch_pyproject(&path, "nightly", "12.4").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn test_missing_file_not_created() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pyproject.toml");

        let err = patch_pyproject(&path, "nightly", "12.4").unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(!path.exists());
    }
}
