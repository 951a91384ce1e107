//! Package metadata handed to the packaging framework.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Serialize, Serializer};
use walkdir::WalkDir;

use super::extension::ExtensionDescriptor;
use crate::core::version::PackageVersion;

pub const PACKAGE_NAME: &str = "spas_sage_attn";

/// Build command override: `build_ext` runs the framework's CUDA-aware builder.
pub const BUILD_EXT_COMMAND: (&str, &str) = ("build_ext", "BuildExtension");

const INSTALL_REQUIRES: &[&str] = &["torch>=2.3.0", "ninja", "packaging", "pybind11>=2.12.0"];

const CLASSIFIERS: &[&str] = &[
    "Development Status :: 4 - Beta",
    "Intended Audience :: Developers",
    "Intended Audience :: Science/Research",
    "License :: OSI Approved :: Apache Software License",
    "Programming Language :: Python :: 3",
    "Programming Language :: Python :: 3.9",
    "Programming Language :: Python :: 3.10",
    "Programming Language :: Python :: 3.11",
    "Programming Language :: Python :: 3.12",
    "Topic :: Scientific/Engineering :: Artificial Intelligence",
];

/// A dependency with an optional version constraint (`torch>=2.3.0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub constraint: Option<String>,
}

impl FromStr for Requirement {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| matches!(c, '<' | '>' | '=' | '!' | '~'))
            .unwrap_or(s.len());
        let (name, constraint) = s.split_at(split);
        let name = name.trim();

        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            bail!("invalid requirement `{}`", s);
        }

        let constraint = constraint.trim();
        Ok(Requirement {
            name: name.to_string(),
            constraint: (!constraint.is_empty()).then(|| constraint.to_string()),
        })
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(c) = &self.constraint {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl Serialize for Requirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Declarative package description consumed by the packaging framework.
#[derive(Debug, Clone, Serialize)]
pub struct PackageDescriptor {
    pub name: String,
    #[serde(serialize_with = "serialize_display")]
    pub version: PackageVersion,
    pub description: String,
    pub long_description: String,
    pub long_description_content_type: String,
    pub author: String,
    pub author_email: String,
    pub url: String,
    pub license: String,
    pub packages: Vec<String>,
    pub python_requires: String,
    pub install_requires: Vec<Requirement>,
    pub ext_modules: Vec<ExtensionDescriptor>,
    pub cmdclass: BTreeMap<String, String>,
    pub zip_safe: bool,
    pub classifiers: Vec<String>,
    pub keywords: String,
}

impl PackageDescriptor {
    /// Describe the package rooted at `root`.
    ///
    /// `long_description` is the README when one exists.
    pub fn new(
        root: &Path,
        version: PackageVersion,
        extension: ExtensionDescriptor,
    ) -> Result<Self> {
        let readme = root.join("README.md");
        let long_description = if readme.is_file() {
            crate::util::fs::read_to_string(&readme)?
        } else {
            String::new()
        };

        let install_requires = INSTALL_REQUIRES
            .iter()
            .map(|r| r.parse())
            .collect::<Result<Vec<Requirement>>>()?;

        let mut cmdclass = BTreeMap::new();
        cmdclass.insert(
            BUILD_EXT_COMMAND.0.to_string(),
            BUILD_EXT_COMMAND.1.to_string(),
        );

        Ok(PackageDescriptor {
            name: PACKAGE_NAME.to_string(),
            version,
            description: "Universal sparse attention for Windows".to_string(),
            long_description,
            long_description_content_type: "text/markdown".to_string(),
            author: "SpargeAttn team".to_string(),
            author_email: String::new(),
            url: "https://github.com/StarCheater/SpargeAttn-for-windows".to_string(),
            license: "Apache 2.0".to_string(),
            packages: find_packages(root),
            python_requires: ">=3.9".to_string(),
            install_requires,
            ext_modules: vec![extension],
            cmdclass,
            zip_safe: false,
            classifiers: CLASSIFIERS.iter().map(|s| s.to_string()).collect(),
            keywords: "attention sparse cuda pytorch machine learning".to_string(),
        })
    }
}

/// Dotted names of every Python package under `root`.
///
/// A package is a directory with an `__init__.py` whose parent is either
/// `root` or itself a package. Hidden directories are skipped.
pub fn find_packages(root: &Path) -> Vec<String> {
    let mut packages: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| {
            // The predicate also sees the root, which min_depth only hides.
            e.depth() == 0
                || (e.file_type().is_dir()
                    && !e.file_name().to_string_lossy().starts_with('.')
                    && e.path().join("__init__.py").is_file())
        })
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let rel = e.path().strip_prefix(root).ok()?;
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            Some(parts.join("."))
        })
        .collect();

    packages.sort();
    packages
}
