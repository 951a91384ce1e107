//! CUDA architecture tokens and gencode expansion.
//!
//! An architecture list is a semicolon-separated sequence of compute
//! capabilities such as `8.0;8.6;9.0a`. Each token expands to an nvcc
//! `-gencode` pair targeting both the virtual (`compute_XY`) and real
//! (`sm_XY`) architecture.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Architecture list used when nothing else is configured.
pub const DEFAULT_ARCH_LIST: &str = "8.0;8.6;8.9;9.0";

/// A malformed architecture token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArchParseError {
    #[error("invalid CUDA architecture `{0}` (expected MAJOR.MINOR, e.g. `8.6` or `9.0a`)")]
    Malformed(String),

    #[error("architecture list `{0}` contains no entries")]
    Empty(String),
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)\.(\d+)([a-z]?)$").expect("architecture token pattern is valid")
    })
}

/// A single compute capability, e.g. `8.6` or `9.0a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchToken {
    pub major: u32,
    pub minor: u32,
    /// Architecture-specific feature suffix (`a` in `9.0a`)
    pub suffix: Option<char>,
}

impl ArchToken {
    /// The token with the separator stripped, as used by nvcc (`86`, `90a`).
    pub fn code(&self) -> String {
        match self.suffix {
            Some(s) => format!("{}{}{}", self.major, self.minor, s),
            None => format!("{}{}", self.major, self.minor),
        }
    }

    /// The value following `-gencode`.
    pub fn gencode_value(&self) -> String {
        let code = self.code();
        format!("arch=compute_{code},code=sm_{code}")
    }
}

impl FromStr for ArchToken {
    type Err = ArchParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = token_pattern()
            .captures(trimmed)
            .ok_or_else(|| ArchParseError::Malformed(trimmed.to_string()))?;

        let major = caps[1]
            .parse()
            .map_err(|_| ArchParseError::Malformed(trimmed.to_string()))?;
        let minor = caps[2]
            .parse()
            .map_err(|_| ArchParseError::Malformed(trimmed.to_string()))?;
        let suffix = caps.get(3).and_then(|m| m.as_str().chars().next());

        Ok(ArchToken {
            major,
            minor,
            suffix,
        })
    }
}

impl fmt::Display for ArchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(s) = self.suffix {
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}

/// Ordered list of target architectures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchList(Vec<ArchToken>);

impl ArchList {
    pub fn tokens(&self) -> &[ArchToken] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expand into nvcc arguments, two per entry, in list order.
    pub fn gencode_flags(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|t| ["-gencode".to_string(), t.gencode_value()])
            .collect()
    }
}

impl Default for ArchList {
    fn default() -> Self {
        DEFAULT_ARCH_LIST
            .parse()
            .expect("default architecture list is valid")
    }
}

impl FromStr for ArchList {
    type Err = ArchParseError;

    /// Parse a semicolon-separated list. Empty entries (`8.0;;8.6;`) are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s
            .split(';')
            .filter(|entry| !entry.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<ArchToken>, _>>()?;

        if tokens.is_empty() {
            return Err(ArchParseError::Empty(s.to_string()));
        }

        Ok(ArchList(tokens))
    }
}

impl fmt::Display for ArchList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", parts.join(";"))
    }
}
