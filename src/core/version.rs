//! Package version composition.

use std::fmt;

use semver::Version;

/// Base version of the `spas_sage_attn` package.
pub const BASE_VERSION: Version = Version::new(1, 0, 0);

/// A base version with an optional wheel suffix appended verbatim.
///
/// The suffix is not validated: wheel builders pass local version labels
/// such as `+cu124torch2.5` that are not semver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    pub base: Version,
    pub suffix: String,
}

impl PackageVersion {
    pub fn new(base: Version, suffix: impl Into<String>) -> Self {
        PackageVersion {
            base,
            suffix: suffix.into(),
        }
    }
}

impl Default for PackageVersion {
    fn default() -> Self {
        PackageVersion::new(BASE_VERSION, "")
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.suffix)
    }
}
