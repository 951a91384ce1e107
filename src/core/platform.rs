//! Host platform identity.

/// Host platform components relevant to flag selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    /// CPU architecture (x86_64, aarch64, etc.)
    pub arch: String,
    /// Operating system (linux, macos, windows, etc.)
    pub os: String,
}

impl HostPlatform {
    /// Create a new platform description.
    pub fn new(arch: &str, os: &str) -> Self {
        HostPlatform {
            arch: arch.to_string(),
            os: os.to_string(),
        }
    }

    /// Detect the host platform.
    pub fn host() -> Self {
        HostPlatform::new(std::env::consts::ARCH, std::env::consts::OS)
    }

    /// Whether this is a Windows host (MSVC flag set).
    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }
}

impl std::fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}
