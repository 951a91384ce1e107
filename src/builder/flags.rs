//! Compiler, nvcc and linker flag assembly.
//!
//! The host compiler flag set is one of two fixed templates chosen by
//! platform. The nvcc flag set is a fixed base followed by one `-gencode`
//! pair per target architecture and a `--threads` setting.

use crate::core::arch::ArchList;
use crate::core::platform::HostPlatform;
use crate::util::config::BuildConfig;

/// Host compiler family driven by nvcc and used for `.cpp` sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCompiler {
    /// cl.exe (Windows)
    Msvc,
    /// gcc/clang (Linux, macOS)
    Gnu,
}

impl HostCompiler {
    /// Select the host compiler family for a platform.
    pub fn for_platform(platform: &HostPlatform) -> Self {
        if platform.is_windows() {
            HostCompiler::Msvc
        } else {
            HostCompiler::Gnu
        }
    }

    /// Host C++ compiler flags.
    pub fn cxx_flags(&self) -> &'static [&'static str] {
        match self {
            HostCompiler::Msvc => &[
                "/std:c++17",
                "/O2",
                // Multithreaded DLL runtime
                "/MD",
                "/EHsc",
                "/DNOMINMAX",
                // Silences D9025 override warnings
                "/W0",
            ],
            HostCompiler::Gnu => &["-std=c++17", "-O3", "-fopenmp", "-w"],
        }
    }

    /// Linker flags.
    pub fn link_flags(&self) -> &'static [&'static str] {
        match self {
            HostCompiler::Msvc => &[],
            // OpenMP runtime for -fopenmp
            HostCompiler::Gnu => &["-lgomp"],
        }
    }
}

/// nvcc flags preceding the gencode list.
pub const NVCC_BASE_FLAGS: &[&str] = &[
    "-std=c++17",
    "-O3",
    "-U__CUDA_NO_HALF_OPERATORS__",
    "-U__CUDA_NO_HALF_CONVERSIONS__",
    "--use_fast_math",
    "--expt-relaxed-constexpr",
    // #177-D: declared but never referenced
    "--diag-suppress=177",
    "-w",
];

/// A preprocessor define (name, optional value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    pub name: String,
    pub value: Option<String>,
}

impl Define {
    /// Create a define with no value (`-DNAME`).
    pub fn flag(name: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: None,
        }
    }

    /// Create a define with a value (`-DNAME=value`).
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Convert to a compiler flag.
    pub fn to_flag(&self) -> String {
        match &self.value {
            Some(v) => format!("-D{}={}", self.name, v),
            None => format!("-D{}", self.name),
        }
    }
}

/// Assembled flags for one extension build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFlags {
    /// Host compiler family the `cxx` set was chosen for
    pub host_compiler: HostCompiler,
    /// Host C++ compiler flags
    pub cxx: Vec<String>,
    /// nvcc flags
    pub nvcc: Vec<String>,
    /// Linker flags
    pub link: Vec<String>,
    /// Preprocessor defines
    pub macros: Vec<Define>,
}

/// Inputs to [`assemble_flags`].
#[derive(Debug, Clone)]
pub struct FlagInputs<'a> {
    pub platform: &'a HostPlatform,
    pub arch_list: &'a ArchList,
    pub nvcc_threads: usize,
    /// Value of the `TORCH_EXTENSION_NAME` define
    pub extension_name: &'a str,
    /// Config-supplied extra flags, appended after the templates
    pub extra: &'a BuildConfig,
}

/// Build the compiler, nvcc, linker and macro sets.
pub fn assemble_flags(inputs: &FlagInputs<'_>) -> BuildFlags {
    let host_compiler = HostCompiler::for_platform(inputs.platform);

    let mut cxx: Vec<String> = host_compiler
        .cxx_flags()
        .iter()
        .map(|s| s.to_string())
        .collect();
    cxx.extend(inputs.extra.extra_cxx_flags.iter().cloned());

    let mut nvcc: Vec<String> = NVCC_BASE_FLAGS.iter().map(|s| s.to_string()).collect();
    nvcc.extend(inputs.arch_list.gencode_flags());
    nvcc.push(format!("--threads={}", inputs.nvcc_threads));
    nvcc.extend(inputs.extra.extra_nvcc_flags.iter().cloned());

    let mut link: Vec<String> = host_compiler
        .link_flags()
        .iter()
        .map(|s| s.to_string())
        .collect();
    link.extend(inputs.extra.extra_link_flags.iter().cloned());

    let macros = vec![
        Define::flag("WITH_CUDA"),
        Define::with_value("TORCH_EXTENSION_NAME", inputs.extension_name),
    ];

    tracing::debug!(
        "assembled {} flags: {} cxx, {} nvcc, {} link",
        inputs.platform,
        cxx.len(),
        nvcc.len(),
        link.len()
    );

    BuildFlags {
        host_compiler,
        cxx,
        nvcc,
        link,
        macros,
    }
}
