//! Target and host platform identifiers.
//!
//! Operating system and architecture names use the Go toolchain's vocabulary
//! (`GOOS`/`GOARCH`). The set is open-ended: the toolchain decides which pairs
//! are valid, so these are plain strings rather than enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An (operating system, architecture) pair, e.g. `linux/amd64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system (`GOOS`).
    pub os: String,
    /// Architecture (`GOARCH`).
    pub arch: String,
}

impl Platform {
    /// Build a platform from OS and architecture names.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this binary was compiled for, in Go's vocabulary.
    pub fn host() -> Self {
        Self::new(
            go_os(std::env::consts::OS),
            go_arch(std::env::consts::ARCH),
        )
    }

    /// Whether OS and architecture both match `other`.
    pub fn same_as(&self, other: &Platform) -> bool {
        self.os == other.os && self.arch == other.arch
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Translate a Rust `target_os` name to a `GOOS` name.
pub fn go_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

/// Translate a Rust `target_arch` name to a `GOARCH` name.
pub fn go_arch(arch: &str) -> &str {
    match arch {
        "x86" => "386",
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "loongarch64" => "loong64",
        "powerpc64" => "ppc64",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_names_translate_to_go_names() {
        assert_eq!(go_os("macos"), "darwin");
        assert_eq!(go_os("linux"), "linux");
        assert_eq!(go_os("windows"), "windows");
        assert_eq!(go_arch("x86_64"), "amd64");
        assert_eq!(go_arch("x86"), "386");
        assert_eq!(go_arch("aarch64"), "arm64");
        assert_eq!(go_arch("riscv64"), "riscv64");
    }

    #[test]
    fn host_uses_go_vocabulary() {
        let host = Platform::host();
        assert!(!host.os.is_empty());
        assert!(!host.arch.is_empty());
        assert_ne!(host.os, "macos");
        assert_ne!(host.arch, "x86_64");
        assert_ne!(host.arch, "aarch64");
    }

    #[test]
    fn display_joins_with_slash() {
        assert_eq!(Platform::new("windows", "386").to_string(), "windows/386");
    }

    #[test]
    fn same_as_requires_both_parts() {
        let p = Platform::new("linux", "amd64");
        assert!(p.same_as(&Platform::new("linux", "amd64")));
        assert!(!p.same_as(&Platform::new("linux", "386")));
        assert!(!p.same_as(&Platform::new("darwin", "amd64")));
    }
}
