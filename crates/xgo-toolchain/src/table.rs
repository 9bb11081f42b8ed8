//! Cross-compiler lookup table.
//!
//! Maps host OS → target OS → target architecture → [`CompilerPair`]. The
//! built-in table is constructed once per process and never mutated; callers
//! that need extra entries build a new table with [`ToolchainTable::with_pair`]
//! before serving any request.

use std::collections::BTreeMap;
use std::sync::OnceLock;

/// C and C++ compiler invocations for one target.
///
/// Each string may carry trailing flags (`--static`, `--target=...`). Both are
/// set or both are empty; an empty pair means "no cross compiler available".
/// [`CompilerPair::new`] is the only way to fill one in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerPair {
    cc: String,
    cxx: String,
}

impl CompilerPair {
    /// Build a pair. If either side is blank the result is the empty pair.
    pub fn new(cc: impl Into<String>, cxx: impl Into<String>) -> Self {
        let cc = cc.into();
        let cxx = cxx.into();
        if cc.trim().is_empty() || cxx.trim().is_empty() {
            return Self::empty();
        }
        Self { cc, cxx }
    }

    /// The "no cross compiler" pair.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no cross compiler is available.
    pub fn is_empty(&self) -> bool {
        self.cc.is_empty() || self.cxx.is_empty()
    }

    /// Value for `CC`.
    pub fn cc(&self) -> &str {
        &self.cc
    }

    /// Value for `CXX`.
    pub fn cxx(&self) -> &str {
        &self.cxx
    }

    /// The executable names with any embedded flags removed.
    pub fn executables(&self) -> [&str; 2] {
        [executable(&self.cc), executable(&self.cxx)]
    }
}

/// First word of a compiler invocation string.
pub fn executable(invocation: &str) -> &str {
    invocation.split_whitespace().next().unwrap_or("")
}

type ArchMap = BTreeMap<String, CompilerPair>;
type TargetMap = BTreeMap<String, ArchMap>;

/// Three-level host → target OS → target arch lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainTable {
    hosts: BTreeMap<String, TargetMap>,
}

// (host, target os, target arch, cc, cxx)
const BUILTIN: &[(&str, &str, &str, &str, &str)] = &[
    // brew install musl-cross --with-i486 --without-aarch64
    (
        "darwin",
        "linux",
        "386",
        "i486-linux-musl-gcc --static",
        "i486-linux-musl-g++ --static",
    ),
    (
        "darwin",
        "linux",
        "amd64",
        "x86_64-linux-musl-gcc --static",
        "x86_64-linux-musl-g++ --static",
    ),
    // brew install mingw-w64
    ("darwin", "windows", "386", "i686-w64-mingw32-gcc", "i686-w64-mingw32-g++"),
    ("darwin", "windows", "amd64", "x86_64-w64-mingw32-gcc", "x86_64-w64-mingw32-g++"),
    // osxcross
    ("linux", "darwin", "amd64", "o64-clang", "o64-clang++"),
    ("linux", "darwin", "arm64", "oa64-clang", "oa64-clang++"),
    // mingw-w64
    ("linux", "windows", "386", "i686-w64-mingw32-gcc", "i686-w64-mingw32-g++"),
    ("linux", "windows", "amd64", "x86_64-w64-mingw32-gcc", "x86_64-w64-mingw32-g++"),
    ("windows", "darwin", "amd64", "o64-clang", "o64-clang++"),
    ("windows", "darwin", "arm64", "oa64-clang", "oa64-clang++"),
    // choco install mingw
    ("windows", "linux", "386", "i686-w64-mingw32-gcc", "i686-w64-mingw32-g++"),
    ("windows", "linux", "amd64", "x86_64-w64-mingw32-gcc", "x86_64-w64-mingw32-g++"),
];

impl ToolchainTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table, initialized on first use.
    pub fn builtin() -> &'static ToolchainTable {
        static TABLE: OnceLock<ToolchainTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            BUILTIN
                .iter()
                .fold(Self::new(), |table, &(host, os, arch, cc, cxx)| {
                    table.with_pair(host, os, arch, CompilerPair::new(cc, cxx))
                })
        })
    }

    /// Return a copy of this table with one entry added or replaced.
    ///
    /// Empty pairs are ignored so lookups never yield a stored empty pair.
    pub fn with_pair(
        mut self,
        host_os: &str,
        target_os: &str,
        target_arch: &str,
        pair: CompilerPair,
    ) -> Self {
        if pair.is_empty() {
            return self;
        }
        self.hosts
            .entry(host_os.to_string())
            .or_default()
            .entry(target_os.to_string())
            .or_default()
            .insert(target_arch.to_string(), pair);
        self
    }

    /// Look up the pair for a host and target, if all three levels exist.
    pub fn lookup(&self, host_os: &str, target_os: &str, target_arch: &str) -> Option<&CompilerPair> {
        self.hosts.get(host_os)?.get(target_os)?.get(target_arch)
    }

    /// Every (target OS, target arch, pair) reachable from `host_os`.
    pub fn targets<'a>(
        &'a self,
        host_os: &str,
    ) -> impl Iterator<Item = (&'a str, &'a str, &'a CompilerPair)> + 'a {
        self.hosts
            .get(host_os)
            .into_iter()
            .flat_map(|targets| targets.iter())
            .flat_map(|(os, arches)| {
                arches
                    .iter()
                    .map(move |(arch, pair)| (os.as_str(), arch.as_str(), pair))
            })
    }

    /// Host OS names with at least one entry.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }
}
