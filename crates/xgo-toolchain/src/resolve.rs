//! Cross-compiler resolution.
//!
//! Absence of a cross compiler is not an error: every function here returns
//! [`CompilerPair::empty`] when nothing applies and leaves it to the caller to
//! decide whether CGO can still be used.

use crate::platform::Platform;
use crate::table::{CompilerPair, ToolchainTable};

/// How to find a cross compiler for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Look the target up in a [`ToolchainTable`].
    #[default]
    Table,
    /// Drive a single zig front-end with `--target=<arch>-<os>`.
    Zig,
}

/// Resolve a compiler pair for `target` when building on `host`.
///
/// `zig` is the front-end executable used by [`Strategy::Zig`].
pub fn resolve(
    strategy: Strategy,
    table: &ToolchainTable,
    zig: &str,
    host: &Platform,
    target: &Platform,
) -> CompilerPair {
    match strategy {
        Strategy::Table => from_table(table, host, target),
        Strategy::Zig => from_zig(zig, host, target),
    }
}

/// Look the target up in the table under the host's OS.
pub fn from_table(table: &ToolchainTable, host: &Platform, target: &Platform) -> CompilerPair {
    if target.same_as(host) {
        return CompilerPair::empty();
    }

    table
        .lookup(&host.os, &target.os, &target.arch)
        .cloned()
        .unwrap_or_default()
}

/// Synthesize `zig cc`/`zig c++` invocations for the target.
pub fn from_zig(zig: &str, host: &Platform, target: &Platform) -> CompilerPair {
    if target.same_as(host) {
        return CompilerPair::empty();
    }

    // zig only links arm64 binaries for macOS
    if target.arch == "arm64" && target.os != "darwin" {
        return CompilerPair::empty();
    }

    let (Some(arch), Some(os)) = (zig_arch(&target.arch), zig_os(&target.os)) else {
        return CompilerPair::empty();
    };

    CompilerPair::new(
        format!("{zig} cc --target={arch}-{os}"),
        format!("{zig} c++ --target={arch}-{os}"),
    )
}

fn zig_arch(goarch: &str) -> Option<&'static str> {
    match goarch {
        "386" => Some("x86"),
        "amd64" => Some("x86_64"),
        "arm64" => Some("aarch64"),
        _ => None,
    }
}

fn zig_os(goos: &str) -> Option<&'static str> {
    match goos {
        "darwin" => Some("macos"),
        "linux" => Some("linux"),
        "windows" => Some("windows"),
        _ => None,
    }
}
