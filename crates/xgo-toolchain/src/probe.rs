//! Toolchain availability check.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::platform::Platform;
use crate::table::{executable, ToolchainTable};

/// Key used when the zig front-end itself is missing.
pub const ALL_TARGETS: &str = "all targets";

/// Missing compiler invocations keyed by `host/target-os/target-arch`.
pub type MissingToolchains = BTreeMap<String, Vec<String>>;

/// Report which cross compilers for `host` cannot be found on `PATH`.
pub fn missing_toolchains(table: &ToolchainTable, host: &Platform, zig: &str) -> MissingToolchains {
    missing_toolchains_in(table, host, zig, std::env::var_os("PATH"))
}

/// Like [`missing_toolchains`] but searching `path` instead of `PATH`.
///
/// Only the first word of each compiler invocation is looked up. An entry
/// whose C and C++ compilers are both present is omitted, so a fully
/// provisioned host yields an empty map.
pub fn missing_toolchains_in(
    table: &ToolchainTable,
    host: &Platform,
    zig: &str,
    path: Option<OsString>,
) -> MissingToolchains {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let found = |invocation: &str| which::which_in(executable(invocation), path.as_ref(), &cwd).is_ok();

    let mut missing = MissingToolchains::new();

    for (os, arch, pair) in table.targets(&host.os) {
        let absent: Vec<String> = [pair.cc(), pair.cxx()]
            .into_iter()
            .filter(|invocation| !found(invocation))
            .map(str::to_string)
            .collect();

        if !absent.is_empty() {
            missing.insert(format!("{}/{os}/{arch}", host.os), absent);
        }
    }

    if !found(zig) {
        missing.insert(ALL_TARGETS.to_string(), vec![zig.to_string()]);
    }

    missing
}
