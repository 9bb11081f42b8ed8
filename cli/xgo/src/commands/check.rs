//! `xgo --check`: report missing cross compilers.

use anyhow::Result;
use tracing::{info, warn};
use xgo_toolchain::probe::{self, MissingToolchains};
use xgo_toolchain::Compiler;

/// Probe `PATH` for every cross compiler the host's table names.
pub fn run(compiler: &Compiler<'_>) -> Result<()> {
    let missing = probe::missing_toolchains(compiler.table(), &compiler.host, &compiler.programs.zig);

    if missing.is_empty() {
        info!("all toolchains found");
    }
    for line in report(&missing) {
        warn!("{line}");
    }

    Ok(())
}

/// One line per target, in key order.
pub fn report(missing: &MissingToolchains) -> Vec<String> {
    missing
        .iter()
        .map(|(target, tools)| format!("{target} missing {}", tools.join(" and ")))
        .collect()
}
