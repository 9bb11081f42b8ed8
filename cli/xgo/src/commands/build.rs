//! `xgo <gocommand>`: resolve the target environment and run go.

use std::ffi::OsString;

use anyhow::{Context, Result};
use tracing::debug;
use xgo_toolchain::environment::process_environment;
use xgo_toolchain::sanitize::sanitize;
use xgo_toolchain::{Compiler, Platform};

/// Run `args` through go for `target` and print its output.
pub fn run(compiler: &Compiler<'_>, target: &Platform, args: &[String]) -> Result<()> {
    let stdout = execute(compiler, target, args, process_environment())?;
    if !stdout.is_empty() {
        println!("{stdout}");
    }
    Ok(())
}

/// Resolve the environment and run go, returning its standard output.
pub fn execute<I>(compiler: &Compiler<'_>, target: &Platform, args: &[String], inherited: I) -> Result<String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let args = sanitize(args).unwrap_or_default();
    debug!(%target, ?args, "building");

    let env = compiler
        .setup_env(target, inherited)
        .with_context(|| format!("resolving build environment for {target}"))?;

    // go's own diagnostics are the whole message
    let stdout = compiler.run(&env, &args)?;
    Ok(stdout)
}
