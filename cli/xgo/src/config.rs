//! `xgo.toml` parsing and run settings.
//!
//! Settings are layered: built-in defaults, then `xgo.toml`, then the
//! `XGO*`/`GOOS`/`GOARCH` environment variables, then command-line flags.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use xgo_toolchain::{CompilerPair, Platform, Programs, ToolchainTable};

use crate::Cli;

/// Name of the configuration file searched for from the working directory up.
pub const CONFIG_FILE: &str = "xgo.toml";

/// The top-level `xgo.toml` structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XgoConfig {
    /// Default switches.
    #[serde(default)]
    pub defaults: Defaults,
    /// Executable overrides.
    #[serde(default)]
    pub programs: ProgramsConfig,
    /// Extra cross compilers for the current host, by target OS then arch.
    #[serde(default)]
    pub toolchains: BTreeMap<String, BTreeMap<String, ToolchainConfig>>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    /// Print commands instead of running them.
    #[serde(default)]
    pub debug: bool,
    /// Build through garble.
    #[serde(default)]
    pub garble: bool,
    /// Use zig as the cross compiler.
    #[serde(default)]
    pub zig: bool,
}

/// `[programs]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramsConfig {
    /// Go executable, e.g. a pinned `go1.22.4`.
    #[serde(default)]
    pub go: Option<String>,
    /// Garble executable.
    #[serde(default)]
    pub garble: Option<String>,
    /// Zig executable.
    #[serde(default)]
    pub zig: Option<String>,
}

/// One `[toolchains.<os>.<arch>]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// C compiler invocation, flags allowed.
    #[serde(default)]
    pub cc: Option<String>,
    /// C++ compiler invocation, flags allowed.
    #[serde(default)]
    pub cxx: Option<String>,
}

impl XgoConfig {
    /// Search upward from `start_dir` for `xgo.toml`, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let Some(dir) = find_upward(start_dir, CONFIG_FILE) else {
            return Ok(None);
        };
        let path = dir.join(CONFIG_FILE);
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some((config, dir)))
    }

    /// Parse a config from a TOML string.
    pub fn from_str(s: &str) -> Result<Self> {
        let config: XgoConfig = toml::from_str(s)?;
        Ok(config)
    }

    /// The built-in table extended with this config's toolchains under `host_os`.
    pub fn table(&self, host_os: &str) -> Result<ToolchainTable> {
        let mut table = ToolchainTable::builtin().clone();
        for (os, arches) in &self.toolchains {
            for (arch, spec) in arches {
                let (Some(cc), Some(cxx)) = (spec.cc.as_deref(), spec.cxx.as_deref()) else {
                    bail!("toolchains.{os}.{arch}: both cc and cxx must be set");
                };
                let pair = CompilerPair::new(cc, cxx);
                if pair.is_empty() {
                    bail!("toolchains.{os}.{arch}: cc and cxx must not be blank");
                }
                table = table.with_pair(host_os, os, arch, pair);
            }
        }
        Ok(table)
    }

    /// Executable names with overrides applied.
    pub fn programs(&self) -> Programs {
        let defaults = Programs::default();
        Programs {
            go: self.programs.go.clone().unwrap_or(defaults.go),
            garble: self.programs.garble.clone().unwrap_or(defaults.garble),
            zig: self.programs.zig.clone().unwrap_or(defaults.zig),
        }
    }
}

/// The nearest directory at or above `start_dir` holding a file `name`.
fn find_upward(start_dir: &Path, name: &str) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find(|dir| dir.join(name).is_file())
        .map(Path::to_path_buf)
}

/// Interpret an environment variable value as a switch.
pub fn boolean_like(value: &str) -> bool {
    !matches!(
        value.to_lowercase().as_str(),
        "" | "0" | "disable" | "f" | "false" | "no" | "off"
    )
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Report missing toolchains instead of building.
    pub check: bool,
    /// Print the command instead of running it.
    pub debug: bool,
    /// Build through garble.
    pub garble: bool,
    /// Use zig as the cross compiler.
    pub zig: bool,
    /// Platform to build for.
    pub target: Platform,
    /// Go command and its arguments.
    pub args: Vec<String>,
}

impl Settings {
    /// Combine flags, environment, and config. `env` looks up a variable.
    pub fn resolve(
        cli: &Cli,
        config: &XgoConfig,
        host: &Platform,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let switch = |flag: bool, name: &str, default: bool| {
            flag || env(name).map_or(default, |v| boolean_like(&v))
        };
        let target_part = |flag: &Option<String>, name: &str, host: &str| {
            flag.clone()
                .filter(|v| !v.is_empty())
                .or_else(|| env(name).filter(|v| !v.is_empty()))
                .unwrap_or_else(|| host.to_string())
        };

        Self {
            check: cli.check,
            debug: switch(cli.debug, "XGODEBUG", config.defaults.debug),
            garble: switch(cli.garble, "XGOGARBLE", config.defaults.garble),
            zig: switch(cli.zig, "XGOZIG", config.defaults.zig),
            target: Platform::new(
                target_part(&cli.goos, "GOOS", &host.os),
                target_part(&cli.goarch, "GOARCH", &host.arch),
            ),
            args: cli.args.clone(),
        }
    }
}
