//! Build environment synthesis.
//!
//! The environment for a target is layered: inherited variables, then the
//! target selection, then whatever `go env --json` reports for that target,
//! then the cross compilers when CGO can use them.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::ops::{Deref, DerefMut};

use tracing::{debug, trace};

use crate::error::ResolutionError;
use crate::invoke::Compiler;
use crate::platform::Platform;

/// Variable name to value. Flattened and sorted before use.
///
/// Inherited variables whose name or value is not UTF-8 cannot be unquoted or
/// rendered, so they are kept apart and handed to the child unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
    vars: BTreeMap<String, String>,
    opaque: Vec<(OsString, OsString)>,
}

impl BuildEnvironment {
    /// An environment with no variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inherited variables that are not UTF-8, in their original order.
    pub fn opaque(&self) -> &[(OsString, OsString)] {
        &self.opaque
    }

    fn inherit(&mut self, key: &OsStr, value: &OsStr) {
        match (key.to_str(), value.to_str()) {
            (Some(key), Some(value)) => {
                self.vars.insert(key.to_string(), unquote(value).to_string());
            }
            _ => {
                debug!(key = %key.to_string_lossy(), "passing non-UTF-8 variable through unchanged");
                self.opaque.push((key.to_owned(), value.to_owned()));
            }
        }
    }
}

impl Deref for BuildEnvironment {
    type Target = BTreeMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.vars
    }
}

impl DerefMut for BuildEnvironment {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.vars
    }
}

impl FromIterator<(String, String)> for BuildEnvironment {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            vars: iter.into_iter().collect(),
            opaque: Vec::new(),
        }
    }
}

/// C compiler.
pub const CC: &str = "CC";
/// C++ compiler.
pub const CXX: &str = "CXX";
/// Enables cgo.
pub const CGO_ENABLED: &str = "CGO_ENABLED";
/// Target operating system.
pub const GOOS: &str = "GOOS";
/// Target architecture.
pub const GOARCH: &str = "GOARCH";

impl Compiler<'_> {
    /// Build the environment for compiling to `target`.
    ///
    /// `inherited` is usually [`process_environment`]; entries that are not
    /// UTF-8 are passed through as they are. CGO is enabled for
    /// native builds and whenever a cross compiler pair resolves; `CC` and
    /// `CXX` are only set in the latter case.
    ///
    /// The `go env --json` query runs even when `debug` is set, since the
    /// defaults it reports are needed to render an accurate transcript.
    pub fn setup_env<I, K, V>(
        &self,
        target: &Platform,
        inherited: I,
    ) -> Result<BuildEnvironment, ResolutionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        let pair = self.resolve(target);
        let cgo = target.same_as(&self.host) || !pair.is_empty();
        debug!(%target, host = %self.host, cc = pair.cc(), cxx = pair.cxx(), cgo, "resolved cross compilers");

        let mut env = BuildEnvironment::new();
        for (key, value) in inherited {
            env.inherit(key.as_ref(), value.as_ref());
        }

        env.insert(CGO_ENABLED.into(), cgo_flag(cgo).into());
        env.insert(GOARCH.into(), target.arch.clone());
        env.insert(GOOS.into(), target.os.clone());

        for (key, value) in self.toolchain_defaults(&env)? {
            trace!(%key, %value, "toolchain default");
            env.insert(key, unquote(&value).to_string());
        }

        if cgo && !pair.is_empty() {
            env.insert(CC.into(), pair.cc().to_string());
            env.insert(CGO_ENABLED.into(), cgo_flag(true).into());
            env.insert(CXX.into(), pair.cxx().to_string());
        }

        Ok(env)
    }

    /// Ask `go env --json` for its defaults under `env`.
    fn toolchain_defaults(
        &self,
        env: &BuildEnvironment,
    ) -> Result<BTreeMap<String, String>, ResolutionError> {
        let stdout = self.execute(&self.programs.go, env, &["env", "--json"][..])?;
        let defaults = serde_json::from_str(&stdout)?;
        Ok(defaults)
    }
}

/// The current process environment, including variables that are not UTF-8.
pub fn process_environment() -> Vec<(OsString, OsString)> {
    std::env::vars_os().collect()
}

/// Strip one leading and one trailing single quote.
fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('\'').unwrap_or(value);
    value.strip_suffix('\'').unwrap_or(value)
}

fn cgo_flag(enabled: bool) -> &'static str {
    if enabled {
        "1"
    } else {
        "0"
    }
}
