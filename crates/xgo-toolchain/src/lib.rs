//! Cross-compiler resolution and build invocation for the Go toolchain.
//!
//! Resolving a build for a target platform happens in layers:
//! - **Table:** host OS → target OS → target arch → C/C++ compiler pair
//! - **Resolver:** picks a compiler pair from the table or synthesizes one for zig
//! - **Environment:** merges the inherited environment, `go env` defaults, and the pair
//! - **Invoker:** runs `go` (or `garble`) with that environment, or renders a transcript

pub mod environment;
pub mod error;
pub mod invoke;
pub mod platform;
pub mod probe;
pub mod quote;
pub mod resolve;
pub mod sanitize;
pub mod table;

pub use environment::BuildEnvironment;
pub use error::{InvocationError, ResolutionError};
pub use invoke::{Compiler, Programs, ShellStyle};
pub use platform::Platform;
pub use resolve::Strategy;
pub use table::{CompilerPair, ToolchainTable};

#[cfg(all(test, unix))]
mod test_support;
