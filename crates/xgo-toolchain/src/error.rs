//! Error types for toolchain invocation and environment resolution.

use std::process::ExitStatus;

/// Errors raised while running the underlying toolchain.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    /// The child process could not be started.
    #[error("failed to launch `{program}`")]
    Launch {
        /// The executable that failed to start.
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child exited nonzero and explained why on stderr.
    #[error("{stderr}")]
    Diagnostic {
        /// The executable that failed.
        program: String,
        /// Exit status of the child.
        status: ExitStatus,
        /// Trimmed standard error of the child.
        stderr: String,
    },

    /// The child exited nonzero without writing anything to stderr.
    #[error("`{program}` failed: {status}")]
    Status {
        /// The executable that failed.
        program: String,
        /// Exit status of the child.
        status: ExitStatus,
    },
}

impl InvocationError {
    /// The executable this error is about.
    pub fn program(&self) -> &str {
        match self {
            Self::Launch { program, .. }
            | Self::Diagnostic { program, .. }
            | Self::Status { program, .. } => program,
        }
    }
}

/// Errors raised while building the environment for a target.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// Querying the toolchain for its default environment failed.
    #[error("querying toolchain defaults")]
    Query(#[from] InvocationError),

    /// The toolchain's default environment was not a flat JSON object of strings.
    #[error("parsing toolchain defaults")]
    Parse(#[from] serde_json::Error),
}

/// Result type for toolchain operations.
pub type Result<T, E = InvocationError> = std::result::Result<T, E>;
