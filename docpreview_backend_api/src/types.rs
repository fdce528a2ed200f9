use serde::{Deserialize, Serialize};

/// Summary information about a registered package source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    /// Stable identifier for the source.
    pub id: String,
    /// Human-friendly label for display.
    pub label: String,
    /// Position in the lookup order, starting at zero.
    pub priority: usize,
}

/// Errors surfaced by compiler and package-source backends.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The external process ran past its deadline and was killed.
    #[error("{program} timed out after {seconds}s")]
    Timeout {
        /// Program that was killed.
        program: String,
        /// Configured timeout.
        seconds: u64,
    },
    /// The external process exited unsuccessfully.
    #[error("{program} failed with status {status}: {stderr}")]
    ExitStatus {
        /// Program that failed.
        program: String,
        /// Exit code, or `terminated` when killed by a signal.
        status: String,
        /// Trimmed standard error output.
        stderr: String,
    },
    /// Generic failure surfaced by the backend.
    #[error("{message}")]
    Failure {
        /// Human-readable error message.
        message: String,
    },
}

impl BackendError {
    /// Helper to construct a failure from any displayable message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

/// Convenience result alias for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;
