//! Error types for external process invocation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for process invocation.
pub type ExecResult<T> = Result<T, ExecError>;

/// Stable error codes shared by every error type in the eyesfree tools.
pub trait ErrorCode: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "EXEC_001" or "LEXICON_003". These codes
    /// are stable and can be used for programmatic error handling.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category, e.g. "exec", "install", "lexicon".
    fn category(&self) -> &'static str;
}

/// Errors that can occur while locating or running an external tool.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Tool executable not found.
    #[error("{tool} executable not found. Ensure it is installed and in PATH, or set the {env_var} environment variable")]
    ToolNotFound {
        tool: &'static str,
        env_var: &'static str,
    },

    /// Failed to spawn the process.
    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to feed standard input to the process.
    #[error("Failed to write to standard input of '{program}': {source}")]
    StdinFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed while waiting for the process to exit.
    #[error("Failed to wait for '{program}': {source}")]
    WaitFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    /// Creates a new spawn failed error.
    pub fn spawn_failed(program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            program: program.into(),
            source,
        }
    }

    /// Creates a new stdin failed error.
    pub fn stdin_failed(program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StdinFailed {
            program: program.into(),
            source,
        }
    }

    /// Creates a new wait failed error.
    pub fn wait_failed(program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WaitFailed {
            program: program.into(),
            source,
        }
    }
}

impl ErrorCode for ExecError {
    fn code(&self) -> &'static str {
        match self {
            ExecError::ToolNotFound { .. } => "EXEC_001",
            ExecError::SpawnFailed { .. } => "EXEC_002",
            ExecError::StdinFailed { .. } => "EXEC_003",
            ExecError::WaitFailed { .. } => "EXEC_004",
        }
    }

    fn category(&self) -> &'static str {
        "exec"
    }
}
