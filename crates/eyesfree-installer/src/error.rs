//! Error types for the batch installer.

use eyesfree_exec::{ErrorCode, ExecError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for installer operations.
pub type InstallResult<T> = Result<T, InstallError>;

/// Errors that stop a batch install.
///
/// A package whose install command exits non-zero is not an error; it is
/// recorded in the report and the batch continues.
#[derive(Debug, Error)]
pub enum InstallError {
    /// Package directory does not exist or is not a directory.
    #[error("Package directory does not exist: {path}")]
    SourceDirMissing { path: PathBuf },

    /// Failed to list the package directory.
    #[error("Failed to read package directory {path}: {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The install command could not be run at all.
    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl ErrorCode for InstallError {
    fn code(&self) -> &'static str {
        match self {
            InstallError::SourceDirMissing { .. } => "INSTALL_001",
            InstallError::ReadDirFailed { .. } => "INSTALL_002",
            InstallError::Exec(e) => e.code(),
        }
    }

    fn category(&self) -> &'static str {
        match self {
            InstallError::Exec(e) => e.category(),
            _ => "install",
        }
    }
}
