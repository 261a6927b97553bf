//! Error types for the lexicon builder.

use eyesfree_exec::{ErrorCode, ExecError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for lexicon builder operations.
pub type LexiconResult<T> = Result<T, LexiconError>;

/// Errors that abort a lexicon build.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// An external command exited non-zero.
    #[error("'{program}' {}", describe_exit(.exit_code))]
    CommandFailed {
        program: String,
        exit_code: Option<i32>,
    },

    /// Requested entry is not in the lexicon.
    #[error("'{text}' is not in the lexicon")]
    UnknownEntry { text: String },

    /// Header fields do not fit in the fixed header size.
    #[error("SPHERE header is {len} bytes, exceeding the 1024-byte limit")]
    HeaderOverflow { len: usize },

    /// Configuration value out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Failed to create the scratch directory for intermediate files.
    #[error("Failed to create scratch directory: {0}")]
    ScratchFailed(#[source] std::io::Error),

    /// Failed to read or write a file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A command could not be run at all.
    #[error(transparent)]
    Exec(#[from] ExecError),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

impl LexiconError {
    /// Creates a new command failed error.
    pub fn command_failed(program: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::CommandFailed {
            program: program.into(),
            exit_code,
        }
    }

    /// Creates a new I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// The exit status of the failing external command, if that is the cause.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            LexiconError::CommandFailed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

impl ErrorCode for LexiconError {
    fn code(&self) -> &'static str {
        match self {
            LexiconError::CommandFailed { .. } => "LEXICON_001",
            LexiconError::UnknownEntry { .. } => "LEXICON_002",
            LexiconError::HeaderOverflow { .. } => "LEXICON_003",
            LexiconError::InvalidConfig { .. } => "LEXICON_004",
            LexiconError::ScratchFailed(_) => "LEXICON_005",
            LexiconError::Io { .. } => "LEXICON_006",
            LexiconError::Exec(e) => e.code(),
        }
    }

    fn category(&self) -> &'static str {
        match self {
            LexiconError::Exec(e) => e.category(),
            _ => "lexicon",
        }
    }
}
