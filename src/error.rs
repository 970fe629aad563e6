//! Structured error handling and exit codes.

use std::path::PathBuf;

use serde::Serialize;

use crate::store::StoreError;

/// Operator input that could not be used. Recovered by asking again.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A menu or decision prompt got an unrecognized answer.
    #[error("invalid choice '{input}' (expected {expected})")]
    InvalidChoice {
        /// What was typed, trimmed
        input: String,
        /// Human-readable list of accepted answers
        expected: &'static str,
    },

    /// A threshold that is not an integer in `0..=100`.
    #[error("invalid threshold '{0}': enter a whole number from 0 to 100")]
    InvalidThreshold(String),

    /// A music folder that does not exist or is not a directory.
    #[error("folder does not exist: {0}")]
    InvalidPath(PathBuf),
}

/// Parse a similarity threshold typed by the operator or passed on the
/// command line.
///
/// # Errors
///
/// [`InputError::InvalidThreshold`] unless `input` is an integer from 0 to 100.
pub fn parse_threshold(input: &str) -> Result<u8, InputError> {
    let trimmed = input.trim();
    match trimmed.parse::<u8>() {
        Ok(n) if n <= 100 => Ok(n),
        _ => Err(InputError::InvalidThreshold(trimmed.to_string())),
    }
}

/// Exit codes for trackdupe.
///
/// - 0: Success
/// - 1: General error (unexpected failure)
/// - 2: No candidates found (`list`)
/// - 3: Partial success (some file operations failed)
/// - 4: Corrupt state (a store exists but cannot be trusted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Completed normally.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// Completed, but there was nothing to report.
    NoCandidates = 2,
    /// Completed, but some deletions or removals failed.
    PartialSuccess = 3,
    /// The ledger or preferences store is unreadable.
    CorruptState = 4,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "TD000",
            Self::GeneralError => "TD001",
            Self::NoCandidates => "TD002",
            Self::PartialSuccess => "TD003",
            Self::CorruptState => "TD004",
        }
    }

    /// Pick the exit code for an error that ended the run.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        let corrupt = err
            .chain()
            .filter_map(|cause| cause.downcast_ref::<StoreError>())
            .any(StoreError::is_corrupt);
        if corrupt {
            Self::CorruptState
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "TD004")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}
