//! Typed error definitions for file_organizer.
//! Provides a small set of well-known failure modes for better logs, exit codes and tests.
//!
//! Per-file problems (permission denied on one file, a file vanishing mid-run) are not
//! errors of an operation; they are collected as [`FileWarning`] values instead.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrganizerError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Deleting duplicates requires confirmation")]
    ConfirmationRequired,

    #[error("Invalid date format '{0}'")]
    InvalidDateFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl OrganizerError {
    /// Process exit code for this failure.
    pub fn code(&self) -> i32 {
        match self {
            OrganizerError::Usage(_)
            | OrganizerError::InvalidDateFormat(_)
            | OrganizerError::InvalidConfig(_) => 2,
            OrganizerError::NotFound(_) | OrganizerError::NotADirectory(_) => 3,
            OrganizerError::ConfirmationRequired => 4,
            OrganizerError::Interrupted => 130,
        }
    }

    /// Short stable identifier used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            OrganizerError::Usage(_) => "usage",
            OrganizerError::NotFound(_) => "not_found",
            OrganizerError::NotADirectory(_) => "not_a_directory",
            OrganizerError::ConfirmationRequired => "confirmation_required",
            OrganizerError::InvalidDateFormat(_) => "invalid_date_format",
            OrganizerError::InvalidConfig(_) => "invalid_config",
            OrganizerError::Interrupted => "interrupted",
        }
    }
}

/// A file that was left out of an operation, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWarning {
    pub path: PathBuf,
    pub reason: String,
}

impl FileWarning {
    pub fn new(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for FileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}
