//! Error types for configuration, extraction and scanning.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal configuration errors, detected before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A user-supplied regular expression failed to compile.
    #[error("The value provided for {field} is not a valid regular expression: {source}")]
    InvalidRegex {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    /// The timestamp pattern lacks one of the mandatory date groups.
    #[error(
        "The timestamp pattern must include the named capture groups \"y\", \"m\" and \"d\" for year, month and day"
    )]
    MissingDateGroups,

    /// The timestamp pattern names a finer time group without its coarser sibling.
    #[error(
        "The timestamp pattern may include the group \"tm\" only if \"th\" is also present; similarly, \"ts\" requires \"tm\""
    )]
    InvalidTimeGroups,

    /// The spacing string could not be parsed.
    #[error("Cannot parse the spacing parameter: {message}")]
    InvalidSpacing { message: String },

    /// The maximum age is negative or not a number.
    #[error("Invalid maximum age: {value}")]
    InvalidMaxAge { value: f64 },

    /// A directory to scan does not exist.
    #[error("Folder not found: {path}")]
    RootNotFound { path: PathBuf },

    /// A configuration builder rejected its input.
    #[error("Invalid configuration: {message}")]
    Builder { message: String },
}

impl ConfigError {
    /// Create a spacing error from a message.
    pub fn spacing(message: impl Into<String>) -> Self {
        Self::InvalidSpacing {
            message: message.into(),
        }
    }
}

/// Errors extracting a timestamp from a file name that did match the pattern.
///
/// These never abort a run: the file is excluded from its group and the
/// problem is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// Some, but not all, of year, month and day matched.
    #[error("the timestamp pattern matches a year, a month or a day, but not all of them")]
    PartialDate,

    /// Minutes matched without hours, or seconds without minutes.
    #[error("the timestamp pattern matches seconds but not minutes, or minutes but not hours")]
    PartialTime,

    /// The matched components do not form a valid date and time.
    #[error("could not parse the timestamp ({components})")]
    InvalidTimestamp { components: String },
}

/// Errors that can occur during scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Listing a directory was not permitted.
    PermissionDenied,
    /// Error reading a directory.
    ReadError,
}

/// Non-fatal warning encountered during scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a permission denied warning.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("not authorized to list directory contents: {}", path.display()),
            path,
            kind: WarningKind::PermissionDenied,
        }
    }
}
