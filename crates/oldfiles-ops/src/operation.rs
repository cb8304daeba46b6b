//! Cleanup operation types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use oldfiles_core::{Problem, ProblemKind};

/// What to do with each old file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupOptions {
    /// Command template run per file; every `{}` is replaced by the path.
    pub command: Option<String>,
    /// Delete the file once the command (if any) succeeded.
    pub delete: bool,
    /// Let the command write to the terminal.
    pub verbose: bool,
}

impl CleanupOptions {
    /// Whether any action is configured at all.
    pub fn has_action(&self) -> bool {
        self.command.is_some() || self.delete
    }
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupOutcome {
    /// Nothing was configured.
    NoAction,
    /// The command succeeded and deletion is off.
    CommandSucceeded,
    /// The command failed or could not be started; the file was left alone.
    CommandFailed {
        /// Exit code, if the command ran to completion.
        status: Option<i32>,
    },
    /// The file was removed.
    Deleted,
    /// The file was already gone.
    AlreadyAbsent,
}

/// An error that occurred while cleaning up a file.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{}: {message}", path.display())]
pub struct OperationError {
    /// The path that caused the error.
    pub path: PathBuf,
    /// A human-readable error message.
    pub message: String,
}

impl OperationError {
    /// Create a new operation error.
    pub fn new(path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl From<OperationError> for Problem {
    fn from(err: OperationError) -> Self {
        let message = format!(
            "could not delete file: {} ({})",
            err.path.display(),
            err.message
        );
        Problem::new(err.path, message, ProblemKind::Action)
    }
}

/// Tally of the cleanup outcomes of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupSummary {
    /// Files removed.
    pub deleted: usize,
    /// Files that were already gone.
    pub already_absent: usize,
    /// Commands that succeeded with deletion off.
    pub commands_succeeded: usize,
    /// Commands that failed; their files were kept.
    pub commands_failed: usize,
    /// Files that could not be removed.
    pub errors: Vec<OperationError>,
}

impl CleanupSummary {
    /// Count one result.
    pub fn record(&mut self, result: &Result<CleanupOutcome, OperationError>) {
        match result {
            Ok(CleanupOutcome::NoAction) => {}
            Ok(CleanupOutcome::CommandSucceeded) => self.commands_succeeded += 1,
            Ok(CleanupOutcome::CommandFailed { .. }) => self.commands_failed += 1,
            Ok(CleanupOutcome::Deleted) => self.deleted += 1,
            Ok(CleanupOutcome::AlreadyAbsent) => self.already_absent += 1,
            Err(err) => self.errors.push(err.clone()),
        }
    }

    /// Check if any file could not be removed.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
