//! Non-fatal problems collected over a run.
//!
//! Any recorded problem makes the process exit with a non-zero status, but
//! never stops processing of other files or directories.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{ScanWarning, WarningKind};

/// Where in the pipeline a problem came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// A directory could not be listed.
    DirectoryAccess,
    /// A file name matched the pattern but held no usable timestamp.
    Extraction,
    /// Deleting a file failed.
    Action,
}

/// A single recorded problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    /// The file or directory concerned.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Origin of the problem.
    pub kind: ProblemKind,
}

impl Problem {
    /// Create a new problem.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: ProblemKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }
}

impl From<ScanWarning> for Problem {
    fn from(warning: ScanWarning) -> Self {
        let kind = match warning.kind {
            WarningKind::PermissionDenied | WarningKind::ReadError => ProblemKind::DirectoryAccess,
        };
        Self::new(warning.path, warning.message, kind)
    }
}

/// Thread-safe collector for problems; shared by everything in a run.
#[derive(Debug, Default)]
pub struct ProblemLog {
    entries: Mutex<Vec<Problem>>,
}

impl ProblemLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem and emit it as an error event.
    pub fn record(&self, problem: Problem) {
        tracing::error!(
            path = %problem.path.display(),
            kind = ?problem.kind,
            "{}",
            problem.message
        );
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(problem);
    }

    /// Whether anything was recorded.
    pub fn has_problems(&self) -> bool {
        self.len() > 0
    }

    /// Number of recorded problems.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<Problem> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
