//! Cleanup actions for oldfiles.
//!
//! For each file deemed old, an optional shell command is run with the
//! file path substituted for `{}`, and the file is then deleted if
//! requested and the command succeeded. Files are handled one at a time;
//! each command is awaited before the next file is touched.

mod executor;
mod operation;

pub use executor::{CleanupExecutor, PATH_PLACEHOLDER};
pub use operation::{CleanupOptions, CleanupOutcome, CleanupSummary, OperationError};
