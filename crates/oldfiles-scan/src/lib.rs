//! Directory scanning for oldfiles.
//!
//! This crate walks the configured roots using jwalk and reports, per
//! directory, the files it holds. It never opens or modifies files.
//!
//! # Overview
//!
//! - **Per-directory listings** so callers can group each directory on its
//!   own or pool everything together
//! - **Recursion** into subdirectories on request
//! - **Path filter** applied to every listed file
//! - **Non-fatal warnings** for directories that cannot be listed
//!
//! # Example
//!
//! ```rust,no_run
//! use oldfiles_scan::{DirScanner, ScanConfig};
//!
//! let config = ScanConfig::new("/var/backups");
//! let report = DirScanner::new().scan(&config).unwrap();
//!
//! for listing in &report.listings {
//!     println!("{}: {} files", listing.dir.display(), listing.files.len());
//! }
//! ```

mod scanner;

pub use scanner::{DirScanner, ScanReport};

// Re-export core types for convenience
pub use oldfiles_core::{DirListing, ScanConfig, ScanError, ScanWarning, WarningKind};
