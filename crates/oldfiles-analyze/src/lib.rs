//! Retention analysis for oldfiles.
//!
//! Turns file listings into retention decisions:
//!
//! - **Extraction** - Pull a timestamp and a grouping key out of each name
//! - **Grouping** - Collect the variants of the same file per scope unit
//! - **Classification** - Keep always-keep matches, age out files past the
//!   maximum age, then thin the rest by spacing
//!
//! # Thinning
//!
//! Within a group, records are visited from youngest to oldest. The
//! youngest and the oldest are always kept; a record in between is dropped
//! only when the kept records on either side of it are close enough for the
//! spacing required at both of their ages.
//!
//! ```rust,ignore
//! use oldfiles_analyze::{RetentionAnalyzer, scope_units};
//! use oldfiles_core::{ProblemLog, RetentionConfig, SpacingFunction};
//! use oldfiles_scan::{DirScanner, ScanConfig};
//!
//! let scan_config = ScanConfig::new("/var/backups");
//! let report = DirScanner::new().scan(&scan_config).unwrap();
//!
//! let config = RetentionConfig::builder()
//!     .spacing(SpacingFunction::fixed(7.0))
//!     .build()
//!     .unwrap();
//! let analyzer = RetentionAnalyzer::new(config, chrono::Local::now().naive_local());
//! let problems = ProblemLog::new();
//!
//! for unit in scope_units(report.listings, scan_config.scope) {
//!     for group in analyzer.analyze(&unit, &problems) {
//!         println!("{}: {} files", group.key, group.len());
//!     }
//! }
//! ```

mod classify;
mod extract;
mod group;
mod policy;
mod thinning;

pub use classify::seed_states;
pub use extract::{Extraction, extract, extract_record, extract_records};
pub use group::{group_records, scope_units};
pub use policy::{RetentionAnalyzer, RetentionPolicy};
pub use thinning::{Candidate, apply_spacing};

// Re-export core types
pub use oldfiles_core::{FileRecord, Group, State};
