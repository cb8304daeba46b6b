//! Core types and traits for oldfiles.
//!
//! This crate provides the data model shared by the oldfiles crates:
//! dated file records and groups, timestamp patterns, spacing functions,
//! configuration and error types.

mod config;
mod error;
mod pattern;
mod problem;
mod record;
mod spacing;

pub use config::{
    GroupScope, RetentionConfig, RetentionConfigBuilder, RetentionConfigBuilderError, ScanConfig,
    ScanConfigBuilder, ScanConfigBuilderError,
};
pub use error::{ConfigError, ExtractError, ScanError, ScanWarning, WarningKind};
pub use pattern::{DEFAULT_TIMESTAMP_PATTERN, TimestampField, TimestampPattern, user_regex};
pub use problem::{Problem, ProblemKind, ProblemLog};
pub use record::{Decoration, DecorationTag, DirListing, FileRecord, Group, State, age_in_days};
pub use spacing::{SpacingEntry, SpacingFunction};
