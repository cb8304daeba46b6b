//! Scan and retention configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pattern::{TimestampPattern, user_regex};
use crate::spacing::SpacingFunction;

/// How scanned files are pooled before grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupScope {
    /// Every directory is grouped on its own.
    #[default]
    PerDirectory,
    /// Files from all roots (and subdirectories) are grouped together.
    Unified,
}

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Directories to scan.
    pub roots: Vec<PathBuf>,

    /// Process subdirectories too.
    #[builder(default = "false")]
    #[serde(default)]
    pub recursive: bool,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Only consider files whose full path matches this regex.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub filter: Option<String>,

    /// Grouping scope.
    #[builder(default)]
    #[serde(default)]
    pub scope: GroupScope,
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.roots {
            Some(ref roots) if roots.is_empty() => {
                return Err("At least one directory is required".to_string());
            }
            Some(ref roots) if roots.iter().any(|r| r.as_os_str().is_empty()) => {
                return Err("Root path cannot be empty".to_string());
            }
            Some(_) => {}
            None => return Err("Root path is required".to_string()),
        }
        if let Some(Some(ref filter)) = self.filter {
            user_regex("filter", filter).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning one directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            roots: vec![root.into()],
            recursive: false,
            follow_symlinks: false,
            filter: None,
            scope: GroupScope::PerDirectory,
        }
    }

    /// Compile the path filter, if any.
    pub fn filter_regex(&self) -> Result<Option<Regex>, ConfigError> {
        self.filter
            .as_deref()
            .map(|filter| user_regex("filter", filter))
            .transpose()
    }

    /// Fail if any root does not exist.
    pub fn check_roots(&self) -> Result<(), ConfigError> {
        match self.roots.iter().find(|root| !root.is_dir()) {
            Some(root) => Err(ConfigError::RootNotFound { path: root.clone() }),
            None => Ok(()),
        }
    }
}

impl From<ScanConfigBuilderError> for ConfigError {
    fn from(err: ScanConfigBuilderError) -> Self {
        ConfigError::Builder {
            message: err.to_string(),
        }
    }
}

/// Configuration for retention decisions.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct RetentionConfig {
    /// Where the timestamp sits in file names.
    #[builder(default)]
    pub pattern: TimestampPattern,

    /// Files older than this many days are old regardless of spacing.
    #[builder(default = "f64::INFINITY")]
    pub max_age: f64,

    /// Minimum spacing between kept files.
    #[builder(default)]
    pub spacing: SpacingFunction,

    /// Files whose full path matches are always kept.
    #[builder(default, setter(into, strip_option))]
    pub always_keep: Option<Regex>,
}

impl RetentionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(max_age) = self.max_age {
            if max_age.is_nan() || max_age < 0.0 {
                return Err(ConfigError::InvalidMaxAge { value: max_age }.to_string());
            }
        }
        Ok(())
    }
}

impl RetentionConfig {
    /// Create a new config builder.
    pub fn builder() -> RetentionConfigBuilder {
        RetentionConfigBuilder::default()
    }

    /// Whether `path` matches the always-keep pattern.
    pub fn is_always_keep(&self, path: &std::path::Path) -> bool {
        self.always_keep
            .as_ref()
            .is_some_and(|re| re.is_match(&path.to_string_lossy()))
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            pattern: TimestampPattern::default(),
            max_age: f64::INFINITY,
            spacing: SpacingFunction::None,
            always_keep: None,
        }
    }
}

impl From<RetentionConfigBuilderError> for ConfigError {
    fn from(err: RetentionConfigBuilderError) -> Self {
        ConfigError::Builder {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_config_builder() {
        let config = ScanConfig::builder()
            .roots(vec![PathBuf::from("/backups")])
            .recursive(true)
            .filter("\\.zip$")
            .scope(GroupScope::Unified)
            .build()
            .unwrap();

        assert_eq!(config.roots, vec![PathBuf::from("/backups")]);
        assert!(config.recursive);
        assert_eq!(config.filter.as_deref(), Some("\\.zip$"));
        assert_eq!(config.scope, GroupScope::Unified);
        assert!(config.filter_regex().unwrap().is_some());
    }

    #[test]
    fn test_scan_config_requires_roots() {
        assert!(ScanConfig::builder().build().is_err());
        assert!(ScanConfig::builder().roots(Vec::<PathBuf>::new()).build().is_err());
    }

    #[test]
    fn test_scan_config_rejects_bad_filter() {
        let err = ScanConfig::builder()
            .roots(vec![PathBuf::from("/backups")])
            .filter("(")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("filter"));
    }

    #[test]
    fn test_scan_config_simple() {
        let config = ScanConfig::new("/backups");
        assert!(!config.recursive);
        assert_eq!(config.scope, GroupScope::PerDirectory);
        assert!(config.filter_regex().unwrap().is_none());
    }

    #[test]
    fn test_retention_config_defaults() {
        let config = RetentionConfig::builder().build().unwrap();
        assert!(config.max_age.is_infinite());
        assert_eq!(config.spacing, SpacingFunction::None);
        assert!(config.always_keep.is_none());
    }

    #[test]
    fn test_retention_config_rejects_negative_max_age() {
        assert!(RetentionConfig::builder().max_age(-1.0).build().is_err());
        assert!(RetentionConfig::builder().max_age(f64::NAN).build().is_err());
    }

    #[test]
    fn test_always_keep_matches_full_path() {
        let config = RetentionConfig::builder()
            .always_keep(user_regex("always-keep", "/monthly/").unwrap())
            .build()
            .unwrap();
        assert!(config.is_always_keep(std::path::Path::new("/srv/Monthly/db-2020-01-01.gz")));
        assert!(!config.is_always_keep(std::path::Path::new("/srv/daily/db-2020-01-01.gz")));
    }
}
