//! JWalk-based directory lister.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use jwalk::{Parallelism, WalkDir};
use regex::Regex;

use oldfiles_core::{DirListing, ScanConfig, ScanError, ScanWarning, WarningKind};

/// Outcome of scanning all configured roots.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// One listing per directory that holds at least one file, in walk order.
    pub listings: Vec<DirListing>,
    /// Directories that could not be listed.
    pub warnings: Vec<ScanWarning>,
    /// Total number of files listed.
    pub files_listed: usize,
    /// Time spent scanning.
    pub scan_duration: Duration,
}

/// Lists the files of each directory under the configured roots.
#[derive(Debug, Default)]
pub struct DirScanner;

impl DirScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Scan every root in `config`.
    ///
    /// Directories that cannot be listed end up in [`ScanReport::warnings`];
    /// only a missing or non-directory root fails the scan.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        let filter = config
            .filter_regex()
            .map_err(|e| ScanError::InvalidConfig {
                message: e.to_string(),
            })?;

        let mut report = ScanReport::default();
        for root in &config.roots {
            self.scan_root(config, root, filter.as_ref(), &mut report)?;
        }

        report.scan_duration = start.elapsed();
        tracing::debug!(
            directories = report.listings.len(),
            files = report.files_listed,
            warnings = report.warnings.len(),
            "scan finished in {:.2}s",
            report.scan_duration.as_secs_f64()
        );
        Ok(report)
    }

    fn scan_root(
        &self,
        config: &ScanConfig,
        root: &Path,
        filter: Option<&Regex>,
        report: &mut ScanReport,
    ) -> Result<(), ScanError> {
        let root_path = std::path::absolute(root).map_err(|e| ScanError::io(root, e))?;
        let metadata = std::fs::metadata(&root_path).map_err(|e| ScanError::io(&root_path, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }

        let walker = WalkDir::new(&root_path)
            .parallelism(Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            })
            .sort(true)
            .skip_hidden(false)
            .follow_links(config.follow_symlinks)
            .min_depth(0)
            .max_depth(if config.recursive { usize::MAX } else { 1 });

        // Directories enter the map as they are walked so that listings keep
        // walk order; empty ones are dropped at the end.
        let mut by_dir: IndexMap<PathBuf, DirListing> = IndexMap::new();
        let mut unreadable: HashSet<PathBuf> = HashSet::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    let kind = err.io_error().map(|e| e.kind());
                    if unreadable.insert(path.clone()) {
                        report.warnings.push(directory_warning(path, kind, err.to_string()));
                    }
                    continue;
                }
            };

            let path = entry.path();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if let Some(err) = entry.read_children_error.as_ref() {
                    if unreadable.insert(path.clone()) {
                        let kind = err.io_error().map(|e| e.kind());
                        report
                            .warnings
                            .push(directory_warning(path.clone(), kind, err.to_string()));
                    }
                }
                by_dir
                    .entry(path.clone())
                    .or_insert_with(|| DirListing::new(path));
                continue;
            }

            let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
            if !is_file {
                continue;
            }

            if let Some(filter) = filter {
                if !filter.is_match(&path.to_string_lossy()) {
                    continue;
                }
            }

            let Some(parent) = path.parent().map(Path::to_path_buf) else {
                continue;
            };
            by_dir
                .entry(parent.clone())
                .or_insert_with(|| DirListing::new(parent))
                .files
                .push(path);
            report.files_listed += 1;
        }

        report
            .listings
            .extend(by_dir.into_values().filter(|listing| !listing.files.is_empty()));
        Ok(())
    }
}

fn directory_warning(
    path: PathBuf,
    kind: Option<std::io::ErrorKind>,
    message: String,
) -> ScanWarning {
    match kind {
        Some(std::io::ErrorKind::PermissionDenied) => ScanWarning::permission_denied(path),
        _ => {
            let message = format!("{}: {message}", path.display());
            ScanWarning::new(path, message, WarningKind::ReadError)
        }
    }
}
