//! oldfiles - thin out timestamped files while keeping a minimum spacing.
//!
//! Usage:
//!   oldfiles [OPTIONS] <DIRS>...
//!
//! Files are recognised by a timestamp in their name, grouped by what is
//! left of the name once the timestamp is removed, and within each group
//! the files that are too old or too close to their neighbours are deemed
//! old. Old files are listed, and optionally passed to a command and/or
//! deleted.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use crossterm::style::Stylize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use oldfiles_analyze::{RetentionAnalyzer, scope_units};
use oldfiles_core::{
    ConfigError, Group, GroupScope, Problem, ProblemLog, RetentionConfig, ScanConfig,
    SpacingFunction, State, TimestampPattern, user_regex,
};
use oldfiles_ops::{CleanupExecutor, CleanupOptions, CleanupSummary};
use oldfiles_scan::DirScanner;

#[derive(Parser)]
#[command(
    name = "oldfiles",
    version,
    about = "Find and remove old timestamped files",
    long_about = "oldfiles looks for files with a timestamp in their name, such as \
                  backups and snapshots, and decides which of them are old: either \
                  older than --max-age, or closer to their neighbours than --spacing \
                  requires.\n\n\
                  Spacing is either `fixed:<days>` or a list like \
                  `list:[0,1][30,7][365,0.1age]`, where each `[limit,value]` applies \
                  from `limit` days of age and a value ending in `age` is a fraction \
                  of the file's age."
)]
struct Cli {
    /// Directories to scan for old files
    #[arg(required = true)]
    dirs: Vec<PathBuf>,

    /// Only consider files whose full path matches this regex
    #[arg(short, long, value_name = "REGEX")]
    filter: Option<String>,

    /// Also process subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Group files from all directories together instead of per directory
    #[arg(short, long)]
    unify: bool,

    /// Files older than this many days are old (fractions allowed)
    #[arg(short, long, value_name = "DAYS")]
    max_age: Option<f64>,

    /// Minimum spacing between kept files, e.g. "fixed:7" or "list:[0,1][30,7]"
    #[arg(short, long, value_name = "SPEC")]
    spacing: Option<String>,

    /// Regex locating the timestamp, with named groups y, m, d and optionally th, tm, ts, g
    #[arg(short, long, value_name = "REGEX")]
    timestamp: Option<String>,

    /// Files whose full path matches this regex are always kept
    #[arg(short = 'k', long, value_name = "REGEX")]
    always_keep: Option<String>,

    /// List kept files and groups, and show command output
    #[arg(short, long)]
    verbose: bool,

    /// Delete old files
    #[arg(short, long)]
    delete: bool,

    /// Run this command for every old file, with {} replaced by its path
    #[arg(short, long, value_name = "CMD")]
    execute: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything a run needs, validated before any directory is touched.
struct RunConfig {
    scan: ScanConfig,
    retention: RetentionConfig,
    cleanup: CleanupOptions,
}

impl RunConfig {
    fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut scan = ScanConfig::builder();
        scan.roots(cli.dirs.clone())
            .recursive(cli.recursive)
            .scope(if cli.unify {
                GroupScope::Unified
            } else {
                GroupScope::PerDirectory
            });
        if let Some(filter) = &cli.filter {
            scan.filter(filter.clone());
        }
        let scan = scan.build()?;
        scan.check_roots()?;

        let mut retention = RetentionConfig::builder();
        if let Some(max_age) = cli.max_age {
            retention.max_age(max_age);
        }
        if let Some(spacing) = &cli.spacing {
            retention.spacing(spacing.parse::<SpacingFunction>()?);
        }
        if let Some(timestamp) = &cli.timestamp {
            retention.pattern(TimestampPattern::new(timestamp)?);
        }
        if let Some(always_keep) = &cli.always_keep {
            retention.always_keep(user_regex("always_keep", always_keep)?);
        }
        let retention = retention.build()?;

        let cleanup = CleanupOptions {
            command: cli.execute.clone(),
            delete: cli.delete,
            verbose: cli.verbose && cli.format == OutputFormat::Text,
        };

        Ok(Self {
            scan,
            retention,
            cleanup,
        })
    }
}

#[derive(Serialize)]
struct JsonReport {
    now: chrono::NaiveDateTime,
    groups: Vec<Group>,
    cleanup: CleanupSummary,
    problems: Vec<Problem>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let config = RunConfig::from_cli(&cli).wrap_err("Invalid configuration")?;
    let text = cli.format == OutputFormat::Text;

    // Every age in this run is measured against the same instant.
    let now = chrono::Local::now().naive_local();
    let problems = ProblemLog::new();

    if cli.verbose {
        for dir in &config.scan.roots {
            eprintln!("Scanning {}...", dir.display());
        }
    }
    let scan_config = config.scan.clone();
    let report = tokio::task::spawn_blocking(move || DirScanner::new().scan(&scan_config))
        .await
        .wrap_err("Scan task failed")?
        .wrap_err("Scan failed")?;
    for warning in report.warnings {
        problems.record(warning.into());
    }

    let analyzer = RetentionAnalyzer::new(config.retention, now);
    let executor = CleanupExecutor::new(config.cleanup);
    let mut summary = CleanupSummary::default();
    let mut decided: Vec<Group> = Vec::new();

    for unit in scope_units(report.listings, config.scan.scope) {
        for group in analyzer.analyze(&unit, &problems) {
            if text && cli.verbose {
                println!("{}", render::group_header(&group));
            }

            for record in group.oldest_first() {
                if text && (cli.verbose || record.state == State::Old) {
                    println!("{}", render::record_line(record));
                }
                if record.state != State::Old || !executor.options().has_action() {
                    continue;
                }

                let result = executor.cleanup(&record.path).await;
                summary.record(&result);
                if let Err(err) = result {
                    problems.record(err.into());
                }
                if executor.options().verbose && executor.options().command.is_some() {
                    println!();
                }
            }

            if !text {
                decided.push(group);
            }
        }
    }

    tracing::debug!(
        deleted = summary.deleted,
        already_absent = summary.already_absent,
        commands_failed = summary.commands_failed,
        "cleanup finished"
    );

    if !text {
        let report = JsonReport {
            now,
            groups: decided,
            cleanup: summary,
            problems: problems.snapshot(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if problems.has_problems() {
        eprintln!(
            "{}",
            "Warning: some errors have occurred during this run; see above for details.".red()
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
