//! Candidate file records and the groups they form.

use std::ops::Range;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::spacing::SpacingFunction;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Retention decision for a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Not decided yet.
    #[default]
    Undecided,
    /// Redundant or too old; a candidate for removal.
    Old,
    /// Retained.
    Keep,
}

impl State {
    /// Whether the state is final.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Undecided)
    }
}

/// What a highlighted span of a file name matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorationTag {
    /// A year, month, day, hour, minute or second component.
    Timestamp,
    /// A grouping key capture.
    Group,
}

/// A tagged byte range of a file name, for renderers to highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    /// Byte range within the file name.
    pub range: Range<usize>,
    /// What the range matched.
    pub tag: DecorationTag,
}

impl Decoration {
    /// Create a new decoration.
    pub fn new(range: Range<usize>, tag: DecorationTag) -> Self {
        Self { range, tag }
    }
}

/// Days elapsed from `timestamp` to `now`; negative when `timestamp` lies
/// in the future.
pub fn age_in_days(now: NaiveDateTime, timestamp: NaiveDateTime) -> f64 {
    (now - timestamp).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// A file whose name carries a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Full path of the file.
    pub path: PathBuf,
    /// File name the timestamp was extracted from.
    pub name: CompactString,
    /// Timestamp extracted from the name.
    pub timestamp: NaiveDateTime,
    /// Grouping key shared by all variants of the same file.
    pub bare_name: CompactString,
    /// Age in days relative to the run start.
    pub age: f64,
    /// Retention decision.
    pub state: State,
    /// Set when the Keep decision came from the always-keep pattern.
    #[serde(default)]
    pub always_keep: bool,
    /// Highlighted spans of `name`.
    #[serde(default)]
    pub decorations: Vec<Decoration>,
}

impl FileRecord {
    /// Create an undecided record, computing its age against `now`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<CompactString>,
        timestamp: NaiveDateTime,
        bare_name: impl Into<CompactString>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            timestamp,
            bare_name: bare_name.into(),
            age: age_in_days(now, timestamp),
            state: State::Undecided,
            always_keep: false,
            decorations: Vec::new(),
        }
    }

    /// Attach highlight decorations.
    pub fn with_decorations(mut self, decorations: Vec<Decoration>) -> Self {
        self.decorations = decorations;
        self
    }

    /// Spacing required at this record's age.
    pub fn spacing(&self, spacing: &SpacingFunction) -> f64 {
        spacing.spacing_at(self.age)
    }

    /// Move an undecided record to `state`.
    ///
    /// Terminal states never change; returns whether the state was updated.
    pub fn decide(&mut self, state: State) -> bool {
        if self.state.is_terminal() || !state.is_terminal() {
            return false;
        }
        self.state = state;
        true
    }
}

/// Records sharing a grouping key within one scope unit. Never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// The shared grouping key.
    pub key: CompactString,
    /// Members in scan order.
    pub records: Vec<FileRecord>,
}

impl Group {
    /// Start a group with its first record.
    pub fn new(first: FileRecord) -> Self {
        Self {
            key: first.bare_name.clone(),
            records: vec![first],
        }
    }

    /// Add a record with the same key.
    pub fn push(&mut self, record: FileRecord) {
        debug_assert_eq!(record.bare_name, self.key);
        self.records.push(record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Groups are never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether every record has a terminal state.
    pub fn is_decided(&self) -> bool {
        self.records.iter().all(|r| r.state.is_terminal())
    }

    /// Number of records in `state`.
    pub fn count(&self, state: State) -> usize {
        self.records.iter().filter(|r| r.state == state).count()
    }

    /// Records from oldest to newest; ties keep scan order.
    pub fn oldest_first(&self) -> Vec<&FileRecord> {
        let mut records: Vec<&FileRecord> = self.records.iter().collect();
        records.sort_by(|a, b| b.age.total_cmp(&a.age));
        records
    }
}

/// Files found directly inside one scanned directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirListing {
    /// The directory.
    pub dir: PathBuf,
    /// Files in walk order.
    pub files: Vec<PathBuf>,
}

impl DirListing {
    /// Create an empty listing for `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
        }
    }
}
