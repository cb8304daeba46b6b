//! Timestamp extraction from file names.

use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use regex::Match;

use oldfiles_core::{
    Decoration, DecorationTag, ExtractError, FileRecord, Problem, ProblemKind, ProblemLog,
    TimestampField, TimestampPattern,
};

/// Timestamp, grouping key and highlights pulled out of one file name.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The point in time encoded in the name.
    pub timestamp: NaiveDateTime,
    /// Key shared by every variant of the same file.
    pub bare_name: String,
    /// Matched spans, sorted by position.
    pub decorations: Vec<Decoration>,
}

/// First participating match for each timestamp field.
#[derive(Default)]
struct Components<'h> {
    year: Option<Match<'h>>,
    month: Option<Match<'h>>,
    day: Option<Match<'h>>,
    hour: Option<Match<'h>>,
    minute: Option<Match<'h>>,
    second: Option<Match<'h>>,
}

impl<'h> Components<'h> {
    fn slot(&mut self, field: TimestampField) -> Option<&mut Option<Match<'h>>> {
        match field {
            TimestampField::Year => Some(&mut self.year),
            TimestampField::Month => Some(&mut self.month),
            TimestampField::Day => Some(&mut self.day),
            TimestampField::Hour => Some(&mut self.hour),
            TimestampField::Minute => Some(&mut self.minute),
            TimestampField::Second => Some(&mut self.second),
            TimestampField::Group => None,
        }
    }

    fn describe(&self) -> String {
        let text = |m: &Option<Match<'_>>| m.map_or("", |m| m.as_str()).to_string();
        let mut out = format!(
            "y {}, m {}, d {}",
            text(&self.year),
            text(&self.month),
            text(&self.day)
        );
        if let Some(hour) = self.hour {
            out.push_str(", time ");
            out.push_str(hour.as_str());
            for part in [self.minute, self.second].into_iter().flatten() {
                out.push(':');
                out.push_str(part.as_str());
            }
        }
        out
    }
}

/// Match `file_name` against `pattern`.
///
/// Returns `Ok(None)` when the name carries no timestamp: either the
/// pattern does not match, or it matches without any date component.
pub fn extract(
    file_name: &str,
    pattern: &TimestampPattern,
) -> Result<Option<Extraction>, ExtractError> {
    let Some(caps) = pattern.regex().captures(file_name) else {
        return Ok(None);
    };

    let mut components = Components::default();
    let mut timestamp_spans: Vec<Range<usize>> = Vec::new();
    let mut group_matches: Vec<Match<'_>> = Vec::new();

    for &(index, field) in pattern.fields() {
        let Some(m) = caps.get(index) else {
            continue;
        };
        match components.slot(field) {
            Some(slot) => {
                timestamp_spans.push(m.range());
                if slot.is_none() {
                    *slot = Some(m);
                }
            }
            None => group_matches.push(m),
        }
    }

    let date_parts = [components.year, components.month, components.day]
        .iter()
        .filter(|m| m.is_some())
        .count();
    match date_parts {
        0 => return Ok(None),
        3 => {}
        _ => return Err(ExtractError::PartialDate),
    }

    if (components.second.is_some() && components.minute.is_none())
        || (components.minute.is_some() && components.hour.is_none())
    {
        return Err(ExtractError::PartialTime);
    }

    let timestamp = build_timestamp(&components).ok_or_else(|| ExtractError::InvalidTimestamp {
        components: components.describe(),
    })?;

    group_matches.sort_by_key(|m| m.start());
    let bare_name = if group_matches.is_empty() {
        remove_spans(file_name, &timestamp_spans)
    } else {
        group_matches.iter().map(|m| m.as_str()).collect()
    };

    let mut decorations: Vec<Decoration> = timestamp_spans
        .iter()
        .map(|span| Decoration::new(span.clone(), DecorationTag::Timestamp))
        .chain(
            group_matches
                .iter()
                .map(|m| Decoration::new(m.range(), DecorationTag::Group)),
        )
        .collect();
    decorations.sort_by_key(|d| (d.range.start, d.range.end));

    Ok(Some(Extraction {
        timestamp,
        bare_name,
        decorations,
    }))
}

fn build_timestamp(components: &Components<'_>) -> Option<NaiveDateTime> {
    fn number<T: std::str::FromStr>(m: Option<Match<'_>>) -> Option<Option<T>> {
        match m {
            Some(m) => m.as_str().parse().ok().map(Some),
            None => Some(None),
        }
    }

    let mut year: i32 = number(components.year)??;
    let month: u32 = number(components.month)??;
    let day: u32 = number(components.day)??;
    if year < 100 {
        year += if year < 80 { 2000 } else { 1900 };
    }
    let hour: u32 = number(components.hour)?.unwrap_or(0);
    let minute: u32 = number(components.minute)?.unwrap_or(0);
    let second: u32 = number(components.second)?.unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Remove every span from `name`.
///
/// Text between two removed spans that holds no letters or digits is a
/// separator of the timestamp and goes with them.
fn remove_spans(name: &str, spans: &[Range<usize>]) -> String {
    let mut spans: Vec<Range<usize>> = spans.to_vec();
    spans.sort_by_key(|s| s.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        if let Some(last) = merged.last_mut() {
            let between = name.get(last.end.min(span.start)..span.start).unwrap_or("");
            if span.start <= last.end || !between.chars().any(char::is_alphanumeric) {
                last.end = last.end.max(span.end);
                continue;
            }
        }
        merged.push(span);
    }

    let mut bare = String::with_capacity(name.len());
    let mut cursor = 0;
    for span in merged {
        bare.push_str(&name[cursor..span.start]);
        cursor = span.end;
    }
    bare.push_str(&name[cursor..]);
    bare
}

/// Build a record for `path`, or `None` if its name carries no timestamp.
pub fn extract_record(
    path: &Path,
    pattern: &TimestampPattern,
    now: NaiveDateTime,
) -> Result<Option<FileRecord>, ExtractError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(extract(&name, pattern)?.map(|extraction| {
        FileRecord::new(path, name.as_str(), extraction.timestamp, extraction.bare_name, now)
            .with_decorations(extraction.decorations)
    }))
}

/// Build records for every path that carries a timestamp.
///
/// Extraction errors are recorded in `problems` and the file is skipped.
pub fn extract_records(
    paths: &[PathBuf],
    pattern: &TimestampPattern,
    now: NaiveDateTime,
    problems: &ProblemLog,
) -> Vec<FileRecord> {
    paths
        .iter()
        .filter_map(|path| match extract_record(path, pattern, now) {
            Ok(record) => record,
            Err(err) => {
                problems.record(Problem::new(
                    path,
                    format!("{err}. File {}", path.display()),
                    ProblemKind::Extraction,
                ));
                None
            }
        })
        .collect()
}
