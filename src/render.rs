//! Console rendering of groups and records.

use std::path::MAIN_SEPARATOR;

use crossterm::style::{Color, Stylize};

use oldfiles_core::{Decoration, DecorationTag, FileRecord, Group, State};

/// `Group: <key>` header.
pub fn group_header(group: &Group) -> String {
    format!("{}{}", "Group: ".cyan(), group.key)
}

/// One indented line per record: path, age and decision.
pub fn record_line(record: &FileRecord) -> String {
    let (label, color) = state_label(record);
    format!(
        "  {}, {:.1} days old, {}",
        colored_path(record),
        record.age,
        label.with(color)
    )
}

fn state_label(record: &FileRecord) -> (&'static str, Color) {
    if record.always_keep {
        ("always-keep", Color::Cyan)
    } else if record.state == State::Old {
        ("remove", Color::Red)
    } else {
        ("keep", Color::Green)
    }
}

fn colored_path(record: &FileRecord) -> String {
    let mut out = String::new();
    if let Some(parent) = record.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let dir = parent.display().to_string();
        let dir = if dir.ends_with(MAIN_SEPARATOR) {
            dir
        } else {
            format!("{dir}{MAIN_SEPARATOR}")
        };
        out.push_str(&dir.dark_grey().to_string());
    }
    for (text, tag) in name_segments(&record.name, &record.decorations) {
        let styled = match tag {
            Some(DecorationTag::Timestamp) => text.white(),
            Some(DecorationTag::Group) => text.yellow(),
            None => text.dark_grey(),
        };
        out.push_str(&styled.to_string());
    }
    out
}

/// Split `name` into plain and decorated segments.
///
/// Decorations must be sorted by start; where two overlap, the earlier one
/// wins for the shared part.
pub fn name_segments<'a>(
    name: &'a str,
    decorations: &[Decoration],
) -> Vec<(&'a str, Option<DecorationTag>)> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for decoration in decorations {
        let start = decoration.range.start.max(cursor);
        let end = decoration.range.end.min(name.len());
        if start >= end {
            continue;
        }
        let (Some(gap), Some(span)) = (name.get(cursor..start), name.get(start..end)) else {
            continue;
        };
        if !gap.is_empty() {
            segments.push((gap, None));
        }
        segments.push((span, Some(decoration.tag)));
        cursor = end;
    }

    if let Some(rest) = name.get(cursor..).filter(|rest| !rest.is_empty()) {
        segments.push((rest, None));
    }
    segments
}
