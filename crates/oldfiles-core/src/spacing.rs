//! Spacing functions: the minimum age gap required between two kept files.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

static LIST_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[(?P<limit>[\d.]+),(?P<value>[\d.]+)(?P<rel>age)?\]")
        .expect("spacing list entry regex compiles")
});

/// One row of a spacing table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingEntry {
    /// The entry applies to files at least this many days old.
    pub min_age: f64,
    /// Spacing in days, or a factor of the age when `relative` is set.
    pub value: f64,
    /// Whether `value` is multiplied by the age.
    pub relative: bool,
}

impl SpacingEntry {
    /// A fixed spacing from `min_age` on.
    pub fn fixed(min_age: f64, value: f64) -> Self {
        Self {
            min_age,
            value,
            relative: false,
        }
    }

    /// A spacing proportional to age from `min_age` on.
    pub fn relative(min_age: f64, factor: f64) -> Self {
        Self {
            min_age,
            value: factor,
            relative: true,
        }
    }
}

/// Mapping from a file's age (in days) to the minimum spacing (in days) to
/// its kept neighbours.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum SpacingFunction {
    /// No spacing requirement.
    #[default]
    None,
    /// The same spacing at every age.
    Fixed(f64),
    /// Entries sorted by ascending `min_age`.
    Table(Vec<SpacingEntry>),
}

impl SpacingFunction {
    /// A constant spacing.
    pub fn fixed(days: f64) -> Self {
        Self::Fixed(days)
    }

    /// A table of entries; order does not matter.
    pub fn table(mut entries: Vec<SpacingEntry>) -> Self {
        entries.sort_by(|a, b| a.min_age.total_cmp(&b.min_age));
        Self::Table(entries)
    }

    /// The spacing required at `age`.
    ///
    /// For tables this is the entry with the greatest `min_age` not above
    /// `age`, or 0 when every entry starts later.
    pub fn spacing_at(&self, age: f64) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Fixed(days) => *days,
            Self::Table(entries) => entries
                .iter()
                .rev()
                .find(|entry| entry.min_age <= age)
                .map_or(0.0, |entry| {
                    if entry.relative {
                        entry.value * age
                    } else {
                        entry.value
                    }
                }),
        }
    }
}

impl FromStr for SpacingFunction {
    type Err = ConfigError;

    /// Parse `fixed:<days>` or `list:[<limit>,<value>[age]]...`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(value) = strip_prefix_ignore_case(s, "fixed:") {
            let days: f64 = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::spacing("the fixed value should be a number"))?;
            if days.is_nan() {
                return Err(ConfigError::spacing("the fixed value should be a number"));
            }
            return Ok(Self::fixed(days));
        }

        if let Some(list) = strip_prefix_ignore_case(s, "list:") {
            let mut entries = Vec::new();
            let mut cursor = 0;
            for caps in LIST_ENTRY_RE.captures_iter(list) {
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                if whole.start != cursor {
                    return Err(extraneous(&list[cursor..whole.start]));
                }
                cursor = whole.end;

                let limit = parse_number(&caps["limit"])?;
                let value = parse_number(&caps["value"])?;
                entries.push(SpacingEntry {
                    min_age: limit,
                    value,
                    relative: caps.name("rel").is_some(),
                });
            }
            if cursor != list.len() {
                return Err(extraneous(&list[cursor..]));
            }
            return Ok(Self::table(entries));
        }

        Err(ConfigError::spacing(format!(
            "expected \"fixed:<days>\" or \"list:[<age>,<days>]...\", got \"{s}\""
        )))
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn parse_number(text: &str) -> Result<f64, ConfigError> {
    text.parse()
        .map_err(|_| ConfigError::spacing(format!("\"{text}\" is not a number")))
}

fn extraneous(text: &str) -> ConfigError {
    ConfigError::spacing(format!(
        "extraneous characters in the list specifier: \"{text}\""
    ))
}
