//! Timestamp capture patterns.
//!
//! A pattern is a regular expression whose named groups say where the
//! timestamp components sit inside a file name:
//!
//! | Group | Meaning | Required |
//! |-------|---------|----------|
//! | `y`   | year (two or four digits) | yes |
//! | `m`   | month | yes |
//! | `d`   | day | yes |
//! | `th`  | hour | no |
//! | `tm`  | minute | only with `th` |
//! | `ts`  | second | only with `tm` |
//! | `g`   | grouping key part, may repeat | no |
//!
//! The regex crate rejects duplicate group names, so a name may carry a
//! `_<suffix>` to spell out alternatives of the same field: `th` and `th_2`
//! are both hour groups, `g_1` and `g_2` both contribute to the grouping key.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

/// Pattern used when none is configured.
///
/// Matches `YYYY-MM-DD`, `YYYY-MM-DD.hh-mm[-ss]` and `YYYY-MM-DD hhmm[ss]`.
pub const DEFAULT_TIMESTAMP_PATTERN: &str = r"
    (?P<y>\d{4})-(?P<m>\d{2})-(?P<d>\d{2})
    (
        (\.+(?P<th>\d{2})-(?P<tm>\d{2})(-(?P<ts>\d{2}))?)
      | (\s+(?P<th_2>\d{2})(?P<tm_2>\d{2})(?P<ts_2>\d{2})?)
    )?";

/// The component a named capture group stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    /// Part of the grouping key rather than the timestamp.
    Group,
}

impl TimestampField {
    /// Map a capture group name to its field, ignoring any `_<suffix>`.
    pub fn from_group_name(name: &str) -> Option<Self> {
        let base = name.split_once('_').map_or(name, |(base, _)| base);
        match base {
            "y" => Some(Self::Year),
            "m" => Some(Self::Month),
            "d" => Some(Self::Day),
            "th" => Some(Self::Hour),
            "tm" => Some(Self::Minute),
            "ts" => Some(Self::Second),
            "g" => Some(Self::Group),
            _ => None,
        }
    }
}

/// A validated timestamp pattern.
#[derive(Clone)]
pub struct TimestampPattern {
    regex: Regex,
    fields: Vec<(usize, TimestampField)>,
}

impl TimestampPattern {
    /// Compile a user-supplied pattern (case-insensitive) and validate its groups.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        Self::from_regex(user_regex("timestamp", pattern)?)
    }

    /// The built-in pattern, see [`DEFAULT_TIMESTAMP_PATTERN`].
    pub fn default_pattern() -> Self {
        let regex = RegexBuilder::new(DEFAULT_TIMESTAMP_PATTERN)
            .ignore_whitespace(true)
            .dot_matches_new_line(true)
            .build()
            .expect("default timestamp pattern compiles");
        Self::from_regex(regex).expect("default timestamp pattern has the date groups")
    }

    /// Validate the named groups of an already compiled regex.
    pub fn from_regex(regex: Regex) -> Result<Self, ConfigError> {
        let fields: Vec<(usize, TimestampField)> = regex
            .capture_names()
            .enumerate()
            .filter_map(|(index, name)| {
                name.and_then(TimestampField::from_group_name)
                    .map(|field| (index, field))
            })
            .collect();

        let has = |wanted: TimestampField| fields.iter().any(|&(_, field)| field == wanted);

        if !has(TimestampField::Year) || !has(TimestampField::Month) || !has(TimestampField::Day) {
            return Err(ConfigError::MissingDateGroups);
        }
        if (has(TimestampField::Minute) && !has(TimestampField::Hour))
            || (has(TimestampField::Second) && !has(TimestampField::Minute))
        {
            return Err(ConfigError::InvalidTimeGroups);
        }

        Ok(Self { regex, fields })
    }

    /// The compiled regex.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Capture group indices paired with the field they stand for, in group order.
    pub fn fields(&self) -> &[(usize, TimestampField)] {
        &self.fields
    }

    /// Whether the pattern declares any grouping captures.
    pub fn has_group_captures(&self) -> bool {
        self.fields
            .iter()
            .any(|&(_, field)| field == TimestampField::Group)
    }
}

impl Default for TimestampPattern {
    fn default() -> Self {
        Self::default_pattern()
    }
}

impl fmt::Debug for TimestampPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TimestampPattern")
            .field(&self.regex.as_str())
            .finish()
    }
}

/// Compile a user-supplied regex the way every option expects it:
/// case-insensitive, with `.` matching newlines.
pub fn user_regex(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|source| ConfigError::InvalidRegex { field, source })
}
