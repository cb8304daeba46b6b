//! Scope units and grouping by bare name.

use std::path::PathBuf;

use compact_str::CompactString;
use indexmap::IndexMap;

use oldfiles_core::{DirListing, FileRecord, Group, GroupScope};

/// Split listings into the units that are grouped independently.
///
/// Per-directory scope yields one unit per listing; unified scope pools
/// every file into a single unit. Empty units are skipped.
pub fn scope_units(listings: Vec<DirListing>, scope: GroupScope) -> Vec<Vec<PathBuf>> {
    let units: Vec<Vec<PathBuf>> = match scope {
        GroupScope::PerDirectory => listings.into_iter().map(|l| l.files).collect(),
        GroupScope::Unified => vec![listings.into_iter().flat_map(|l| l.files).collect()],
    };
    units.into_iter().filter(|unit| !unit.is_empty()).collect()
}

/// Partition records by bare name, keeping the order keys were first seen.
pub fn group_records(records: impl IntoIterator<Item = FileRecord>) -> Vec<Group> {
    let mut groups: IndexMap<CompactString, Group> = IndexMap::new();
    for record in records {
        match groups.get_mut(&record.bare_name) {
            Some(group) => group.push(record),
            None => {
                groups.insert(record.bare_name.clone(), Group::new(record));
            }
        }
    }
    groups.into_values().collect()
}
