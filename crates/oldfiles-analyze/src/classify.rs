//! Pre-seeding from the always-keep pattern and the maximum age.

use oldfiles_core::{Group, RetentionConfig, State};

/// Decide the records that need no spacing.
///
/// Records matching the always-keep pattern become `Keep`; the rest that
/// are older than the maximum age become `Old`. Decided records are left
/// untouched.
pub fn seed_states(group: &mut Group, config: &RetentionConfig) {
    for record in group.records.iter_mut() {
        if record.state.is_terminal() {
            continue;
        }
        if config.is_always_keep(&record.path) {
            record.decide(State::Keep);
            record.always_keep = true;
        } else if record.age > config.max_age {
            record.decide(State::Old);
        }
    }
}
