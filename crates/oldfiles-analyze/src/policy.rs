//! Retention policy and the per-unit analysis pipeline.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use rayon::prelude::*;

use oldfiles_core::{Group, ProblemLog, RetentionConfig, State};

use crate::classify::seed_states;
use crate::extract::extract_records;
use crate::group::group_records;
use crate::thinning::apply_spacing;

/// Decides which records of a group to keep.
#[derive(Debug, Clone, Default)]
pub struct RetentionPolicy {
    config: RetentionConfig,
}

impl RetentionPolicy {
    /// Create a policy from a retention config.
    pub fn new(config: RetentionConfig) -> Self {
        Self { config }
    }

    /// The underlying config.
    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    /// Decide every record of `group`.
    pub fn classify(&self, group: &mut Group) {
        seed_states(group, &self.config);
        apply_spacing(&mut group.records, &self.config.spacing);

        tracing::debug!(
            group = %group.key,
            keep = group.count(State::Keep),
            old = group.count(State::Old),
            "group classified"
        );
    }

    /// Decide every record of every group. Groups are independent and are
    /// classified in parallel.
    pub fn classify_all(&self, groups: &mut [Group]) {
        groups.par_iter_mut().for_each(|group| self.classify(group));
    }
}

/// Extracts, groups and classifies the files of one scope unit.
///
/// Ages are measured against the single `now` given at construction so
/// that every file of a run shares the same reference time.
#[derive(Debug, Clone)]
pub struct RetentionAnalyzer {
    policy: RetentionPolicy,
    now: NaiveDateTime,
}

impl RetentionAnalyzer {
    /// Create an analyzer for a run started at `now`.
    pub fn new(config: RetentionConfig, now: NaiveDateTime) -> Self {
        Self {
            policy: RetentionPolicy::new(config),
            now,
        }
    }

    /// Reference time of the run.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// The policy applied to each group.
    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// Classify the files of one scope unit.
    ///
    /// Files without a timestamp are ignored; extraction errors go to
    /// `problems`. Groups come back in first-seen order.
    pub fn analyze(&self, files: &[PathBuf], problems: &ProblemLog) -> Vec<Group> {
        let records = extract_records(files, &self.policy.config().pattern, self.now, problems);
        let mut groups = group_records(records);
        self.policy.classify_all(&mut groups);
        groups
    }
}
