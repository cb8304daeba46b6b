//! Spacing-based thinning.
//!
//! Candidates are visited from youngest to oldest. The youngest eligible
//! one is kept, and from then on each candidate waits as `pending` until
//! the next one is seen: if skipping it would open a gap wider than the
//! spacing required at either end, it is kept, otherwise it becomes old.
//! The oldest candidate is always kept.

use oldfiles_core::{FileRecord, SpacingFunction, State};

/// Something with an age that can be kept or thinned out.
pub trait Candidate {
    /// Age in days.
    fn age(&self) -> f64;
    /// Current decision.
    fn state(&self) -> State;
    /// Record a decision. Decided candidates keep their state.
    fn set_state(&mut self, state: State);
}

impl Candidate for FileRecord {
    fn age(&self) -> f64 {
        self.age
    }

    fn state(&self) -> State {
        self.state
    }

    fn set_state(&mut self, state: State) {
        self.decide(state);
    }
}

/// Walk state: the last kept candidate and the one awaiting a decision.
#[derive(Debug, Default, Clone, Copy)]
struct ThinningState {
    prev_keep: Option<usize>,
    pending: Option<usize>,
}

impl ThinningState {
    fn visit<T: Candidate>(&mut self, items: &mut [T], cur: usize, spacing: &SpacingFunction) {
        let Some(keep) = self.prev_keep else {
            items[cur].set_state(State::Keep);
            self.prev_keep = Some(cur);
            return;
        };

        if let Some(pending) = self.pending.take() {
            let gap = items[cur].age() - items[keep].age();
            let keep_spacing = spacing.spacing_at(items[keep].age());
            let cur_spacing = spacing.spacing_at(items[cur].age());
            let needed = gap > keep_spacing || gap > cur_spacing;

            tracing::trace!(
                gap,
                keep_spacing,
                cur_spacing,
                age = items[pending].age(),
                keep = needed,
                "pending candidate resolved"
            );

            if needed {
                items[pending].set_state(State::Keep);
                self.prev_keep = Some(pending);
            } else {
                items[pending].set_state(State::Old);
            }
        }

        if items[cur].state() == State::Keep {
            self.prev_keep = Some(cur);
        } else {
            self.pending = Some(cur);
        }
    }

    fn finish<T: Candidate>(self, items: &mut [T]) {
        if let Some(pending) = self.pending {
            items[pending].set_state(State::Keep);
        }
    }
}

/// Decide every undecided candidate in `items` by spacing.
///
/// Candidates already `Old` are ignored; ones already `Keep` anchor the
/// gaps around them. Afterwards no candidate is `Undecided`.
pub fn apply_spacing<T: Candidate>(items: &mut [T], spacing: &SpacingFunction) {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[a].age().total_cmp(&items[b].age()));

    let mut state = ThinningState::default();
    for cur in order {
        if items[cur].state() == State::Old {
            continue;
        }
        state.visit(items, cur, spacing);
    }
    state.finish(items);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Item {
        age: f64,
        state: State,
    }

    impl Candidate for Item {
        fn age(&self) -> f64 {
            self.age
        }
        fn state(&self) -> State {
            self.state
        }
        fn set_state(&mut self, state: State) {
            if !self.state.is_terminal() {
                self.state = state;
            }
        }
    }

    fn items(ages: &[f64]) -> Vec<Item> {
        ages.iter()
            .map(|&age| Item {
                age,
                state: State::Undecided,
            })
            .collect()
    }

    fn states(items: &[Item]) -> Vec<State> {
        items.iter().map(|i| i.state).collect()
    }

    use State::{Keep, Old};

    #[test]
    fn test_empty_and_single() {
        let mut none: Vec<Item> = Vec::new();
        apply_spacing(&mut none, &SpacingFunction::fixed(10.0));

        let mut one = items(&[5.0]);
        apply_spacing(&mut one, &SpacingFunction::fixed(10.0));
        assert_eq!(states(&one), vec![Keep]);
    }

    #[test]
    fn test_no_spacing_keeps_everything() {
        let mut all = items(&[3.0, 1.0, 2.0, 2.0]);
        apply_spacing(&mut all, &SpacingFunction::None);
        assert_eq!(states(&all), vec![Keep; 4]);
    }

    #[test]
    fn test_fixed_spacing_thins_in_between() {
        let mut all = items(&[29.0, 21.0, 26.0, 24.0]);
        apply_spacing(&mut all, &SpacingFunction::fixed(10.0));
        assert_eq!(states(&all), vec![Keep, Keep, Old, Old]);
    }

    #[test]
    fn test_wide_gaps_keep_all() {
        let mut all = items(&[0.0, 11.0, 22.0]);
        apply_spacing(&mut all, &SpacingFunction::fixed(10.0));
        assert_eq!(states(&all), vec![Keep, Keep, Keep]);
    }

    #[test]
    fn test_old_candidates_are_skipped() {
        let mut all = items(&[1.0, 2.0, 3.0]);
        all[2].state = Old;
        apply_spacing(&mut all, &SpacingFunction::fixed(10.0));
        assert_eq!(states(&all), vec![Keep, Keep, Old]);
    }

    #[test]
    fn test_kept_candidate_anchors_gap() {
        let mut all = items(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        all[2].state = Keep;
        apply_spacing(&mut all, &SpacingFunction::fixed(10.0));
        assert_eq!(states(&all), vec![Keep, Old, Keep, Old, Keep]);
    }

    #[test]
    fn test_decreasing_table_uses_smaller_neighbour_spacing() {
        let mut all = items(&[0.0, 2.0, 3.0, 5.0]);
        let spacing: SpacingFunction = "list:[0,10][4,1]".parse().unwrap();
        apply_spacing(&mut all, &spacing);
        assert_eq!(states(&all), vec![Keep, Old, Keep, Keep]);
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let mut all = items(&[0.5, 3.0, 4.0, 9.0, 15.0, 16.0, 40.0]);
        let spacing = SpacingFunction::fixed(5.0);
        apply_spacing(&mut all, &spacing);
        let first = states(&all);
        apply_spacing(&mut all, &spacing);
        assert_eq!(states(&all), first);
    }
}
