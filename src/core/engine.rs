//! Scribe-proposing deferred acceptance with lecturer quotas.
//!
//! ## Matching Rules
//!
//! - Free scribes wait in a FIFO ready-queue, seeded in scribe input order.
//! - A scribe proposes to the lecturer at its pointer and the pointer advances.
//! - A lecturer holds proposals tentatively. When over quota it drops the
//!   scribe it ranks lowest; that scribe rejoins the back of the queue and
//!   resumes from its pointer.
//! - The loop ends when the queue is empty, i.e. every scribe is held or has
//!   exhausted its list. At most `sum(|scribe list|)` proposals are made.
//!
//! ## Example
//!
//! ```
//! use scribe_match::core::engine::MatchingEngine;
//! use scribe_match::core::preferences::PreferenceModel;
//! use scribe_match::domain::model::{LecturerEntry, PreferenceInput, ScribeEntry};
//!
//! let input = PreferenceInput {
//!     scribes: vec![
//!         ScribeEntry::new("Alice", ["Prof_A"]),
//!         ScribeEntry::new("Bob", ["Prof_A"]),
//!     ],
//!     lecturers: vec![LecturerEntry::new("Prof_A", 1)],
//! };
//!
//! let model = PreferenceModel::build(&input).unwrap();
//! let outcome = MatchingEngine::new().run(&model);
//!
//! assert_eq!(outcome.assignment.lecturer_of("Alice"), Some("Prof_A"));
//! assert_eq!(outcome.assignment.unassigned, vec!["Bob".to_string()]);
//! ```

use crate::core::preferences::PreferenceModel;
use crate::domain::model::{Assignment, LecturerAllocation, MatchStats};
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub assignment: Assignment,
    pub stats: MatchStats,
}

/// Stateless; every call to [`MatchingEngine::run`] owns its own proposal state.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingEngine;

/// Per-run proposal state. Dropped when the assignment is built.
struct ProposalState {
    /// scribe -> index of the next lecturer to propose to
    next: Vec<usize>,
    /// lecturer -> (lecturer's rank of scribe -> scribe)
    held: Vec<BTreeMap<usize, usize>>,
    ready: VecDeque<usize>,
    stats: MatchStats,
}

impl ProposalState {
    fn new(model: &PreferenceModel) -> Self {
        Self {
            next: vec![0; model.scribe_count()],
            held: vec![BTreeMap::new(); model.lecturer_count()],
            ready: (0..model.scribe_count()).collect(),
            stats: MatchStats::default(),
        }
    }
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, model: &PreferenceModel) -> MatchOutcome {
        let mut state = ProposalState::new(model);

        while let Some(s) = state.ready.pop_front() {
            let list = model.scribe_list(s);
            let Some(&l) = list.get(state.next[s]) else {
                // 清單已用完，維持未分配
                tracing::debug!("Scribe '{}' exhausted its preference list", model.scribe_name(s));
                continue;
            };
            state.next[s] += 1;
            state.stats.proposals += 1;

            let Some(rank) = model.lecturer_rank_of(l, s) else {
                state.stats.rejections += 1;
                state.ready.push_front(s);
                continue;
            };

            let held = &mut state.held[l];
            held.insert(rank, s);
            if held.len() <= model.quota_of(l) {
                continue;
            }

            if let Some((_, dropped)) = held.pop_last() {
                if dropped == s {
                    state.stats.rejections += 1;
                    state.ready.push_front(s);
                } else {
                    state.stats.displacements += 1;
                    tracing::debug!(
                        "Lecturer '{}' displaced '{}' in favour of '{}'",
                        model.lecturer_name(l),
                        model.scribe_name(dropped),
                        model.scribe_name(s)
                    );
                    state.ready.push_back(dropped);
                }
            }
        }

        debug_assert!(state.stats.proposals <= model.total_preference_length());

        let assignment = build_assignment(model, &state.held);
        tracing::info!(
            "Matching finished: {} proposals, {} rejections, {} displacements",
            state.stats.proposals,
            state.stats.rejections,
            state.stats.displacements
        );

        MatchOutcome {
            assignment,
            stats: state.stats,
        }
    }
}

fn build_assignment(model: &PreferenceModel, held: &[BTreeMap<usize, usize>]) -> Assignment {
    let mut matched = vec![false; model.scribe_count()];

    let allocations = held
        .iter()
        .enumerate()
        .map(|(l, set)| {
            let mut scribes: Vec<usize> = set.values().copied().collect();
            scribes.sort_unstable();
            for &s in &scribes {
                matched[s] = true;
            }
            LecturerAllocation {
                lecturer: model.lecturer_name(l).to_string(),
                quota: model.quota_of(l),
                scribes: scribes
                    .into_iter()
                    .map(|s| model.scribe_name(s).to_string())
                    .collect(),
            }
        })
        .collect();

    let unassigned = matched
        .iter()
        .enumerate()
        .filter_map(|(s, &is_matched)| (!is_matched).then(|| model.scribe_name(s).to_string()))
        .collect();

    Assignment {
        allocations,
        unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{LecturerEntry, PreferenceInput, ScribeEntry};

    fn run(input: PreferenceInput) -> MatchOutcome {
        let model = PreferenceModel::build(&input).unwrap();
        MatchingEngine::new().run(&model)
    }

    #[test]
    fn test_each_scribe_gets_first_choice_without_conflict() {
        let outcome = run(PreferenceInput {
            scribes: vec![
                ScribeEntry::new("Alice", ["Prof_A", "Prof_B"]),
                ScribeEntry::new("Bob", ["Prof_B", "Prof_A"]),
            ],
            lecturers: vec![LecturerEntry::new("Prof_A", 1), LecturerEntry::new("Prof_B", 1)],
        });

        assert_eq!(outcome.assignment.lecturer_of("Alice"), Some("Prof_A"));
        assert_eq!(outcome.assignment.lecturer_of("Bob"), Some("Prof_B"));
        assert!(outcome.assignment.unassigned.is_empty());
        assert_eq!(outcome.stats.proposals, 2);
        assert_eq!(outcome.stats.displacements, 0);
    }

    #[test]
    fn test_input_order_breaks_contention() {
        let outcome = run(PreferenceInput {
            scribes: vec![
                ScribeEntry::new("Alice", ["Prof_A"]),
                ScribeEntry::new("Bob", ["Prof_A"]),
            ],
            lecturers: vec![LecturerEntry::new("Prof_A", 1)],
        });

        assert_eq!(outcome.assignment.lecturer_of("Alice"), Some("Prof_A"));
        assert_eq!(outcome.assignment.unassigned, vec!["Bob".to_string()]);
        assert_eq!(outcome.stats.rejections, 1);
    }

    #[test]
    fn test_quota_larger_than_demand_leaves_lecturer_under_filled() {
        let outcome = run(PreferenceInput {
            scribes: vec![ScribeEntry::new("Alice", ["Prof_A"])],
            lecturers: vec![LecturerEntry::new("Prof_A", 2)],
        });

        assert_eq!(outcome.assignment.lecturer_of("Alice"), Some("Prof_A"));
        let under = outcome.assignment.under_filled();
        assert_eq!(under.len(), 1);
        assert_eq!(under[0].remaining, 1);
    }

    #[test]
    fn test_empty_preference_list_leaves_scribe_unassigned() {
        let outcome = run(PreferenceInput {
            scribes: vec![
                ScribeEntry::new("Alice", Vec::<String>::new()),
                ScribeEntry::new("Bob", ["Prof_A"]),
            ],
            lecturers: vec![LecturerEntry::new("Prof_A", 1)],
        });

        assert_eq!(outcome.assignment.unassigned, vec!["Alice".to_string()]);
        assert_eq!(outcome.assignment.lecturer_of("Bob"), Some("Prof_A"));
        assert_eq!(outcome.stats.proposals, 1);
    }

    #[test]
    fn test_preferred_scribe_displaces_held_one() {
        // Prof_A 比較想要 Bob，Alice 被擠到第二志願
        let outcome = run(PreferenceInput {
            scribes: vec![
                ScribeEntry::new("Alice", ["Prof_A", "Prof_B"]),
                ScribeEntry::new("Bob", ["Prof_A"]),
            ],
            lecturers: vec![
                LecturerEntry::new("Prof_A", 1).with_ranking(["Bob", "Alice"]),
                LecturerEntry::new("Prof_B", 1),
            ],
        });

        assert_eq!(outcome.assignment.lecturer_of("Bob"), Some("Prof_A"));
        assert_eq!(outcome.assignment.lecturer_of("Alice"), Some("Prof_B"));
        assert_eq!(outcome.stats.displacements, 1);
        assert_eq!(outcome.stats.proposals, 3);
    }

    #[test]
    fn test_lecturer_never_accepts_unranked_scribe() {
        let outcome = run(PreferenceInput {
            scribes: vec![
                ScribeEntry::new("Alice", ["Prof_A"]),
                ScribeEntry::new("Bob", ["Prof_A"]),
            ],
            lecturers: vec![LecturerEntry::new("Prof_A", 2).with_ranking(["Bob"])],
        });

        assert_eq!(outcome.assignment.scribes_of("Prof_A"), Some(&["Bob".to_string()][..]));
        assert_eq!(outcome.assignment.unassigned, vec!["Alice".to_string()]);
    }

    #[test]
    fn test_held_scribes_are_listed_in_input_order() {
        let outcome = run(PreferenceInput {
            scribes: vec![
                ScribeEntry::new("Carol", ["Prof_A"]),
                ScribeEntry::new("Alice", ["Prof_A"]),
                ScribeEntry::new("Bob", ["Prof_A"]),
            ],
            lecturers: vec![LecturerEntry::new("Prof_A", 3).with_ranking(["Bob", "Alice", "Carol"])],
        });

        assert_eq!(
            outcome.assignment.scribes_of("Prof_A"),
            Some(&["Carol".to_string(), "Alice".to_string(), "Bob".to_string()][..])
        );
    }

    #[test]
    fn test_empty_inputs_yield_empty_assignment() {
        let outcome = run(PreferenceInput::default());
        assert_eq!(outcome.assignment, Assignment::default());

        let outcome = run(PreferenceInput {
            scribes: vec![],
            lecturers: vec![LecturerEntry::new("Prof_A", 1)],
        });
        assert!(outcome.assignment.unassigned.is_empty());
        assert_eq!(outcome.assignment.under_filled().len(), 1);
    }
}
