//! Post-condition checks for a finished assignment.
//!
//! Verifies quota respect, that every scribe is accounted for exactly once,
//! that every pair is mutually acceptable, and that no blocking pair exists.

use crate::core::preferences::PreferenceModel;
use crate::domain::model::Assignment;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StabilityViolation {
    QuotaExceeded { lecturer: String, held: usize, quota: usize },
    MultipleAssignment { scribe: String },
    UnknownAssignment { scribe: String, lecturer: String },
    UnaccountedScribe { scribe: String },
    UnacceptablePair { scribe: String, lecturer: String },
    /// Both would rather be matched to each other than keep their current state.
    BlockingPair { scribe: String, lecturer: String },
}

impl fmt::Display for StabilityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StabilityViolation::QuotaExceeded { lecturer, held, quota } => {
                write!(f, "lecturer '{}' holds {} scribes but has quota {}", lecturer, held, quota)
            }
            StabilityViolation::MultipleAssignment { scribe } => {
                write!(f, "scribe '{}' appears more than once", scribe)
            }
            StabilityViolation::UnknownAssignment { scribe, lecturer } => {
                write!(f, "pair ('{}', '{}') names an unknown scribe or lecturer", scribe, lecturer)
            }
            StabilityViolation::UnaccountedScribe { scribe } => {
                write!(f, "scribe '{}' is neither assigned nor listed as unassigned", scribe)
            }
            StabilityViolation::UnacceptablePair { scribe, lecturer } => {
                write!(f, "scribe '{}' and lecturer '{}' are not mutually acceptable", scribe, lecturer)
            }
            StabilityViolation::BlockingPair { scribe, lecturer } => {
                write!(f, "scribe '{}' and lecturer '{}' form a blocking pair", scribe, lecturer)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StabilityReport {
    pub violations: Vec<StabilityViolation>,
}

impl StabilityReport {
    pub fn is_stable(&self) -> bool {
        self.violations.is_empty()
    }
}

pub fn verify(model: &PreferenceModel, assignment: &Assignment) -> StabilityReport {
    let mut violations = Vec::new();
    // scribe -> lecturer
    let mut matched: Vec<Option<usize>> = vec![None; model.scribe_count()];
    let mut seen = vec![false; model.scribe_count()];
    // lecturer -> held scribes
    let mut held: Vec<Vec<usize>> = vec![Vec::new(); model.lecturer_count()];

    for allocation in &assignment.allocations {
        let Some(l) = model.lecturer_index(&allocation.lecturer) else {
            for scribe in &allocation.scribes {
                violations.push(StabilityViolation::UnknownAssignment {
                    scribe: scribe.clone(),
                    lecturer: allocation.lecturer.clone(),
                });
            }
            continue;
        };

        let quota = model.quota_of(l);
        if allocation.scribes.len() > quota {
            violations.push(StabilityViolation::QuotaExceeded {
                lecturer: allocation.lecturer.clone(),
                held: allocation.scribes.len(),
                quota,
            });
        }

        for scribe in &allocation.scribes {
            let Some(s) = model.scribe_index(scribe) else {
                violations.push(StabilityViolation::UnknownAssignment {
                    scribe: scribe.clone(),
                    lecturer: allocation.lecturer.clone(),
                });
                continue;
            };
            if seen[s] {
                violations.push(StabilityViolation::MultipleAssignment { scribe: scribe.clone() });
                continue;
            }
            seen[s] = true;

            if model.scribe_rank_of(s, l).is_none() || model.lecturer_rank_of(l, s).is_none() {
                violations.push(StabilityViolation::UnacceptablePair {
                    scribe: scribe.clone(),
                    lecturer: allocation.lecturer.clone(),
                });
            }
            matched[s] = Some(l);
            held[l].push(s);
        }
    }

    for scribe in &assignment.unassigned {
        match model.scribe_index(scribe) {
            Some(s) if seen[s] => {
                violations.push(StabilityViolation::MultipleAssignment { scribe: scribe.clone() });
            }
            Some(s) => seen[s] = true,
            None => violations.push(StabilityViolation::UnknownAssignment {
                scribe: scribe.clone(),
                lecturer: String::new(),
            }),
        }
    }

    for (s, _) in seen.iter().enumerate().filter(|(_, seen)| !**seen) {
        violations.push(StabilityViolation::UnaccountedScribe {
            scribe: model.scribe_name(s).to_string(),
        });
    }

    for s in 0..model.scribe_count() {
        // 未分配視為比清單上任何 lecturer 都差
        let current = matched[s]
            .and_then(|l| model.scribe_rank_of(s, l))
            .unwrap_or(usize::MAX);

        for &l in model.scribe_list(s).iter().take(current) {
            let Some(rank) = model.lecturer_rank_of(l, s) else {
                continue;
            };
            let blocks = held[l].len() < model.quota_of(l)
                || held[l]
                    .iter()
                    .any(|&other| model.lecturer_rank_of(l, other).map_or(true, |r| r > rank));
            if blocks {
                violations.push(StabilityViolation::BlockingPair {
                    scribe: model.scribe_name(s).to_string(),
                    lecturer: model.lecturer_name(l).to_string(),
                });
            }
        }
    }

    StabilityReport { violations }
}
