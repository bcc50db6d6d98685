//! Validated preference model.
//!
//! Names are interned to dense indices once, at build time. The engine and the
//! stability checker work on indices; the name-based lookups below are for
//! callers and tests.

use crate::domain::model::{LecturerPreference, PreferenceInput};
use crate::utils::error::{MatchError, Result};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssueKind {
    /// Two scribes or two lecturers share a name.
    DuplicateIdentity,
    /// A preference list names the same entity twice.
    DuplicateEntry,
    /// A scribe's list names a lecturer that doesn't exist.
    UnknownLecturer,
    /// A lecturer's list names a scribe that doesn't exist.
    UnknownScribe,
    NonPositiveQuota,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub kind: ValidationIssueKind,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(kind: ValidationIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Which ranking a lecturer uses once the model is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferencePolicy {
    Ranked,
    InputOrder,
}

#[derive(Debug, Clone)]
pub struct PreferenceModel {
    scribes: Vec<String>,
    lecturers: Vec<String>,
    scribe_lookup: HashMap<String, usize>,
    lecturer_lookup: HashMap<String, usize>,
    scribe_lists: Vec<Vec<usize>>,
    /// scribe -> (lecturer -> rank)
    scribe_ranks: Vec<HashMap<usize, usize>>,
    quotas: Vec<usize>,
    policies: Vec<PreferencePolicy>,
    /// lecturer -> (scribe -> rank)；InputOrder 的 lecturer 只包含有排它的 scribe
    lecturer_ranks: Vec<HashMap<usize, usize>>,
}

impl PreferenceModel {
    /// Validates `input` and builds the model.
    ///
    /// Every problem found is reported at once in
    /// [`MatchError::InvalidPreferences`]; nothing is built if any exist.
    pub fn build(input: &PreferenceInput) -> Result<Self> {
        let mut issues = Vec::new();

        let mut scribe_lookup = HashMap::with_capacity(input.scribes.len());
        for (index, scribe) in input.scribes.iter().enumerate() {
            match scribe_lookup.entry(scribe.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
                Entry::Occupied(_) => issues.push(ValidationIssue::new(
                    ValidationIssueKind::DuplicateIdentity,
                    format!("Duplicate scribe name: {}", scribe.name),
                )),
            }
        }

        let mut lecturer_lookup = HashMap::with_capacity(input.lecturers.len());
        for (index, lecturer) in input.lecturers.iter().enumerate() {
            match lecturer_lookup.entry(lecturer.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
                Entry::Occupied(_) => issues.push(ValidationIssue::new(
                    ValidationIssueKind::DuplicateIdentity,
                    format!("Duplicate lecturer name: {}", lecturer.name),
                )),
            }

            if lecturer.quota < 1 {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::NonPositiveQuota,
                    format!(
                        "Lecturer '{}' has quota {}; quotas must be at least 1",
                        lecturer.name, lecturer.quota
                    ),
                ));
            }
        }

        let mut scribe_lists = Vec::with_capacity(input.scribes.len());
        let mut scribe_ranks = Vec::with_capacity(input.scribes.len());
        for scribe in &input.scribes {
            let mut list = Vec::with_capacity(scribe.preferences.len());
            let mut ranks = HashMap::with_capacity(scribe.preferences.len());
            for lecturer in &scribe.preferences {
                let Some(&l) = lecturer_lookup.get(lecturer) else {
                    issues.push(ValidationIssue::new(
                        ValidationIssueKind::UnknownLecturer,
                        format!("Scribe '{}' ranks unknown lecturer '{}'", scribe.name, lecturer),
                    ));
                    continue;
                };
                if ranks.insert(l, list.len()).is_some() {
                    issues.push(ValidationIssue::new(
                        ValidationIssueKind::DuplicateEntry,
                        format!("Scribe '{}' lists lecturer '{}' more than once", scribe.name, lecturer),
                    ));
                    continue;
                }
                list.push(l);
            }
            scribe_lists.push(list);
            scribe_ranks.push(ranks);
        }

        let mut policies = Vec::with_capacity(input.lecturers.len());
        let mut lecturer_ranks: Vec<HashMap<usize, usize>> = Vec::with_capacity(input.lecturers.len());
        for lecturer in &input.lecturers {
            let mut ranks = HashMap::new();
            match &lecturer.preference {
                LecturerPreference::Ranked(scribes) => {
                    policies.push(PreferencePolicy::Ranked);
                    for scribe in scribes {
                        let Some(&s) = scribe_lookup.get(scribe) else {
                            issues.push(ValidationIssue::new(
                                ValidationIssueKind::UnknownScribe,
                                format!("Lecturer '{}' ranks unknown scribe '{}'", lecturer.name, scribe),
                            ));
                            continue;
                        };
                        let next_rank = ranks.len();
                        if let Entry::Vacant(slot) = ranks.entry(s) {
                            slot.insert(next_rank);
                        } else {
                            issues.push(ValidationIssue::new(
                                ValidationIssueKind::DuplicateEntry,
                                format!("Lecturer '{}' lists scribe '{}' more than once", lecturer.name, scribe),
                            ));
                        }
                    }
                }
                LecturerPreference::InputOrder => policies.push(PreferencePolicy::InputOrder),
            }
            lecturer_ranks.push(ranks);
        }

        if !issues.is_empty() {
            return Err(MatchError::InvalidPreferences { issues });
        }

        // InputOrder: 依 scribe 在輸入中的先後給名次
        for (s, list) in scribe_lists.iter().enumerate() {
            for &l in list {
                if policies[l] == PreferencePolicy::InputOrder {
                    let ranks = &mut lecturer_ranks[l];
                    let next_rank = ranks.len();
                    ranks.insert(s, next_rank);
                }
            }
        }

        let quotas = input
            .lecturers
            .iter()
            .map(|l| usize::try_from(l.quota).unwrap_or(0))
            .collect();

        Ok(Self {
            scribes: input.scribes.iter().map(|s| s.name.clone()).collect(),
            lecturers: input.lecturers.iter().map(|l| l.name.clone()).collect(),
            scribe_lookup,
            lecturer_lookup,
            scribe_lists,
            scribe_ranks,
            quotas,
            policies,
            lecturer_ranks,
        })
    }

    /// Position of `lecturer` in `scribe`'s list; `None` if unacceptable or unknown.
    pub fn preference_rank(&self, scribe: &str, lecturer: &str) -> Option<usize> {
        let s = *self.scribe_lookup.get(scribe)?;
        let l = *self.lecturer_lookup.get(lecturer)?;
        self.scribe_rank_of(s, l)
    }

    /// Position of `scribe` in `lecturer`'s effective ranking; `None` if unacceptable or unknown.
    pub fn lecturer_rank(&self, lecturer: &str, scribe: &str) -> Option<usize> {
        let l = *self.lecturer_lookup.get(lecturer)?;
        let s = *self.scribe_lookup.get(scribe)?;
        self.lecturer_rank_of(l, s)
    }

    pub fn quota(&self, lecturer: &str) -> Option<usize> {
        self.lecturer_lookup.get(lecturer).map(|&l| self.quotas[l])
    }

    pub fn lecturer_policy(&self, lecturer: &str) -> Option<PreferencePolicy> {
        self.lecturer_lookup.get(lecturer).map(|&l| self.policies[l])
    }

    pub fn scribe_preferences(&self, scribe: &str) -> Option<Vec<&str>> {
        self.scribe_lookup.get(scribe).map(|&s| {
            self.scribe_lists[s]
                .iter()
                .map(|&l| self.lecturers[l].as_str())
                .collect()
        })
    }

    pub fn scribe_names(&self) -> &[String] {
        &self.scribes
    }

    pub fn lecturer_names(&self) -> &[String] {
        &self.lecturers
    }

    /// Upper bound on proposals in one run.
    pub fn total_preference_length(&self) -> usize {
        self.scribe_lists.iter().map(Vec::len).sum()
    }

    pub(crate) fn scribe_count(&self) -> usize {
        self.scribes.len()
    }

    pub(crate) fn lecturer_count(&self) -> usize {
        self.lecturers.len()
    }

    pub(crate) fn scribe_index(&self, scribe: &str) -> Option<usize> {
        self.scribe_lookup.get(scribe).copied()
    }

    pub(crate) fn lecturer_index(&self, lecturer: &str) -> Option<usize> {
        self.lecturer_lookup.get(lecturer).copied()
    }

    pub(crate) fn scribe_name(&self, s: usize) -> &str {
        &self.scribes[s]
    }

    pub(crate) fn lecturer_name(&self, l: usize) -> &str {
        &self.lecturers[l]
    }

    pub(crate) fn scribe_list(&self, s: usize) -> &[usize] {
        &self.scribe_lists[s]
    }

    pub(crate) fn scribe_rank_of(&self, s: usize, l: usize) -> Option<usize> {
        self.scribe_ranks[s].get(&l).copied()
    }

    pub(crate) fn lecturer_rank_of(&self, l: usize, s: usize) -> Option<usize> {
        self.lecturer_ranks[l].get(&s).copied()
    }

    pub(crate) fn quota_of(&self, l: usize) -> usize {
        self.quotas[l]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{LecturerEntry, ScribeEntry};

    fn input() -> PreferenceInput {
        PreferenceInput {
            scribes: vec![
                ScribeEntry::new("Alice", ["Prof_A", "Prof_B"]),
                ScribeEntry::new("Bob", ["Prof_B"]),
                ScribeEntry::new("Carol", ["Prof_B", "Prof_A"]),
            ],
            lecturers: vec![
                LecturerEntry::new("Prof_A", 1).with_ranking(["Carol", "Alice"]),
                LecturerEntry::new("Prof_B", 2),
            ],
        }
    }

    fn issue_kinds(err: MatchError) -> Vec<ValidationIssueKind> {
        match err {
            MatchError::InvalidPreferences { issues } => issues.into_iter().map(|i| i.kind).collect(),
            other => panic!("expected InvalidPreferences, got {other:?}"),
        }
    }

    #[test]
    fn test_preference_rank() {
        let model = PreferenceModel::build(&input()).unwrap();
        assert_eq!(model.preference_rank("Alice", "Prof_A"), Some(0));
        assert_eq!(model.preference_rank("Alice", "Prof_B"), Some(1));
        assert_eq!(model.preference_rank("Bob", "Prof_A"), None);
        assert_eq!(model.preference_rank("Nobody", "Prof_A"), None);
    }

    #[test]
    fn test_lecturer_rank_uses_explicit_list() {
        let model = PreferenceModel::build(&input()).unwrap();
        assert_eq!(model.lecturer_policy("Prof_A"), Some(PreferencePolicy::Ranked));
        assert_eq!(model.lecturer_rank("Prof_A", "Carol"), Some(0));
        assert_eq!(model.lecturer_rank("Prof_A", "Alice"), Some(1));
        assert_eq!(model.lecturer_rank("Prof_A", "Bob"), None);
    }

    #[test]
    fn test_lecturer_rank_defaults_to_input_order_of_applicants() {
        let model = PreferenceModel::build(&input()).unwrap();
        assert_eq!(model.lecturer_policy("Prof_B"), Some(PreferencePolicy::InputOrder));
        // Alice, Bob, Carol 都有排 Prof_B
        assert_eq!(model.lecturer_rank("Prof_B", "Alice"), Some(0));
        assert_eq!(model.lecturer_rank("Prof_B", "Bob"), Some(1));
        assert_eq!(model.lecturer_rank("Prof_B", "Carol"), Some(2));
    }

    #[test]
    fn test_input_order_excludes_scribes_who_did_not_apply() {
        let mut input = input();
        input.lecturers[0].preference = LecturerPreference::InputOrder;
        let model = PreferenceModel::build(&input).unwrap();
        assert_eq!(model.lecturer_rank("Prof_A", "Alice"), Some(0));
        assert_eq!(model.lecturer_rank("Prof_A", "Bob"), None);
        assert_eq!(model.lecturer_rank("Prof_A", "Carol"), Some(1));
    }

    #[test]
    fn test_quota_and_names() {
        let model = PreferenceModel::build(&input()).unwrap();
        assert_eq!(model.quota("Prof_A"), Some(1));
        assert_eq!(model.quota("Prof_B"), Some(2));
        assert_eq!(model.quota("Prof_C"), None);
        assert_eq!(model.scribe_names(), &["Alice", "Bob", "Carol"]);
        assert_eq!(model.lecturer_names(), &["Prof_A", "Prof_B"]);
        assert_eq!(model.scribe_preferences("Carol"), Some(vec!["Prof_B", "Prof_A"]));
        assert_eq!(model.total_preference_length(), 5);
    }

    #[test]
    fn test_unknown_lecturer_is_rejected() {
        let mut input = input();
        input.scribes[1].preferences.push("Prof_Z".to_string());
        let err = PreferenceModel::build(&input).unwrap_err();
        assert_eq!(issue_kinds(err), vec![ValidationIssueKind::UnknownLecturer]);
    }

    #[test]
    fn test_unknown_scribe_is_rejected() {
        let mut input = input();
        input.lecturers[0] = LecturerEntry::new("Prof_A", 1).with_ranking(["Carol", "Zed"]);
        let err = PreferenceModel::build(&input).unwrap_err();
        assert_eq!(issue_kinds(err), vec![ValidationIssueKind::UnknownScribe]);
    }

    #[test]
    fn test_duplicate_entries_are_rejected() {
        let mut input = input();
        input.scribes[0] = ScribeEntry::new("Alice", ["Prof_A", "Prof_A"]);
        input.lecturers[0] = LecturerEntry::new("Prof_A", 1).with_ranking(["Carol", "Carol"]);
        let err = PreferenceModel::build(&input).unwrap_err();
        assert_eq!(
            issue_kinds(err),
            vec![ValidationIssueKind::DuplicateEntry, ValidationIssueKind::DuplicateEntry]
        );
    }

    #[test]
    fn test_duplicate_identities_are_rejected() {
        let mut input = input();
        input.scribes.push(ScribeEntry::new("Bob", ["Prof_A"]));
        input.lecturers.push(LecturerEntry::new("Prof_B", 1));
        let err = PreferenceModel::build(&input).unwrap_err();
        assert_eq!(
            issue_kinds(err),
            vec![ValidationIssueKind::DuplicateIdentity, ValidationIssueKind::DuplicateIdentity]
        );
    }

    #[test]
    fn test_non_positive_quota_is_rejected() {
        let mut input = input();
        input.lecturers[0].quota = 0;
        input.lecturers[1].quota = -3;
        let err = PreferenceModel::build(&input).unwrap_err();
        assert_eq!(
            issue_kinds(err),
            vec![ValidationIssueKind::NonPositiveQuota, ValidationIssueKind::NonPositiveQuota]
        );
    }

    #[test]
    fn test_empty_input_is_valid() {
        let model = PreferenceModel::build(&PreferenceInput::default()).unwrap();
        assert!(model.scribe_names().is_empty());
        assert!(model.lecturer_names().is_empty());
        assert_eq!(model.total_preference_length(), 0);
    }
}
