use serde::{Deserialize, Serialize};

/// 一位 scribe 及其依序排列的 lecturer 偏好（最想要的在前）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScribeEntry {
    pub name: String,
    pub preferences: Vec<String>,
}

impl ScribeEntry {
    pub fn new<I, S>(name: impl Into<String>, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            preferences: preferences.into_iter().map(Into::into).collect(),
        }
    }
}

/// How a lecturer orders the scribes who apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", content = "scribes", rename_all = "snake_case")]
pub enum LecturerPreference {
    /// Explicit ranking, most preferred first. Scribes not listed are unacceptable.
    Ranked(Vec<String>),
    /// Indifferent: applicants are ranked by their position in the scribe input.
    InputOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LecturerEntry {
    pub name: String,
    /// 保留原始整數，非正數由 PreferenceModel 驗證時拒絕
    pub quota: i64,
    pub preference: LecturerPreference,
}

impl LecturerEntry {
    pub fn new(name: impl Into<String>, quota: i64) -> Self {
        Self {
            name: name.into(),
            quota,
            preference: LecturerPreference::InputOrder,
        }
    }

    pub fn with_ranking<I, S>(mut self, scribes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preference = LecturerPreference::Ranked(scribes.into_iter().map(Into::into).collect());
        self
    }
}

/// Raw, unvalidated input. Entry order is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceInput {
    pub scribes: Vec<ScribeEntry>,
    pub lecturers: Vec<LecturerEntry>,
}

/// A `name,choice1,choice2,...` row from a preference file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRow {
    pub name: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaEntry {
    pub lecturer: String,
    pub quota: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LecturerAllocation {
    pub lecturer: String,
    pub quota: usize,
    pub scribes: Vec<String>,
}

impl LecturerAllocation {
    pub fn remaining(&self) -> usize {
        self.quota.saturating_sub(self.scribes.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderFilled {
    pub lecturer: String,
    pub held: usize,
    pub quota: usize,
    pub remaining: usize,
}

/// Final matching. Lecturers are listed in input order, held scribes in scribe input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub allocations: Vec<LecturerAllocation>,
    pub unassigned: Vec<String>,
}

impl Assignment {
    pub fn lecturer_of(&self, scribe: &str) -> Option<&str> {
        self.allocations
            .iter()
            .find(|a| a.scribes.iter().any(|s| s == scribe))
            .map(|a| a.lecturer.as_str())
    }

    pub fn scribes_of(&self, lecturer: &str) -> Option<&[String]> {
        self.allocations
            .iter()
            .find(|a| a.lecturer == lecturer)
            .map(|a| a.scribes.as_slice())
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.allocations.iter().flat_map(|a| {
            a.scribes
                .iter()
                .map(move |s| (s.as_str(), a.lecturer.as_str()))
        })
    }

    pub fn matched_count(&self) -> usize {
        self.allocations.iter().map(|a| a.scribes.len()).sum()
    }

    pub fn under_filled(&self) -> Vec<UnderFilled> {
        self.allocations
            .iter()
            .filter(|a| a.remaining() > 0)
            .map(|a| UnderFilled {
                lecturer: a.lecturer.clone(),
                held: a.scribes.len(),
                quota: a.quota,
                remaining: a.remaining(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub proposals: usize,
    pub rejections: usize,
    pub displacements: usize,
}

/// transform 階段的產出，交給 renderer 使用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// 原始輸入中的 scribe 順序，CSV 輸出依此排列
    pub scribes: Vec<String>,
    pub assignment: Assignment,
    pub under_filled: Vec<UnderFilled>,
    pub stats: MatchStats,
    pub stable: bool,
    pub violations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Assignment {
        Assignment {
            allocations: vec![
                LecturerAllocation {
                    lecturer: "Prof_A".to_string(),
                    quota: 2,
                    scribes: vec!["Alice".to_string(), "Carol".to_string()],
                },
                LecturerAllocation {
                    lecturer: "Prof_B".to_string(),
                    quota: 3,
                    scribes: vec!["Bob".to_string()],
                },
            ],
            unassigned: vec!["Dave".to_string()],
        }
    }

    #[test]
    fn test_assignment_lookups() {
        let assignment = sample();
        assert_eq!(assignment.lecturer_of("Carol"), Some("Prof_A"));
        assert_eq!(assignment.lecturer_of("Dave"), None);
        assert_eq!(assignment.scribes_of("Prof_B"), Some(&["Bob".to_string()][..]));
        assert_eq!(assignment.matched_count(), 3);
        assert_eq!(
            assignment.pairs().collect::<Vec<_>>(),
            vec![("Alice", "Prof_A"), ("Carol", "Prof_A"), ("Bob", "Prof_B")]
        );
    }

    #[test]
    fn test_under_filled_reports_remaining_capacity() {
        let under = sample().under_filled();
        assert_eq!(
            under,
            vec![UnderFilled {
                lecturer: "Prof_B".to_string(),
                held: 1,
                quota: 3,
                remaining: 2,
            }]
        );
    }

    #[test]
    fn test_lecturer_preference_serializes_as_tagged_variant() {
        let ranked = LecturerEntry::new("Prof_A", 1).with_ranking(["Bob", "Alice"]);
        let json = serde_json::to_value(&ranked.preference).unwrap();
        assert_eq!(json, serde_json::json!({"policy": "ranked", "scribes": ["Bob", "Alice"]}));

        let json = serde_json::to_value(LecturerPreference::InputOrder).unwrap();
        assert_eq!(json, serde_json::json!({"policy": "input_order"}));
    }
}
