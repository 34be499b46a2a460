//! Local filtering of the cached exercise catalog.

use serde::Deserialize;

use crate::model::ExerciseRecord;

/// Muscle groups known to the catalog service.
pub const MUSCLE_GROUPS: [&str; 16] = [
    "abdominals",
    "abductors",
    "adductors",
    "biceps",
    "calves",
    "chest",
    "forearms",
    "glutes",
    "hamstrings",
    "lats",
    "lower_back",
    "middle_back",
    "neck",
    "quadriceps",
    "traps",
    "triceps",
];

pub const EXERCISE_TYPES: [&str; 7] = [
    "cardio",
    "olympic_weightlifting",
    "plyometrics",
    "powerlifting",
    "strength",
    "stretching",
    "strongman",
];

pub const DIFFICULTY_LEVELS: [&str; 3] = ["beginner", "intermediate", "expert"];

/// Search text plus exact-match attribute filters. Unset or blank fields
/// match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub muscle: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl BrowseQuery {
    pub fn matches(&self, exercise: &ExerciseRecord) -> bool {
        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            if !exercise.name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        field_matches(&self.muscle, &exercise.muscle)
            && field_matches(&self.kind, &exercise.kind)
            && field_matches(&self.difficulty, &exercise.difficulty)
    }

    /// The matching exercises, in catalog order.
    pub fn apply(&self, exercises: &[ExerciseRecord]) -> Vec<ExerciseRecord> {
        exercises
            .iter()
            .filter(|exercise| self.matches(exercise))
            .cloned()
            .collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn field_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match non_blank(wanted) {
        Some(wanted) => actual.as_deref() == Some(wanted),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback_exercises;

    fn names(list: &[ExerciseRecord]) -> Vec<&str> {
        list.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn empty_query_matches_everything() {
        let all = fallback_exercises();
        assert_eq!(BrowseQuery::default().apply(&all), all);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let query = BrowseQuery {
            search: Some("PU".to_string()),
            ..BrowseQuery::default()
        };
        assert_eq!(names(&query.apply(&fallback_exercises())), vec!["Push-ups", "Pull-ups"]);
    }

    #[test]
    fn attribute_filters_combine() {
        let query = BrowseQuery {
            muscle: Some("chest".to_string()),
            difficulty: Some("intermediate".to_string()),
            ..BrowseQuery::default()
        };
        assert_eq!(names(&query.apply(&fallback_exercises())), vec!["Bench Press"]);
    }

    #[test]
    fn blank_filter_is_ignored_but_missing_attribute_never_matches() {
        let query = BrowseQuery {
            kind: Some(" ".to_string()),
            ..BrowseQuery::default()
        };
        assert!(query.matches(&ExerciseRecord::named("Anything")));

        let query = BrowseQuery {
            kind: Some("cardio".to_string()),
            ..BrowseQuery::default()
        };
        assert!(!query.matches(&ExerciseRecord::named("Anything")));
    }

    #[test]
    fn constant_lists_have_expected_sizes() {
        assert_eq!(MUSCLE_GROUPS.len(), 16);
        assert!(EXERCISE_TYPES.contains(&"strength"));
        assert_eq!(DIFFICULTY_LEVELS, ["beginner", "intermediate", "expert"]);
    }
}
