use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Goal
// ---------------------------------------------------------------------------

/// Training goal selected on the user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    WeightLoss,
    MuscleGain,
    Maintenance,
}

impl Goal {
    /// Every goal, in the order they are offered to the user.
    pub const ALL: [Goal; 3] = [Goal::WeightLoss, Goal::MuscleGain, Goal::Maintenance];

    /// Wire form, e.g. `weight_loss`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WeightLoss => "weight_loss",
            Self::MuscleGain => "muscle_gain",
            Self::Maintenance => "maintenance",
        }
    }

    /// Human-readable label, e.g. `Weight Loss`.
    pub fn label(self) -> &'static str {
        match self {
            Self::WeightLoss => "Weight Loss",
            Self::MuscleGain => "Muscle Gain",
            Self::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = GoalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight_loss" => Ok(Self::WeightLoss),
            "muscle_gain" => Ok(Self::MuscleGain),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(GoalParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Goal`] string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid goal: {0:?} (expected weight_loss, muscle_gain, or maintenance)")]
pub struct GoalParseError(pub String);

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The current user's profile.
///
/// Starts out empty and is only ever replaced field by field through a
/// [`ProfileUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    /// Body weight in kilograms.
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Height in centimetres.
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub goal: Goal,
}

impl UserProfile {
    /// Shallow merge: every field present in `update` replaces the current one.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(age) = update.age {
            self.age = Some(age);
        }
        if let Some(weight) = update.weight_kg {
            self.weight_kg = Some(weight);
        }
        if let Some(height) = update.height_cm {
            self.height_cm = Some(height);
        }
        if let Some(goal) = update.goal {
            self.goal = goal;
        }
    }
}

/// Partial profile; absent fields are left untouched on merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
}

/// Raw, unsaved profile form input.
///
/// All fields are kept as typed by the user so validation can report
/// "required" and "must be a number" separately from range errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub goal: String,
}

impl From<&UserProfile> for ProfileDraft {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            age: profile.age.map(|a| a.to_string()).unwrap_or_default(),
            weight: profile.weight_kg.map(|w| w.to_string()).unwrap_or_default(),
            height: profile.height_cm.map(|h| h.to_string()).unwrap_or_default(),
            goal: profile.goal.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Exercises and plan
// ---------------------------------------------------------------------------

/// A single exercise as served by the catalog.
///
/// `name` is the identity key; every other attribute is optional because
/// the remote catalog does not guarantee them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl ExerciseRecord {
    /// A record with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_muscle(mut self, muscle: impl Into<String>) -> Self {
        self.muscle = Some(muscle.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn with_equipment(mut self, equipment: impl Into<String>) -> Self {
        self.equipment = Some(equipment.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }
}

/// An exercise the user has put in their plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    /// Assigned by the store on insertion; unique within the plan.
    pub id: u64,
    #[serde(flatten)]
    pub exercise: ExerciseRecord,
    /// Set once the plan has been confirmed.
    #[serde(default)]
    pub scheduled: bool,
}

impl PlanItem {
    pub fn name(&self) -> &str {
        &self.exercise.name
    }

    /// Merge `update` into this item. The exercise name is never touched.
    pub fn apply(&mut self, update: PlanItemUpdate) {
        if let Some(scheduled) = update.scheduled {
            self.scheduled = scheduled;
        }
        if let Some(muscle) = update.muscle {
            self.exercise.muscle = Some(muscle);
        }
        if let Some(kind) = update.kind {
            self.exercise.kind = Some(kind);
        }
        if let Some(difficulty) = update.difficulty {
            self.exercise.difficulty = Some(difficulty);
        }
        if let Some(equipment) = update.equipment {
            self.exercise.equipment = Some(equipment);
        }
        if let Some(instructions) = update.instructions {
            self.exercise.instructions = Some(instructions);
        }
    }
}

/// Field updates for a [`PlanItem`].
///
/// Has no `name` field: the name keys the plan's one-item-per-exercise rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Completion record for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub date: NaiveDate,
    /// Ids of the plan items completed on `date`, in completion order.
    #[serde(default)]
    pub completed_exercises: Vec<u64>,
}

impl ProgressEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            completed_exercises: Vec::new(),
        }
    }

    pub fn apply(&mut self, update: ProgressUpdate) {
        if let Some(completed) = update.completed_exercises {
            self.completed_exercises = completed;
        }
    }

    pub fn is_completed(&self, id: u64) -> bool {
        self.completed_exercises.contains(&id)
    }
}

/// Partial progress entry merged by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_exercises: Option<Vec<u64>>,
}

impl ProgressUpdate {
    pub fn completed(ids: Vec<u64>) -> Self {
        Self {
            completed_exercises: Some(ids),
        }
    }
}
