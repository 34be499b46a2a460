//! Profile and plan input validation.
//!
//! Each field validator is a pure function returning `None` when the input is
//! acceptable, or a human-readable message for the first rule it breaks.
//! [`validate_profile`] runs all five profile validators and collects the
//! messages keyed by field.

use std::collections::BTreeMap;
use std::fmt;
use std::num::IntErrorKind;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::model::{Goal, PlanItem, ProfileDraft, ProfileUpdate};

const AGE_RANGE: (i64, i64) = (13, 120);
const WEIGHT_RANGE_KG: (f64, f64) = (20.0, 500.0);
const HEIGHT_RANGE_CM: (f64, f64) = (100.0, 250.0);

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

pub fn validate_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Some("Name is required".to_string());
    }
    if trimmed.chars().count() < 2 {
        return Some("Name must be at least 2 characters".to_string());
    }
    None
}

pub fn validate_age(age: &str) -> Option<String> {
    let trimmed = age.trim();
    if trimmed.is_empty() {
        return Some("Age is required".to_string());
    }
    let (min, max) = AGE_RANGE;
    let out_of_range = || Some(format!("Age must be between {min} and {max}"));
    let value = match trimmed.parse::<i64>() {
        Ok(value) => value,
        Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            return out_of_range();
        }
        Err(_) => return Some("Age must be a number".to_string()),
    };
    if !(min..=max).contains(&value) {
        return out_of_range();
    }
    None
}

pub fn validate_weight(weight: &str) -> Option<String> {
    validate_measure(weight, "Weight", WEIGHT_RANGE_KG, "kg")
}

pub fn validate_height(height: &str) -> Option<String> {
    validate_measure(height, "Height", HEIGHT_RANGE_CM, "cm")
}

pub fn validate_goal(goal: &str) -> Option<String> {
    match goal.parse::<Goal>() {
        Ok(_) => None,
        Err(_) => Some("Please select a valid goal".to_string()),
    }
}

pub fn validate_plan(plan: &[PlanItem]) -> Option<String> {
    if plan.is_empty() {
        return Some("Please add at least one exercise to your plan".to_string());
    }
    None
}

pub fn validate_schedule(schedule: &str) -> Option<String> {
    if schedule.trim().is_empty() {
        return Some("Please select a schedule".to_string());
    }
    None
}

/// Target duration is free text (e.g. "4 weeks"); it only has to be present.
pub fn validate_duration(duration: &str) -> Option<String> {
    if duration.trim().is_empty() {
        return Some("Please enter target duration".to_string());
    }
    None
}

/// Shared rule for decimal body measurements.
fn validate_measure(raw: &str, label: &str, (min, max): (f64, f64), unit: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(format!("{label} is required"));
    }
    let value = match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return Some(format!("{label} must be a number")),
    };
    if value < min || value > max {
        return Some(format!("{label} must be between {min} and {max} {unit}"));
    }
    None
}

// ---------------------------------------------------------------------------
// Aggregate profile validation
// ---------------------------------------------------------------------------

/// Profile form fields, used as keys in [`ProfileValidation::errors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    Age,
    Weight,
    Height,
    Goal,
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::Weight => "weight",
            Self::Height => "height",
            Self::Goal => "goal",
        };
        f.write_str(s)
    }
}

/// Result of [`validate_profile`]: one message per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileValidation {
    pub errors: BTreeMap<ProfileField, String>,
}

impl ProfileValidation {
    /// `true` iff no field failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: ProfileField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}

impl Serialize for ProfileValidation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProfileValidation", 2)?;
        state.serialize_field("is_valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}

impl fmt::Display for ProfileValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return f.write_str("profile is valid");
        }
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        write!(f, "invalid profile ({})", parts.join("; "))
    }
}

impl std::error::Error for ProfileValidation {}

/// Run every profile field validator against `draft`.
pub fn validate_profile(draft: &ProfileDraft) -> ProfileValidation {
    let checks = [
        (ProfileField::Name, validate_name(&draft.name)),
        (ProfileField::Age, validate_age(&draft.age)),
        (ProfileField::Weight, validate_weight(&draft.weight)),
        (ProfileField::Height, validate_height(&draft.height)),
        (ProfileField::Goal, validate_goal(&draft.goal)),
    ];

    let errors = checks
        .into_iter()
        .filter_map(|(field, error)| error.map(|message| (field, message)))
        .collect();

    ProfileValidation { errors }
}

// ---------------------------------------------------------------------------
// Plan confirmation
// ---------------------------------------------------------------------------

/// Fields checked before a plan is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanField {
    Plan,
    Schedule,
    Duration,
}

impl fmt::Display for PlanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plan => "plan",
            Self::Schedule => "schedule",
            Self::Duration => "duration",
        })
    }
}

/// Result of [`validate_confirmation`]: every failing precondition at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanValidation {
    pub errors: BTreeMap<PlanField, String>,
}

impl PlanValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: PlanField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}

impl Serialize for PlanValidation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PlanValidation", 2)?;
        state.serialize_field("is_valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}

impl fmt::Display for PlanValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return f.write_str("plan can be confirmed");
        }
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        write!(f, "plan cannot be confirmed ({})", parts.join("; "))
    }
}

impl std::error::Error for PlanValidation {}

/// Check the plan, schedule and target duration together.
pub fn validate_confirmation(plan: &[PlanItem], schedule: &str, duration: &str) -> PlanValidation {
    let checks = [
        (PlanField::Plan, validate_plan(plan)),
        (PlanField::Schedule, validate_schedule(schedule)),
        (PlanField::Duration, validate_duration(duration)),
    ];

    let errors = checks
        .into_iter()
        .filter_map(|(field, error)| error.map(|message| (field, message)))
        .collect();

    PlanValidation { errors }
}

impl ProfileDraft {
    /// Validate the draft and, if every field passes, parse it into a
    /// [`ProfileUpdate`] that sets all five fields.
    pub fn to_update(&self) -> Result<ProfileUpdate, ProfileValidation> {
        let validation = validate_profile(self);
        if !validation.is_valid() {
            return Err(validation);
        }

        Ok(ProfileUpdate {
            name: Some(self.name.trim().to_string()),
            age: self.age.trim().parse().ok(),
            weight_kg: self.weight.trim().parse().ok(),
            height_cm: self.height.trim().parse().ok(),
            goal: self.goal.parse().ok(),
        })
    }
}
