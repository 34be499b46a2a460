//! Domain state manager.
//!
//! [`Store`] exclusively owns the user profile, the cached exercise catalog,
//! the plan and the progress log, and enforces:
//!
//! - at most one plan item per exercise name (`add_to_plan` is a silent
//!   no-op for a name already in the plan);
//! - at most one progress entry per date (`add_progress` upserts);
//! - the exercise cache is only ever replaced wholesale.
//!
//! Every mutation is total. The unchecked mutations trust their caller;
//! [`Store::save_profile`] and [`Store::schedule_plan`] validate first.

pub mod loader;

use chrono::NaiveDate;

use crate::catalog::CatalogFetch;
use crate::model::{
    ExerciseRecord, PlanItem, PlanItemUpdate, ProfileDraft, ProfileUpdate, ProgressEntry,
    ProgressUpdate, UserProfile,
};
use crate::validation::{self, PlanValidation, ProfileValidation};

/// Result of [`Store::add_to_plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new item was appended with this id.
    Added(u64),
    /// An item with the same exercise name already exists under this id.
    AlreadyPresent(u64),
}

impl AddOutcome {
    pub fn id(self) -> u64 {
        match self {
            Self::Added(id) | Self::AlreadyPresent(id) => id,
        }
    }

    pub fn is_added(self) -> bool {
        matches!(self, Self::Added(_))
    }
}

/// In-memory application state.
#[derive(Debug)]
pub struct Store {
    profile: UserProfile,
    exercises: Vec<ExerciseRecord>,
    plan: Vec<PlanItem>,
    progress: Vec<ProgressEntry>,
    next_plan_id: u64,
    loading: bool,
    error: Option<String>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            profile: UserProfile::default(),
            exercises: Vec::new(),
            plan: Vec::new(),
            progress: Vec::new(),
            next_plan_id: 1,
            loading: false,
            error: None,
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn exercises(&self) -> &[ExerciseRecord] {
        &self.exercises
    }

    pub fn plan(&self) -> &[PlanItem] {
        &self.plan
    }

    pub fn progress(&self) -> &[ProgressEntry] {
        &self.progress
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message describing the last failed catalog load, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn plan_item(&self, id: u64) -> Option<&PlanItem> {
        self.plan.iter().find(|item| item.id == id)
    }

    pub fn is_in_plan(&self, name: &str) -> bool {
        self.plan.iter().any(|item| item.name() == name)
    }

    /// Plan items that have been confirmed, in plan order.
    pub fn scheduled_items(&self) -> impl Iterator<Item = &PlanItem> {
        self.plan.iter().filter(|item| item.scheduled)
    }

    pub fn progress_for(&self, date: NaiveDate) -> Option<&ProgressEntry> {
        self.progress.iter().find(|entry| entry.date == date)
    }

    // -----------------------------------------------------------------------
    // Profile
    // -----------------------------------------------------------------------

    /// Shallow-merge `update` into the profile. Performs no validation.
    pub fn update_profile(&mut self, update: ProfileUpdate) {
        self.profile.apply(update);
        tracing::debug!(name = %self.profile.name, goal = %self.profile.goal, "profile updated");
    }

    /// Validate `draft` and, only if every field passes, apply it.
    pub fn save_profile(&mut self, draft: &ProfileDraft) -> Result<(), ProfileValidation> {
        let update = draft.to_update()?;
        self.update_profile(update);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Plan
    // -----------------------------------------------------------------------

    /// Append `exercise` to the plan unless an item with the same name exists.
    pub fn add_to_plan(&mut self, exercise: ExerciseRecord) -> AddOutcome {
        if let Some(existing) = self.plan.iter().find(|item| item.name() == exercise.name) {
            tracing::debug!(exercise = %exercise.name, id = existing.id, "exercise already in plan");
            return AddOutcome::AlreadyPresent(existing.id);
        }

        let id = self.next_plan_id;
        self.next_plan_id += 1;
        tracing::info!(exercise = %exercise.name, id, "added exercise to plan");
        self.plan.push(PlanItem {
            id,
            exercise,
            scheduled: false,
        });
        AddOutcome::Added(id)
    }

    /// Remove the item with `id`. Returns `false` if there was none.
    pub fn remove_from_plan(&mut self, id: u64) -> bool {
        let before = self.plan.len();
        self.plan.retain(|item| item.id != id);
        let removed = self.plan.len() != before;
        if removed {
            tracing::info!(id, "removed exercise from plan");
        }
        removed
    }

    /// Merge `update` into the item with `id`. Returns `false` if there was none.
    pub fn update_plan_item(&mut self, id: u64, update: PlanItemUpdate) -> bool {
        match self.plan.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.apply(update);
                true
            }
            None => false,
        }
    }

    pub fn clear_plan(&mut self) {
        self.plan.clear();
        tracing::info!("plan cleared");
    }

    /// Mark every plan item as scheduled. An empty plan is trivially confirmed.
    pub fn confirm_plan(&mut self) {
        for item in &mut self.plan {
            item.scheduled = true;
        }
        tracing::info!(items = self.plan.len(), "plan confirmed");
    }

    /// Check that the plan is non-empty and that `schedule` and the target
    /// `duration` are set, then confirm. Every failing check is reported.
    ///
    /// Returns the number of scheduled items.
    pub fn schedule_plan(&mut self, schedule: &str, duration: &str) -> Result<usize, PlanValidation> {
        let validation = validation::validate_confirmation(&self.plan, schedule, duration);
        if !validation.is_valid() {
            return Err(validation);
        }
        self.confirm_plan();
        tracing::info!(schedule = schedule.trim(), duration = duration.trim(), "plan scheduled");
        Ok(self.plan.len())
    }

    // -----------------------------------------------------------------------
    // Progress
    // -----------------------------------------------------------------------

    /// Upsert the progress entry for `date`.
    ///
    /// An existing entry has `data` merged into it; otherwise a new entry is
    /// appended. Never creates a second entry for the same date.
    pub fn add_progress(&mut self, date: NaiveDate, data: ProgressUpdate) -> &ProgressEntry {
        let index = match self.progress.iter().position(|entry| entry.date == date) {
            Some(index) => index,
            None => {
                self.progress.push(ProgressEntry::new(date));
                self.progress.len() - 1
            }
        };

        let entry = &mut self.progress[index];
        entry.apply(data);
        tracing::debug!(%date, completed = entry.completed_exercises.len(), "progress recorded");
        entry
    }

    // -----------------------------------------------------------------------
    // Exercise cache
    // -----------------------------------------------------------------------

    /// Replace the exercise cache wholesale.
    pub fn cache_exercises(&mut self, exercises: Vec<ExerciseRecord>) {
        self.exercises = exercises;
    }

    /// Flag a catalog load as in flight and clear any previous error.
    pub fn begin_catalog_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply a finished catalog load: cache its exercises, record a failure
    /// reason if there was one, and clear the loading flag.
    pub fn finish_catalog_load(&mut self, fetch: &CatalogFetch) {
        self.cache_exercises(fetch.exercises.clone());
        self.error = fetch.failure().map(ToString::to_string);
        self.loading = false;
    }
}
