//! Behavioural properties of the domain state manager.
//!
//! Covers plan dedup, progress upsert idempotence, confirm/clear and
//! removal safety, plus the browse → plan → confirm → track walkthrough.

use chrono::NaiveDate;

use fitplan_core::catalog::fallback_exercises;
use fitplan_core::tracking::{daily_summary, toggle_completion};
use fitplan_core::{ExerciseRecord, ProgressUpdate, Store};
use fitplan_test_utils::sample_exercise;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

// ---------------------------------------------------------------------------
// Plan dedup
// ---------------------------------------------------------------------------

#[test]
fn plan_never_holds_two_items_with_the_same_name() {
    let names = ["Squats", "Plank", "Squats", "Lunges", "Plank", "Plank", "Squats"];
    let mut store = Store::new();
    for name in names {
        store.add_to_plan(sample_exercise(name));
    }

    let mut plan_names: Vec<&str> = store.plan().iter().map(|i| i.name()).collect();
    assert_eq!(plan_names, vec!["Squats", "Plank", "Lunges"]);
    plan_names.sort_unstable();
    plan_names.dedup();
    assert_eq!(plan_names.len(), store.plan().len());
}

#[test]
fn dedup_holds_in_any_insertion_order() {
    let catalog = fallback_exercises();
    let mut forward = Store::new();
    let mut backward = Store::new();
    for _ in 0..3 {
        for exercise in &catalog {
            forward.add_to_plan(exercise.clone());
        }
        for exercise in catalog.iter().rev() {
            backward.add_to_plan(exercise.clone());
        }
    }
    assert_eq!(forward.plan().len(), catalog.len());
    assert_eq!(backward.plan().len(), catalog.len());
    assert_eq!(backward.plan()[0].name(), "Bench Press");
}

#[test]
fn plan_ids_are_unique() {
    let mut store = Store::new();
    for exercise in fallback_exercises() {
        store.add_to_plan(exercise);
    }
    let mut ids: Vec<u64> = store.plan().iter().map(|i| i.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 8);
}

// ---------------------------------------------------------------------------
// Progress upsert
// ---------------------------------------------------------------------------

#[test]
fn repeated_identical_progress_write_is_idempotent() {
    let mut once = Store::new();
    once.add_progress(today(), ProgressUpdate::completed(vec![1, 2]));

    let mut twice = Store::new();
    twice.add_progress(today(), ProgressUpdate::completed(vec![1, 2]));
    twice.add_progress(today(), ProgressUpdate::completed(vec![1, 2]));

    assert_eq!(once.progress(), twice.progress());
}

#[test]
fn different_progress_for_same_date_overwrites() {
    let mut store = Store::new();
    store.add_progress(today(), ProgressUpdate::completed(vec![1]));
    store.add_progress(today(), ProgressUpdate::completed(vec![5, 6]));

    let entries: Vec<_> = store.progress().iter().filter(|e| e.date == today()).collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].completed_exercises, vec![5, 6]);
}

// ---------------------------------------------------------------------------
// Confirm, clear, remove
// ---------------------------------------------------------------------------

#[test]
fn confirm_schedules_every_item() {
    let mut store = Store::new();
    for exercise in fallback_exercises().into_iter().take(4) {
        store.add_to_plan(exercise);
    }
    store.confirm_plan();
    assert!(store.plan().iter().all(|item| item.scheduled));
}

#[test]
fn clear_is_safe_on_empty_plan() {
    let mut store = Store::new();
    store.clear_plan();
    assert!(store.plan().is_empty());

    store.add_to_plan(ExerciseRecord::named("Burpees"));
    store.clear_plan();
    store.clear_plan();
    assert_eq!(store.plan().len(), 0);
}

#[test]
fn removing_unknown_id_changes_nothing() {
    let mut store = Store::new();
    store.add_to_plan(sample_exercise("Deadlifts"));
    store.add_to_plan(sample_exercise("Pull-ups"));
    let before = store.plan().to_vec();

    assert!(!store.remove_from_plan(12_345));
    assert_eq!(store.plan(), before.as_slice());
}

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

#[test]
fn add_confirm_and_track_push_ups() {
    let mut store = Store::new();
    store.cache_exercises(fallback_exercises());

    let push_ups = store
        .exercises()
        .iter()
        .find(|e| e.name == "Push-ups")
        .cloned()
        .expect("sample catalog contains Push-ups");

    store.add_to_plan(push_ups.clone());
    assert_eq!(store.plan().len(), 1);
    store.add_to_plan(push_ups);
    assert_eq!(store.plan().len(), 1);

    store.confirm_plan();
    let item = &store.plan()[0];
    assert!(item.scheduled);
    let id = item.id;

    assert!(toggle_completion(&mut store, today(), id));
    assert_eq!(store.progress().len(), 1);
    assert_eq!(store.progress()[0].date, today());
    assert_eq!(store.progress()[0].completed_exercises, vec![id]);

    let summary = daily_summary(&store, today());
    assert_eq!((summary.completed, summary.total), (1, 1));

    assert!(!toggle_completion(&mut store, today(), id));
    assert_eq!(store.progress().len(), 1);
    assert!(store.progress()[0].completed_exercises.is_empty());
}
