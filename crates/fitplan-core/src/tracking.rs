//! Daily completion tracking on top of [`Store`].
//!
//! The store only knows how to upsert a progress entry by date; toggling a
//! single exercise and summarising a day or week happen here.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::model::{PlanItem, ProgressUpdate};
use crate::store::Store;

/// Completion counts for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Scheduled items recorded as completed on `date`.
    pub completed: usize,
    /// Scheduled items in the plan.
    pub total: usize,
    /// `completed / total * 100`, or 0 when nothing is scheduled.
    pub percent: f64,
}

/// Flip the completion state of plan item `id` on `date`.
///
/// Returns `true` if the exercise is now marked completed.
pub fn toggle_completion(store: &mut Store, date: NaiveDate, id: u64) -> bool {
    let mut completed = store
        .progress_for(date)
        .map(|entry| entry.completed_exercises.clone())
        .unwrap_or_default();

    let now_completed = match completed.iter().position(|&done| done == id) {
        Some(index) => {
            completed.remove(index);
            false
        }
        None => {
            completed.push(id);
            true
        }
    };

    store.add_progress(date, ProgressUpdate::completed(completed));
    tracing::info!(%date, id, completed = now_completed, "toggled exercise completion");
    now_completed
}

/// Each scheduled item paired with whether it was completed on `date`.
pub fn scheduled_status(store: &Store, date: NaiveDate) -> Vec<(PlanItem, bool)> {
    let entry = store.progress_for(date);
    store
        .scheduled_items()
        .map(|item| {
            let done = entry.is_some_and(|e| e.is_completed(item.id));
            (item.clone(), done)
        })
        .collect()
}

pub fn daily_summary(store: &Store, date: NaiveDate) -> DailySummary {
    let status = scheduled_status(store, date);
    let total = status.len();
    let completed = status.iter().filter(|(_, done)| *done).count();
    let percent = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    };

    DailySummary {
        date,
        completed,
        total,
        percent,
    }
}

/// Summaries for the seven days ending at `today`, oldest first.
pub fn week_overview(store: &Store, today: NaiveDate) -> Vec<DailySummary> {
    (0..7u64)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| daily_summary(store, date))
        .collect()
}

/// "Today", "Yesterday", or a short form such as "Mon, Jan 5".
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "Today".to_string();
    }
    if today.pred_opt() == Some(date) {
        return "Yesterday".to_string();
    }
    date.format("%a, %b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExerciseRecord;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn scheduled_store(names: &[&str]) -> (Store, Vec<u64>) {
        let mut store = Store::new();
        let ids = names
            .iter()
            .map(|name| store.add_to_plan(ExerciseRecord::named(*name)).id())
            .collect();
        store.confirm_plan();
        (store, ids)
    }

    #[test]
    fn toggle_adds_then_removes() {
        let (mut store, ids) = scheduled_store(&["Plank"]);
        assert!(toggle_completion(&mut store, day(5), ids[0]));
        assert_eq!(store.progress_for(day(5)).unwrap().completed_exercises, vec![ids[0]]);

        assert!(!toggle_completion(&mut store, day(5), ids[0]));
        assert!(store.progress_for(day(5)).unwrap().completed_exercises.is_empty());
        assert_eq!(store.progress().len(), 1);
    }

    #[test]
    fn toggle_keeps_completion_order() {
        let (mut store, ids) = scheduled_store(&["A", "B", "C"]);
        toggle_completion(&mut store, day(5), ids[2]);
        toggle_completion(&mut store, day(5), ids[0]);
        assert_eq!(
            store.progress_for(day(5)).unwrap().completed_exercises,
            vec![ids[2], ids[0]]
        );
    }

    #[test]
    fn summary_counts_only_scheduled_items() {
        let (mut store, ids) = scheduled_store(&["A", "B"]);
        store.add_to_plan(ExerciseRecord::named("Unscheduled"));
        toggle_completion(&mut store, day(6), ids[1]);
        toggle_completion(&mut store, day(6), 999);

        let summary = daily_summary(&store, day(6));
        assert_eq!(summary.total, 2);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.percent, 50.0);
    }

    #[test]
    fn summary_with_nothing_scheduled_is_zero() {
        let store = Store::new();
        let summary = daily_summary(&store, day(1));
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percent, 0.0);
    }

    #[test]
    fn week_overview_spans_seven_days_oldest_first() {
        let (mut store, ids) = scheduled_store(&["A"]);
        toggle_completion(&mut store, day(10), ids[0]);

        let week = week_overview(&store, day(10));
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, day(4));
        assert_eq!(week[6].date, day(10));
        assert_eq!(week[6].completed, 1);
        assert!(week[..6].iter().all(|s| s.completed == 0));
    }

    #[test]
    fn labels() {
        assert_eq!(day_label(day(10), day(10)), "Today");
        assert_eq!(day_label(day(9), day(10)), "Yesterday");
        assert_eq!(day_label(day(5), day(10)), "Mon, Jan 5");
    }
}
