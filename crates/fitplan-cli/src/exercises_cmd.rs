//! `fitplan exercises` command: fetch and list the exercise catalog.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use fitplan_core::browse::BrowseQuery;
use fitplan_core::{Catalog, CatalogFetch, ExerciseFilter, ExerciseRecord, FetchOrigin};

/// Options for the exercises command.
#[derive(Debug, Default)]
pub struct ExercisesOptions {
    pub muscle: Option<String>,
    pub kind: Option<String>,
    pub difficulty: Option<String>,
    pub search: Option<String>,
    pub json: bool,
}

impl ExercisesOptions {
    fn filter(&self) -> ExerciseFilter {
        ExerciseFilter {
            muscle: self.muscle.clone(),
            kind: self.kind.clone(),
            difficulty: self.difficulty.clone(),
        }
    }

    /// Local filter applied after the fetch. Attribute filters are repeated
    /// so the sample set honours them too.
    fn browse_query(&self) -> BrowseQuery {
        BrowseQuery {
            search: self.search.clone(),
            muscle: self.muscle.clone(),
            kind: self.kind.clone(),
            difficulty: self.difficulty.clone(),
        }
    }
}

/// Run the exercises command. Ctrl-C cancels the fetch.
pub async fn run_exercises(catalog: &Catalog, options: &ExercisesOptions) -> Result<()> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let fetch = catalog.fetch_exercises(&options.filter(), &cancel).await;
    watcher.abort();

    let shown = options.browse_query().apply(&fetch.exercises);

    if options.json {
        let body = serde_json::to_string_pretty(&shown).context("failed to serialize exercises")?;
        println!("{body}");
    } else {
        print!("{}", render_table(&shown));
    }

    if let Some(note) = fallback_note(&fetch) {
        eprintln!("{note}");
    }

    Ok(())
}

/// Message shown when the sample set is displayed instead of the live catalog.
fn fallback_note(fetch: &CatalogFetch) -> Option<String> {
    match &fetch.source {
        FetchOrigin::Remote => None,
        FetchOrigin::Fallback(reason) => Some(format!("Showing sample exercises ({reason}).")),
    }
}

fn render_table(exercises: &[ExerciseRecord]) -> String {
    if exercises.is_empty() {
        return "No exercises match.\n".to_string();
    }

    let mut out = format!(
        "{:<28} {:<14} {:<22} {:<13} {:<16}\n",
        "NAME", "MUSCLE", "TYPE", "DIFFICULTY", "EQUIPMENT"
    );
    out.push_str(&"-".repeat(97));
    out.push('\n');

    for exercise in exercises {
        out.push_str(&format!(
            "{:<28} {:<14} {:<22} {:<13} {:<16}\n",
            truncate(&exercise.name, 28),
            exercise.muscle.as_deref().unwrap_or("-"),
            exercise.kind.as_deref().unwrap_or("-"),
            exercise.difficulty.as_deref().unwrap_or("-"),
            truncate(exercise.equipment.as_deref().unwrap_or("-"), 16),
        ));
    }
    out
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let head: String = value.chars().take(width - 3).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}
