//! Catalog load flow around a shared [`Store`].
//!
//! The store lock is released while the request is in flight, so readers
//! observe `loading = true` until the fetch settles. The fetch and the settle
//! step run on their own task: dropping the caller's future does not leave
//! `loading` set. Two overlapping loads are not deduplicated; the later one
//! to finish wins.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::Store;
use crate::catalog::{Catalog, CatalogFetch, ExerciseFilter, FallbackReason};
use crate::model::ExerciseRecord;

/// Fetch `filter` from `catalog` and replace the store's exercise cache.
pub async fn refresh_catalog(
    store: &Arc<Mutex<Store>>,
    catalog: &Catalog,
    filter: &ExerciseFilter,
    cancel: &CancellationToken,
) -> CatalogFetch {
    store.lock().await.begin_catalog_load();

    let load = tokio::spawn({
        let store = Arc::clone(store);
        let catalog = catalog.clone();
        let filter = filter.clone();
        let cancel = cancel.clone();
        async move {
            let fetch = catalog.fetch_exercises(&filter, &cancel).await;
            store.lock().await.finish_catalog_load(&fetch);
            fetch
        }
    });

    match load.await {
        Ok(fetch) => fetch,
        Err(err) => {
            tracing::error!(error = %err, "catalog load task failed");
            let fetch = CatalogFetch::fallback(FallbackReason::Transport(format!(
                "catalog load task failed: {err}"
            )));
            store.lock().await.finish_catalog_load(&fetch);
            fetch
        }
    }
}

/// Return the cached exercises, loading the unfiltered catalog first if the
/// cache is empty.
pub async fn ensure_catalog(
    store: &Arc<Mutex<Store>>,
    catalog: &Catalog,
    cancel: &CancellationToken,
) -> Vec<ExerciseRecord> {
    {
        let guard = store.lock().await;
        if !guard.exercises().is_empty() {
            return guard.exercises().to_vec();
        }
    }

    refresh_catalog(store, catalog, &ExerciseFilter::default(), cancel)
        .await
        .exercises
}
