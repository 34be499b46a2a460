//! Catalog load flow against a shared store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use fitplan_core::catalog::{Catalog, ExerciseFilter, FallbackReason, FetchOrigin};
use fitplan_core::store::loader::{ensure_catalog, refresh_catalog};
use fitplan_core::{ExerciseRecord, Store};
use fitplan_test_utils::{FailingSource, HangingSource, StaticSource, sample_exercise};

fn shared_store() -> Arc<Mutex<Store>> {
    Arc::new(Mutex::new(Store::new()))
}

async fn wait_for_loading(store: &Mutex<Store>, expected: bool) -> bool {
    for _ in 0..200 {
        if store.lock().await.is_loading() == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn successful_refresh_caches_remote_list() {
    let store = shared_store();
    let catalog = Catalog::new(StaticSource(vec![sample_exercise("Rowing")]));

    let fetch = refresh_catalog(
        &store,
        &catalog,
        &ExerciseFilter::default(),
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(fetch.source, FetchOrigin::Remote);
    let guard = store.lock().await;
    assert!(!guard.is_loading());
    assert_eq!(guard.error(), None);
    assert_eq!(guard.exercises().len(), 1);
    assert_eq!(guard.exercises()[0].name, "Rowing");
}

#[tokio::test]
async fn failed_refresh_caches_fallback_and_records_error() {
    let store = shared_store();
    let catalog = Catalog::new(FailingSource);

    refresh_catalog(
        &store,
        &catalog,
        &ExerciseFilter::default(),
        &CancellationToken::new(),
    )
    .await;

    let guard = store.lock().await;
    assert!(!guard.is_loading());
    assert_eq!(guard.exercises().len(), 8);
    let error = guard.error().expect("failure should be recorded");
    assert!(error.contains("connection refused"), "got: {error}");
}

#[tokio::test]
async fn empty_remote_list_is_not_an_error() {
    let store = shared_store();
    let catalog = Catalog::new(StaticSource(Vec::new()));

    let fetch = refresh_catalog(
        &store,
        &catalog,
        &ExerciseFilter::default(),
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(fetch.source, FetchOrigin::Fallback(FallbackReason::Empty));
    let guard = store.lock().await;
    assert_eq!(guard.exercises().len(), 8);
    assert_eq!(guard.error(), None);
}

#[tokio::test]
async fn successful_refresh_clears_previous_error() {
    let store = shared_store();
    let cancel = CancellationToken::new();
    let filter = ExerciseFilter::default();

    refresh_catalog(&store, &Catalog::new(FailingSource), &filter, &cancel).await;
    assert!(store.lock().await.error().is_some());

    let healthy = Catalog::new(StaticSource(vec![sample_exercise("Dips")]));
    refresh_catalog(&store, &healthy, &filter, &cancel).await;
    assert_eq!(store.lock().await.error(), None);
}

#[tokio::test]
async fn ensure_catalog_skips_fetch_when_cache_is_warm() {
    let store = shared_store();
    store
        .lock()
        .await
        .cache_exercises(vec![ExerciseRecord::named("Cached")]);

    // A failing source would replace the cache with the sample set.
    let exercises = ensure_catalog(&store, &Catalog::new(FailingSource), &CancellationToken::new()).await;

    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0].name, "Cached");
    assert_eq!(store.lock().await.error(), None);
}

#[tokio::test]
async fn ensure_catalog_loads_cold_cache() {
    let store = shared_store();
    let catalog = Catalog::new(StaticSource(vec![sample_exercise("Rowing"), sample_exercise("Dips")]));

    let exercises = ensure_catalog(&store, &catalog, &CancellationToken::new()).await;

    assert_eq!(exercises.len(), 2);
    assert_eq!(store.lock().await.exercises().len(), 2);
}

#[tokio::test]
async fn loading_flag_is_visible_while_in_flight_and_cleared_on_cancel() {
    let store = shared_store();
    let catalog = Catalog::new(HangingSource).with_timeout(Duration::from_secs(60));
    let cancel = CancellationToken::new();

    let task = {
        let store = Arc::clone(&store);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            refresh_catalog(&store, &catalog, &ExerciseFilter::default(), &cancel).await
        })
    };

    assert!(
        wait_for_loading(&store, true).await,
        "loading flag never became visible"
    );

    cancel.cancel();
    let fetch = task.await.expect("load task panicked");

    assert_eq!(fetch.source, FetchOrigin::Fallback(FallbackReason::Cancelled));
    let guard = store.lock().await;
    assert!(!guard.is_loading());
    assert_eq!(guard.exercises().len(), 8);
}

#[tokio::test]
async fn timed_out_load_still_settles() {
    let store = shared_store();
    let catalog = Catalog::new(HangingSource).with_timeout(Duration::from_millis(50));

    let fetch = refresh_catalog(
        &store,
        &catalog,
        &ExerciseFilter::default(),
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(fetch.source, FetchOrigin::Fallback(FallbackReason::TimedOut));
    let guard = store.lock().await;
    assert!(!guard.is_loading());
    assert_eq!(guard.error(), Some("catalog request timed out"));
}

#[tokio::test]
async fn dropped_load_still_clears_loading_flag() {
    let store = shared_store();
    let catalog = Catalog::new(HangingSource).with_timeout(Duration::from_millis(100));

    let task = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            refresh_catalog(
                &store,
                &catalog,
                &ExerciseFilter::default(),
                &CancellationToken::new(),
            )
            .await
        })
    };

    assert!(wait_for_loading(&store, true).await, "load never started");
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert!(
        wait_for_loading(&store, false).await,
        "loading flag left set after the caller was dropped"
    );
    let guard = store.lock().await;
    assert_eq!(guard.exercises().len(), 8);
    assert_eq!(guard.error(), Some("catalog request timed out"));
}
