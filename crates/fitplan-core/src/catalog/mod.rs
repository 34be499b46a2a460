//! Exercise catalog client.
//!
//! A [`CatalogSource`] performs the raw request and may fail. [`Catalog`]
//! wraps a source with a timeout, a cancellation token and the fallback
//! policy: whenever the source fails, times out, is cancelled or returns an
//! empty list, the caller receives the fixed sample set from
//! [`fallback_exercises`] instead. `Catalog::fetch_exercises` therefore never
//! returns an error; [`CatalogFetch::source`] records where the exercises
//! came from.

pub mod fallback;
pub mod http;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::model::ExerciseRecord;

pub use fallback::fallback_exercises;
pub use http::HttpCatalogClient;

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Server-side filter; each set field becomes a query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseFilter {
    #[serde(default)]
    pub muscle: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl ExerciseFilter {
    pub fn by_muscle(muscle: impl Into<String>) -> Self {
        Self {
            muscle: Some(muscle.into()),
            ..Self::default()
        }
    }

    pub fn by_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Query parameters for the set, non-blank fields, in a fixed order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("muscle", self.muscle.as_deref()),
            ("type", self.kind.as_deref()),
            ("difficulty", self.difficulty.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| match value {
            Some(v) if !v.trim().is_empty() => Some((key, v)),
            _ => None,
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Errors a [`CatalogSource`] can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(String),

    #[error("catalog returned HTTP {0}")]
    Status(u16),

    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

/// Raw access to an exercise catalog.
///
/// Implementations only fetch; timeouts, cancellation and fallback are
/// applied by [`Catalog`].
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self, filter: &ExerciseFilter) -> Result<Vec<ExerciseRecord>, CatalogError>;
}

// ---------------------------------------------------------------------------
// Fetch result
// ---------------------------------------------------------------------------

/// Why the sample exercises were served instead of the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    Transport(String),
    Status(u16),
    Decode(String),
    /// The catalog answered with an empty list.
    Empty,
    TimedOut,
    Cancelled,
}

impl FallbackReason {
    /// `true` for every reason except [`FallbackReason::Empty`], which is a
    /// successful request that simply had nothing to offer.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "catalog request failed: {msg}"),
            Self::Status(code) => write!(f, "catalog returned HTTP {code}"),
            Self::Decode(msg) => write!(f, "catalog response could not be decoded: {msg}"),
            Self::Empty => f.write_str("catalog returned no exercises"),
            Self::TimedOut => f.write_str("catalog request timed out"),
            Self::Cancelled => f.write_str("catalog request was cancelled"),
        }
    }
}

impl From<CatalogError> for FallbackReason {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Transport(msg) => Self::Transport(msg),
            CatalogError::Status(code) => Self::Status(code),
            CatalogError::Decode(msg) => Self::Decode(msg),
        }
    }
}

/// Where a [`CatalogFetch`] got its exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOrigin {
    Remote,
    Fallback(FallbackReason),
}

/// Outcome of [`Catalog::fetch_exercises`]; never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogFetch {
    pub exercises: Vec<ExerciseRecord>,
    pub source: FetchOrigin,
}

impl CatalogFetch {
    pub fn fallback(reason: FallbackReason) -> Self {
        Self {
            exercises: fallback_exercises(),
            source: FetchOrigin::Fallback(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, FetchOrigin::Fallback(_))
    }

    /// The fallback reason, if the request failed outright.
    pub fn failure(&self) -> Option<&FallbackReason> {
        match &self.source {
            FetchOrigin::Fallback(reason) if reason.is_failure() => Some(reason),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A [`CatalogSource`] with a bounded, cancellable, fallback-on-failure fetch.
#[derive(Clone)]
pub struct Catalog {
    source: Arc<dyn CatalogSource>,
    timeout: Duration,
}

impl Catalog {
    /// Default upper bound on a single fetch.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch exercises matching `filter`.
    ///
    /// Resolves to the remote list on success, otherwise to the sample set
    /// with the reason recorded. Resolves within the configured timeout, or
    /// as soon as `cancel` fires.
    pub async fn fetch_exercises(
        &self,
        filter: &ExerciseFilter,
        cancel: &CancellationToken,
    ) -> CatalogFetch {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FallbackReason::Cancelled),
            result = tokio::time::timeout(self.timeout, self.source.fetch(filter)) => match result {
                Err(_elapsed) => Err(FallbackReason::TimedOut),
                Ok(Err(err)) => Err(FallbackReason::from(err)),
                Ok(Ok(list)) if list.is_empty() => Err(FallbackReason::Empty),
                Ok(Ok(list)) => Ok(list),
            },
        };

        match outcome {
            Ok(exercises) => {
                tracing::info!(count = exercises.len(), "fetched exercise catalog");
                CatalogFetch {
                    exercises,
                    source: FetchOrigin::Remote,
                }
            }
            Err(reason) => {
                tracing::warn!(%reason, "catalog unavailable, serving sample exercises");
                CatalogFetch::fallback(reason)
            }
        }
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<Vec<ExerciseRecord>, CatalogError>);

    #[async_trait]
    impl CatalogSource for Fixed {
        async fn fetch(&self, _filter: &ExerciseFilter) -> Result<Vec<ExerciseRecord>, CatalogError> {
            self.0.clone()
        }
    }

    struct Never;

    #[async_trait]
    impl CatalogSource for Never {
        async fn fetch(&self, _filter: &ExerciseFilter) -> Result<Vec<ExerciseRecord>, CatalogError> {
            std::future::pending().await
        }
    }

    #[test]
    fn unset_filter_has_no_query_pairs() {
        assert!(ExerciseFilter::default().query_pairs().is_empty());
        assert!(ExerciseFilter::by_muscle("  ").is_empty());
    }

    #[test]
    fn filter_query_pairs_keep_order() {
        let filter = ExerciseFilter {
            muscle: Some("chest".to_string()),
            kind: Some("strength".to_string()),
            difficulty: Some("beginner".to_string()),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("muscle", "chest"),
                ("type", "strength"),
                ("difficulty", "beginner")
            ]
        );
    }

    #[tokio::test]
    async fn remote_list_is_returned_as_is() {
        let catalog = Catalog::new(Fixed(Ok(vec![ExerciseRecord::named("Rowing")])));
        let fetch = catalog
            .fetch_exercises(&ExerciseFilter::default(), &CancellationToken::new())
            .await;
        assert_eq!(fetch.source, FetchOrigin::Remote);
        assert_eq!(fetch.exercises.len(), 1);
        assert_eq!(fetch.exercises[0].name, "Rowing");
    }

    #[tokio::test]
    async fn error_status_falls_back() {
        let catalog = Catalog::new(Fixed(Err(CatalogError::Status(503))));
        let fetch = catalog
            .fetch_exercises(&ExerciseFilter::default(), &CancellationToken::new())
            .await;
        assert_eq!(
            fetch.source,
            FetchOrigin::Fallback(FallbackReason::Status(503))
        );
        assert_eq!(fetch.exercises, fallback_exercises());
    }

    #[tokio::test]
    async fn empty_list_falls_back_without_failure() {
        let catalog = Catalog::new(Fixed(Ok(vec![])));
        let fetch = catalog
            .fetch_exercises(&ExerciseFilter::default(), &CancellationToken::new())
            .await;
        assert!(fetch.is_fallback());
        assert!(fetch.failure().is_none());
        assert_eq!(fetch.exercises.len(), 8);
    }

    #[tokio::test]
    async fn hung_source_times_out() {
        let catalog = Catalog::new(Never).with_timeout(Duration::from_millis(20));
        let fetch = catalog
            .fetch_exercises(&ExerciseFilter::default(), &CancellationToken::new())
            .await;
        assert_eq!(fetch.source, FetchOrigin::Fallback(FallbackReason::TimedOut));
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let catalog = Catalog::new(Never);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let fetch = catalog
            .fetch_exercises(&ExerciseFilter::default(), &cancel)
            .await;
        assert_eq!(fetch.source, FetchOrigin::Fallback(FallbackReason::Cancelled));
    }

    #[test]
    fn fetch_origin_serializes_reason() {
        let json = serde_json::to_value(FetchOrigin::Fallback(FallbackReason::Status(500))).unwrap();
        assert_eq!(json, serde_json::json!({"fallback": {"reason": "status", "detail": 500}}));
        let json = serde_json::to_value(FetchOrigin::Remote).unwrap();
        assert_eq!(json, serde_json::json!("remote"));
    }
}
