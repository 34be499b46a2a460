//! Shared test utilities for fitplan integration tests.
//!
//! Provides:
//! - in-process [`CatalogSource`] stubs that succeed, fail, or never answer;
//! - [`StubCatalogServer`], a real HTTP catalog bound to `127.0.0.1` on an
//!   ephemeral port, for exercising `HttpCatalogClient` end to end.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use fitplan_core::ExerciseRecord;
use fitplan_core::catalog::{CatalogError, CatalogSource, ExerciseFilter};

/// Path the stub server serves the catalog on.
pub const STUB_CATALOG_PATH: &str = "/v1/exercises";

/// A fully populated exercise record named `name`.
pub fn sample_exercise(name: &str) -> ExerciseRecord {
    ExerciseRecord::named(name)
        .with_kind("strength")
        .with_muscle("chest")
        .with_equipment("body weight")
        .with_difficulty("beginner")
        .with_instructions(format!("Perform {name} with control."))
}

// ---------------------------------------------------------------------------
// In-process sources
// ---------------------------------------------------------------------------

/// Always answers with the same list.
pub struct StaticSource(pub Vec<ExerciseRecord>);

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch(&self, _filter: &ExerciseFilter) -> Result<Vec<ExerciseRecord>, CatalogError> {
        Ok(self.0.clone())
    }
}

/// Always fails with a transport error.
pub struct FailingSource;

#[async_trait]
impl CatalogSource for FailingSource {
    async fn fetch(&self, _filter: &ExerciseFilter) -> Result<Vec<ExerciseRecord>, CatalogError> {
        Err(CatalogError::Transport("connection refused".to_string()))
    }
}

/// Never answers.
pub struct HangingSource;

#[async_trait]
impl CatalogSource for HangingSource {
    async fn fetch(&self, _filter: &ExerciseFilter) -> Result<Vec<ExerciseRecord>, CatalogError> {
        std::future::pending().await
    }
}

// ---------------------------------------------------------------------------
// Stub HTTP server
// ---------------------------------------------------------------------------

/// How the stub server answers every request.
#[derive(Debug, Clone)]
pub enum StubMode {
    Exercises(Vec<ExerciseRecord>),
    Empty,
    Status(u16),
    /// 200 with a body that is not a JSON array.
    Malformed,
    /// Accept the request and never respond.
    Hang,
}

/// What the stub server saw for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Clone)]
struct StubState {
    mode: Arc<StubMode>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A catalog HTTP server running on a background task. Stops on drop.
pub struct StubCatalogServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl StubCatalogServer {
    pub async fn start(mode: StubMode) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub catalog listener");
        let addr = listener
            .local_addr()
            .expect("failed to read stub catalog address");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            mode: Arc::new(mode),
            requests: Arc::clone(&requests),
        };
        let app = Router::new()
            .route(STUB_CATALOG_PATH, get(serve_catalog))
            .with_state(state);

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("stub catalog server failed");
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    /// Base URL to hand to `HttpCatalogClient::new`.
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, STUB_CATALOG_PATH)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("stub request log poisoned")
            .clone()
    }
}

impl Drop for StubCatalogServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve_catalog(State(state): State<StubState>, uri: Uri, headers: HeaderMap) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state
        .requests
        .lock()
        .expect("stub request log poisoned")
        .push(RecordedRequest {
            query: uri.query().map(str::to_string),
            content_type: header("content-type"),
            api_key: header("x-api-key"),
        });

    match state.mode.as_ref() {
        StubMode::Exercises(list) => Json(list.clone()).into_response(),
        StubMode::Empty => Json(Vec::<ExerciseRecord>::new()).into_response(),
        StubMode::Status(code) => StatusCode::from_u16(*code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        StubMode::Malformed => (StatusCode::OK, "not a json array").into_response(),
        StubMode::Hang => {
            std::future::pending::<()>().await;
            StatusCode::OK.into_response()
        }
    }
}
