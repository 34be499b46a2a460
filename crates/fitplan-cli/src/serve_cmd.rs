use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use fitplan_core::browse::BrowseQuery;
use fitplan_core::store::loader::{ensure_catalog, refresh_catalog};
use fitplan_core::tracking::{self, DailySummary};
use fitplan_core::{
    AddOutcome, Catalog, ExerciseFilter, ExerciseRecord, PlanItem, PlanItemUpdate, ProfileDraft,
    ProgressEntry, ProgressUpdate, Store, UserProfile,
};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
    catalog: Catalog,
    cancel: CancellationToken,
}

impl AppState {
    pub fn new(catalog: Catalog, cancel: CancellationToken) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::new())),
            catalog,
            cancel,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Converts a handler panic into a 500 with a static JSON body.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "request handler panicked");

    let body = serde_json::json!({ "error": "internal server error" });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub profile: UserProfile,
    pub plan: Vec<PlanItem>,
    pub progress: Vec<ProgressEntry>,
    pub loading: bool,
    pub error: Option<String>,
    pub cached_exercises: usize,
}

/// Catalog entry as listed by `/api/exercises`.
#[derive(Debug, Serialize)]
pub struct ExerciseView {
    #[serde(flatten)]
    pub exercise: ExerciseRecord,
    pub in_plan: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub scheduled: usize,
    pub plan: Vec<PlanItem>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub completed: bool,
    pub entry: ProgressEntry,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub today: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/state", get(get_state))
        .route("/api/profile", get(get_profile).put(put_profile))
        .route("/api/exercises", get(list_exercises))
        .route("/api/exercises/refresh", post(refresh_exercises))
        .route("/api/plan", get(get_plan).post(add_plan_item).delete(clear_plan))
        .route("/api/plan/confirm", post(confirm_plan))
        .route(
            "/api/plan/{id}",
            patch(update_plan_item).delete(remove_plan_item),
        )
        .route("/api/progress", get(list_progress))
        .route("/api/progress/week", get(week_overview))
        .route("/api/progress/{date}", put(put_progress))
        .route("/api/progress/{date}/summary", get(daily_summary))
        .route("/api/progress/{date}/toggle/{id}", post(toggle_completion))
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(catalog: Catalog, bind: &str, port: u16) -> Result<()> {
    let cancel = CancellationToken::new();
    let app = build_router(AppState::new(catalog, cancel.clone()));
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address {bind}:{port}"))?;
    tracing::info!("fitplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await?;
    tracing::info!("fitplan serve shut down");
    Ok(())
}

/// Resolves on Ctrl-C, cancelling in-flight catalog fetches first.
async fn shutdown_signal(cancel: CancellationToken) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
    cancel.cancel();
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("invalid date {raw:?}, expected YYYY-MM-DD")))
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock().await;
    let today = local_today();
    let summary = tracking::daily_summary(&store, today);

    let rows = if store.plan().is_empty() {
        "<tr><td colspan=\"4\">Your plan is empty.</td></tr>".to_string()
    } else {
        tracking::scheduled_status(&store, today)
            .into_iter()
            .map(|(item, done)| (item.id, item.name().to_string(), true, done))
            .chain(
                store
                    .plan()
                    .iter()
                    .filter(|item| !item.scheduled)
                    .map(|item| (item.id, item.name().to_string(), false, false)),
            )
            .map(|(id, name, scheduled, done)| {
                format!(
                    "<tr><td>{id}</td><td>{name}</td><td>{scheduled}</td><td>{done}</td></tr>",
                    name = escape_html(&name),
                    scheduled = if scheduled { "yes" } else { "no" },
                    done = if done { "done" } else { "" },
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    Html(format!(
        "<!DOCTYPE html>\
<html><head><title>fitplan</title></head><body>\
<h1>fitplan</h1>\
<p>{label}: {completed}/{total} completed</p>\
<p><a href=\"/api/state\">/api/state</a> | <a href=\"/api/exercises\">/api/exercises</a> | <a href=\"/api/progress/week\">/api/progress/week</a></p>\
<table><tr><th>ID</th><th>Exercise</th><th>Scheduled</th><th>Today</th></tr>{rows}</table>\
</body></html>",
        label = tracking::day_label(today, today),
        completed = summary.completed,
        total = summary.total,
    ))
}

async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let store = state.store.lock().await;
    Json(StateResponse {
        profile: store.profile().clone(),
        plan: store.plan().to_vec(),
        progress: store.progress().to_vec(),
        loading: store.is_loading(),
        error: store.error().map(str::to_string),
        cached_exercises: store.exercises().len(),
    })
}

async fn get_profile(State(state): State<AppState>) -> Json<UserProfile> {
    Json(state.store.lock().await.profile().clone())
}

async fn put_profile(State(state): State<AppState>, Json(draft): Json<ProfileDraft>) -> Response {
    let mut store = state.store.lock().await;
    match store.save_profile(&draft) {
        Ok(()) => Json(store.profile().clone()).into_response(),
        Err(validation) => {
            tracing::debug!(%validation, "rejected profile update");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(validation)).into_response()
        }
    }
}

async fn list_exercises(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Json<Vec<ExerciseView>> {
    let exercises = ensure_catalog(&state.store, &state.catalog, &state.cancel).await;
    let store = state.store.lock().await;
    let views = query
        .apply(&exercises)
        .into_iter()
        .map(|exercise| ExerciseView {
            in_plan: store.is_in_plan(&exercise.name),
            exercise,
        })
        .collect();
    Json(views)
}

async fn refresh_exercises(
    State(state): State<AppState>,
    Query(filter): Query<ExerciseFilter>,
) -> Response {
    let fetch = refresh_catalog(&state.store, &state.catalog, &filter, &state.cancel).await;
    Json(fetch).into_response()
}

async fn get_plan(State(state): State<AppState>) -> Json<Vec<PlanItem>> {
    Json(state.store.lock().await.plan().to_vec())
}

async fn add_plan_item(
    State(state): State<AppState>,
    Json(exercise): Json<ExerciseRecord>,
) -> Result<Response, AppError> {
    if exercise.name.trim().is_empty() {
        return Err(AppError::unprocessable("exercise name is required"));
    }

    let mut store = state.store.lock().await;
    let outcome = store.add_to_plan(exercise);
    let status = match outcome {
        AddOutcome::Added(_) => StatusCode::CREATED,
        AddOutcome::AlreadyPresent(_) => StatusCode::OK,
    };
    let item = store
        .plan_item(outcome.id())
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("plan item {} not found", outcome.id())))?;
    Ok((status, Json(item)).into_response())
}

async fn clear_plan(State(state): State<AppState>) -> StatusCode {
    state.store.lock().await.clear_plan();
    StatusCode::NO_CONTENT
}

async fn update_plan_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(update): Json<PlanItemUpdate>,
) -> Result<Json<PlanItem>, AppError> {
    let mut store = state.store.lock().await;
    if !store.update_plan_item(id, update) {
        return Err(AppError::not_found(format!("plan item {id} not found")));
    }
    store
        .plan_item(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("plan item {id} not found")))
}

async fn remove_plan_item(State(state): State<AppState>, Path(id): Path<u64>) -> StatusCode {
    state.store.lock().await.remove_from_plan(id);
    StatusCode::NO_CONTENT
}

async fn confirm_plan(
    State(state): State<AppState>,
    Json(request): Json<ConfirmRequest>,
) -> Response {
    let mut store = state.store.lock().await;
    match store.schedule_plan(&request.schedule, &request.duration) {
        Ok(scheduled) => Json(ConfirmResponse {
            scheduled,
            plan: store.plan().to_vec(),
        })
        .into_response(),
        Err(validation) => {
            tracing::debug!(%validation, "rejected plan confirmation");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(validation)).into_response()
        }
    }
}

async fn list_progress(State(state): State<AppState>) -> Json<Vec<ProgressEntry>> {
    Json(state.store.lock().await.progress().to_vec())
}

async fn put_progress(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(update): Json<ProgressUpdate>,
) -> Result<Json<ProgressEntry>, AppError> {
    let date = parse_date(&date)?;
    let mut store = state.store.lock().await;
    Ok(Json(store.add_progress(date, update).clone()))
}

async fn toggle_completion(
    State(state): State<AppState>,
    Path((date, id)): Path<(String, u64)>,
) -> Result<Json<ToggleResponse>, AppError> {
    let date = parse_date(&date)?;
    let mut store = state.store.lock().await;
    let completed = tracking::toggle_completion(&mut store, date, id);
    let entry = store
        .progress_for(date)
        .cloned()
        .unwrap_or_else(|| ProgressEntry::new(date));
    Ok(Json(ToggleResponse { completed, entry }))
}

async fn daily_summary(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DailySummary>, AppError> {
    let date = parse_date(&date)?;
    let store = state.store.lock().await;
    Ok(Json(tracking::daily_summary(&store, date)))
}

async fn week_overview(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<Vec<DailySummary>>, AppError> {
    let today = match query.today.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => local_today(),
    };
    let store = state.store.lock().await;
    Ok(Json(tracking::week_overview(&store, today)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
