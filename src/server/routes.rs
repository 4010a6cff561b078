//! Axum route handlers for the persona engine HTTP server.
//!
//! # Routes
//!
//! - `GET  /health`               — Returns `{"status": "ok", "version": "1.0.0"}`
//! - `GET  /status`               — Lifecycle, affect, stance, history length
//! - `GET  /loci`                 — Loci in presentation order
//! - `POST /stance`               — `{ "r", "w", "c" }`
//! - `POST /stance/preset/:name`  — Apply a named stance
//! - `POST /drift`                — `{ "locus_id", "direction": -1 | 1 }`
//! - `POST /project`              — `{ "influence", "intimacy" }`
//! - `POST /tick`                 — One affect decay step
//! - `POST /reset`                — Restore the session as constructed
//! - `GET  /history`              — Records, most recent first
//! - `GET  /history/:index`       — Replay one record
//! - `GET  /inspect`              — Plain-text genome report

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::affect::Pad;
use crate::drift::{Direction, DriftOutcome};
use crate::error::PersonaError;
use crate::genome::Locus;
use crate::projection::ProjectionRecord;
use crate::session::{SessionStatus, SharedSession};
use crate::stance::StanceVector;

/// Shared application state for the HTTP server.
#[derive(Clone, Debug)]
pub struct AppState {
    pub session: SharedSession,
}

impl AppState {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/loci", get(loci_handler))
        .route("/stance", post(stance_handler))
        .route("/stance/preset/:name", post(preset_handler))
        .route("/drift", post(drift_handler))
        .route("/project", post(project_handler))
        .route("/tick", post(tick_handler))
        .route("/reset", post(reset_handler))
        .route("/history", get(history_handler))
        .route("/history/:index", get(replay_handler))
        .route("/inspect", get(inspect_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Errors
// ============================================================================

/// `PersonaError` rendered as `{"error": "..."}` with a matching status.
pub struct ApiError(PersonaError);

impl From<PersonaError> for ApiError {
    fn from(e: PersonaError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            PersonaError::NotFound(_) | PersonaError::OutOfRange { .. } => StatusCode::NOT_FOUND,
            PersonaError::Locked(_) => StatusCode::CONFLICT,
            PersonaError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DriftRequest {
    pub locus_id: String,
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub influence: f64,
    pub intimacy: f64,
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "persona-engine",
    }))
}

async fn status_handler(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.session.lock().status())
}

async fn loci_handler(State(state): State<AppState>) -> Json<Vec<Locus>> {
    let session = state.session.lock();
    Json(session.renderable_loci().into_iter().cloned().collect())
}

async fn stance_handler(
    State(state): State<AppState>,
    Json(stance): Json<StanceVector>,
) -> ApiResult<StanceVector> {
    Ok(Json(state.session.lock().apply_stance(stance)?))
}

async fn preset_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StanceVector> {
    Ok(Json(state.session.lock().apply_preset(&name)?))
}

async fn drift_handler(
    State(state): State<AppState>,
    Json(req): Json<DriftRequest>,
) -> ApiResult<DriftOutcome> {
    Ok(Json(state.session.lock().apply_drift(&req.locus_id, req.direction)?))
}

async fn project_handler(
    State(state): State<AppState>,
    Json(req): Json<ProjectRequest>,
) -> Json<ProjectionRecord> {
    Json(state.session.lock().project(req.influence, req.intimacy))
}

async fn tick_handler(State(state): State<AppState>) -> Json<Pad> {
    Json(state.session.lock().tick())
}

async fn reset_handler(State(state): State<AppState>) -> ApiResult<SessionStatus> {
    let mut session = state.session.lock();
    session.reset()?;
    Ok(Json(session.status()))
}

async fn history_handler(State(state): State<AppState>) -> Json<Vec<ProjectionRecord>> {
    Json(state.session.lock().history().to_vec())
}

async fn replay_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<ProjectionRecord> {
    Ok(Json(state.session.lock().replay(index)?))
}

async fn inspect_handler(State(state): State<AppState>) -> String {
    state.session.lock().inspect()
}

// ============================================================================
// Tests
// ============================================================================
