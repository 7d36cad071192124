use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    CpmResult, EngineConfig, Schedule, ScheduleError, ScheduleSummary, SimulationMode,
    SimulationReport, TaskRecord,
};

#[derive(Clone)]
pub struct AppState {
    config: Arc<RwLock<EngineConfig>>,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn with_shared(config: Arc<RwLock<EngineConfig>>) -> Self {
        Self { config }
    }

    fn snapshot(&self) -> EngineConfig {
        self.config.read().clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Schema(String),
    Cycle(String),
    Invalid(String),
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::Schema { .. } => ApiError::Schema(value.to_string()),
            ScheduleError::Cycle { .. } => ApiError::Cycle(value.to_string()),
            other => ApiError::Invalid(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (error, message) = match self {
            ApiError::Schema(message) => ("schema_error", message),
            ApiError::Cycle(message) => ("cycle_error", message),
            ApiError::Invalid(message) => ("invalid_request", message),
        };
        (StatusCode::BAD_REQUEST, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct CpmRequest {
    tasks: Vec<TaskRecord>,
}

#[derive(Debug, Serialize)]
struct CpmResponse {
    result: CpmResult,
    summary: ScheduleSummary,
}

#[derive(Debug, Deserialize)]
struct SimulateRequest {
    tasks: Vec<TaskRecord>,
    trials: Option<usize>,
    seed: Option<u64>,
    percentiles: Option<Vec<f64>>,
    mode: Option<SimulationMode>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/config", get(get_config).put(update_config))
        .route("/cpm", post(run_cpm))
        .route("/simulate", post(run_simulation))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, config: EngineConfig) -> std::io::Result<()> {
    let app = router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_config(State(state): State<AppState>) -> Json<EngineConfig> {
    Json(state.snapshot())
}

async fn update_config(
    State(state): State<AppState>,
    Json(config): Json<EngineConfig>,
) -> Result<Json<EngineConfig>, ApiError> {
    config.simulation.validate()?;
    *state.config.write() = config;
    Ok(Json(state.snapshot()))
}

async fn run_cpm(
    State(state): State<AppState>,
    Json(payload): Json<CpmRequest>,
) -> Result<Json<CpmResponse>, ApiError> {
    let config = state.snapshot();
    let schedule = Schedule::from_config(&payload.tasks, &config)?;
    let result = schedule.critical_path();
    let summary = schedule.summary(&result);
    Ok(Json(CpmResponse { result, summary }))
}

async fn run_simulation(
    State(state): State<AppState>,
    Json(payload): Json<SimulateRequest>,
) -> Result<Json<SimulationReport>, ApiError> {
    let config = state.snapshot();
    let schedule = Schedule::from_config(&payload.tasks, &config)?;

    let mut sim = config.simulation;
    if let Some(trials) = payload.trials {
        sim.trials = trials;
    }
    if let Some(seed) = payload.seed {
        sim.seed = seed;
    }
    if let Some(percentiles) = payload.percentiles {
        sim.percentiles = percentiles;
    }
    if let Some(mode) = payload.mode {
        sim.mode = mode;
    }

    // CPU bound; runs on the blocking pool.
    let report = tokio::task::spawn_blocking(move || schedule.simulate(&sim))
        .await
        .map_err(|err| ApiError::Invalid(err.to_string()))??;
    Ok(Json(report))
}
