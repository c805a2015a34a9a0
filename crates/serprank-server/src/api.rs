//! HTTP surface of the rank service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use serprank_core::EntityKind;
use serprank_engine::{
    run_batch, BatchConfig, EngineError, ProbeError, RankEngine, StoreError,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub engine: RankEngine,
    pub batch_config: BatchConfig,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_unavailable" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn map_engine_error(error: &EngineError) -> ApiError {
    match error {
        EngineError::EmptyKeyword => {
            ApiError::new("validation_error", "keyword must not be empty")
        }
        EngineError::Store(StoreError::NotFound) => {
            ApiError::new("not_found", "no tracking with that id")
        }
        EngineError::Probe(ProbeError::Browser { .. } | ProbeError::Crawl { .. }) => {
            tracing::error!(error = %error, "crawl failed");
            ApiError::new("upstream_unavailable", "search result page could not be fetched")
        }
        other => {
            tracing::error!(error = %other, "engine operation failed");
            ApiError::new("internal_error", "operation failed")
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ranks/realtime", post(realtime_rank))
        .route("/trackings", post(create_tracking))
        .route("/trackings/{public_id}/stop", post(stop_tracking))
        .route("/batch/run", post(trigger_batch))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match serprank_db::ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct RankRequest {
    kind: EntityKind,
    keyword: String,
    target_url: String,
}

#[derive(Debug, Serialize)]
struct RealtimeRankResponse {
    keyword: String,
    target_url: String,
    rank: Option<u32>,
    checked_at: chrono::DateTime<chrono::Utc>,
}

async fn realtime_rank(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RealtimeRankResponse>, ApiError> {
    if req.keyword.trim().is_empty() {
        return Err(ApiError::new("validation_error", "keyword must not be empty"));
    }
    let rank = state
        .engine
        .realtime_rank(req.kind, &req.keyword, &req.target_url)
        .await
        .map_err(|e| map_engine_error(&e))?;
    Ok(Json(RealtimeRankResponse {
        keyword: req.keyword,
        target_url: req.target_url,
        rank,
        checked_at: chrono::Utc::now(),
    }))
}

#[derive(Debug, Serialize)]
struct TrackingResponse {
    public_id: Uuid,
    kind: EntityKind,
    keyword: String,
    target_url: String,
    status: String,
    current_session: i64,
    rank: Option<u32>,
}

async fn create_tracking(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Result<(StatusCode, Json<TrackingResponse>), ApiError> {
    if req.keyword.trim().is_empty() {
        return Err(ApiError::new("validation_error", "keyword must not be empty"));
    }
    let created = state
        .engine
        .create_tracking(req.kind, &req.keyword, &req.target_url)
        .await
        .map_err(|e| map_engine_error(&e))?;

    let tracking = created.tracking;
    Ok((
        StatusCode::CREATED,
        Json(TrackingResponse {
            public_id: tracking.public_id,
            kind: tracking.kind,
            keyword: tracking.keyword,
            target_url: tracking.target_url,
            status: tracking.status.as_str().to_owned(),
            current_session: tracking.current_session,
            rank: created.rank,
        }),
    ))
}

#[derive(Debug, Serialize)]
struct StopResponse {
    public_id: Uuid,
    status: String,
    already_stopped: bool,
}

async fn stop_tracking(
    State(state): State<AppState>,
    Path(public_id): Path<Uuid>,
) -> Result<Json<StopResponse>, ApiError> {
    let outcome = state
        .engine
        .stop_tracking(public_id)
        .await
        .map_err(|e| map_engine_error(&e))?;
    Ok(Json(StopResponse {
        public_id: outcome.public_id,
        status: "stopped".to_owned(),
        already_stopped: outcome.already_stopped,
    }))
}

#[derive(Debug, Serialize)]
struct BatchResponse {
    total: u32,
    success: u32,
    fail: u32,
}

async fn trigger_batch(
    State(state): State<AppState>,
) -> Result<Json<BatchResponse>, ApiError> {
    let report = run_batch(&state.engine, state.batch_config)
        .await
        .map_err(|e| map_engine_error(&e))?;
    Ok(Json(BatchResponse {
        total: report.total,
        success: report.success,
        fail: report.fail,
    }))
}
