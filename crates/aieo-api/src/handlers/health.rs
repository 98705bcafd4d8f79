//! Health check handlers.

use axum::Json;
use axum::extract::State;

use aieo_core::error::AppError;

use crate::dto::response::{ApiResponse, HealthResponse, ReadinessResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/ready
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReadinessResponse>>, AppError> {
    state
        .reports
        .ping()
        .await
        .map_err(|e| AppError::service_unavailable(format!("Report store unreachable: {}", e.message)))?;

    Ok(Json(ApiResponse::ok(ReadinessResponse {
        status: "ready".to_string(),
        store: "connected".to_string(),
    })))
}
