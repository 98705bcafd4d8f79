//! Audit submission handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use aieo_core::error::AppError;
use aieo_service::AuditOutcome;

use crate::dto::request::SubmitAuditRequest;
use crate::dto::response::ApiResponse;
use crate::extractors::{JsonBody, MaybeAccount};
use crate::state::AppState;

/// POST /api/audits
pub async fn submit_audit(
    State(state): State<AppState>,
    MaybeAccount(account): MaybeAccount,
    JsonBody(req): JsonBody<SubmitAuditRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuditOutcome>>), AppError> {
    let outcome = state.audits.submit_audit(&req.into(), account).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(outcome))))
}
