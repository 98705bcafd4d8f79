//! Public report handlers.

use axum::Json;
use axum::extract::State;

use aieo_core::error::AppError;
use aieo_core::types::ReportId;
use aieo_entity::{ReportContent, ReportStatus};

use crate::dto::request::ApprovalRequest;
use crate::dto::response::{ApiResponse, StatusResponse};
use crate::extractors::{IdPath, JsonBody, RequestOrigin};
use crate::state::AppState;

/// GET /api/reports/{id}
pub async fn get_report(
    State(state): State<AppState>,
    IdPath(id): IdPath<ReportId>,
) -> Result<Json<ApiResponse<ReportContent>>, AppError> {
    let report = state.audits.fetch_report(id).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// POST /api/reports/{id}/approval
pub async fn request_approval(
    State(state): State<AppState>,
    IdPath(id): IdPath<ReportId>,
    RequestOrigin(links): RequestOrigin,
    JsonBody(req): JsonBody<ApprovalRequest>,
) -> Result<Json<ApiResponse<StatusResponse>>, AppError> {
    state
        .approvals
        .request_approval(id, &req.contact_name, &req.email, &links)
        .await?;

    Ok(Json(ApiResponse::ok(StatusResponse {
        report_id: id,
        status: ReportStatus::Pending,
    })))
}
