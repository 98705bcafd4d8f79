//! Reviewer handlers: report decisions and lead-sync jobs.

use axum::Json;
use axum::extract::{Query, State};

use aieo_core::error::AppError;
use aieo_core::types::{JobId, ReportId};
use aieo_entity::ReportStatus;
use aieo_entity::job::JobStatus;

use crate::dto::request::JobListQuery;
use crate::dto::response::{ApiResponse, JobResponse, ReviewReportResponse, StatusResponse};
use crate::extractors::{IdPath, Reviewer};
use crate::state::AppState;

/// GET /api/review/reports/{id}
pub async fn get_report(
    State(state): State<AppState>,
    _reviewer: Reviewer,
    IdPath(id): IdPath<ReportId>,
) -> Result<Json<ApiResponse<ReviewReportResponse>>, AppError> {
    let report = state.audits.fetch_report_with_meta(id).await?;
    Ok(Json(ApiResponse::ok(report.into())))
}

/// POST /api/review/reports/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    _reviewer: Reviewer,
    IdPath(id): IdPath<ReportId>,
) -> Result<Json<ApiResponse<StatusResponse>>, AppError> {
    state.approvals.approve(id).await?;
    Ok(Json(ApiResponse::ok(StatusResponse {
        report_id: id,
        status: ReportStatus::Approved,
    })))
}

/// POST /api/review/reports/{id}/deny
pub async fn deny(
    State(state): State<AppState>,
    _reviewer: Reviewer,
    IdPath(id): IdPath<ReportId>,
) -> Result<Json<ApiResponse<StatusResponse>>, AppError> {
    state.approvals.deny(id).await?;
    Ok(Json(ApiResponse::ok(StatusResponse {
        report_id: id,
        status: ReportStatus::Denied,
    })))
}

/// GET /api/review/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    _reviewer: Reviewer,
    Query(query): Query<JobListQuery>,
) -> Result<Json<ApiResponse<Vec<JobResponse>>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<JobStatus>)
        .transpose()?;

    let jobs = state.jobs.list(status, query.limit()).await?;
    Ok(Json(ApiResponse::ok(
        jobs.into_iter().map(JobResponse::from).collect(),
    )))
}

/// POST /api/review/jobs/{id}/retry
pub async fn retry_job(
    State(state): State<AppState>,
    _reviewer: Reviewer,
    IdPath(id): IdPath<JobId>,
) -> Result<Json<ApiResponse<JobResponse>>, AppError> {
    let job = match state.jobs.retry(id).await? {
        Some(job) => job,
        None if state.jobs.find_by_id(id).await?.is_some() => {
            return Err(AppError::state_conflict("Only failed jobs can be retried"));
        }
        None => return Err(AppError::not_found("Job not found")),
    };
    tracing::info!(job_id = %id, "Job re-queued by reviewer");
    Ok(Json(ApiResponse::ok(job.into())))
}
