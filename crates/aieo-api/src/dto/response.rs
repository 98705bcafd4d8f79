//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use aieo_core::types::{AccountId, JobId, ReportId};
use aieo_entity::job::{Job, JobStatus};
use aieo_entity::{AuditInputs, AuditResult, Report, ReportStatus, ReportSummary};
use aieo_service::QuotaStatus;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Liveness.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Readiness.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub status: String,
    pub store: String,
}

/// The caller's usage and report history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub account_id: AccountId,
    #[serde(flatten)]
    pub quota: QuotaStatus,
    pub reports: Vec<ReportSummary>,
}

/// A report with its approval metadata, for reviewers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReportResponse {
    pub report_id: ReportId,
    pub inputs: AuditInputs,
    pub result: AuditResult,
    pub email: Option<String>,
    pub contact_name: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReviewReportResponse {
    fn from(report: Report) -> Self {
        Self {
            report_id: report.report_id,
            inputs: report.inputs,
            result: report.result,
            email: report.email,
            contact_name: report.contact_name,
            status: report.status,
            created_at: report.created_at,
        }
    }
}

/// Status after a reviewer decision or an approval request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub report_id: ReportId,
    pub status: ReportStatus,
}

/// A background job as shown to reviewers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: JobId,
    pub job_type: String,
    pub status: JobStatus,
    pub payload: serde_json::Value,
    pub result: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub attempts: i32,
    pub max_attempts: i32,
    pub run_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            job_type: job.job_type,
            status: job.status,
            payload: job.payload,
            result: job.result,
            error_message: job.error_message,
            attempts: job.attempts,
            max_attempts: job.max_attempts,
            run_at: job.run_at,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}
