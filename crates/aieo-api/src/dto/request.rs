//! Request DTOs.
//!
//! Fields default to empty so that missing values reach the service-level
//! validation and come back with per-field messages.

use serde::Deserialize;

use aieo_entity::AuditInputs;

/// `POST /api/audits` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitAuditRequest {
    pub brand_name: String,
    pub industry: String,
    pub website_url: String,
    pub keywords: String,
    pub location: String,
    pub service_categories: String,
}

impl From<SubmitAuditRequest> for AuditInputs {
    fn from(req: SubmitAuditRequest) -> Self {
        Self {
            brand_name: req.brand_name,
            industry: req.industry,
            website_url: req.website_url,
            keywords: req.keywords,
            location: req.location,
            service_categories: req.service_categories,
        }
    }
}

/// `POST /api/reports/{id}/approval` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApprovalRequest {
    pub contact_name: String,
    pub email: String,
}

/// Query of `GET /api/review/jobs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobListQuery {
    /// Only jobs in this status.
    pub status: Option<String>,
    /// Maximum number of jobs (default 50, at most 500).
    pub limit: Option<i64>,
}

impl JobListQuery {
    /// Limit clamped to `1..=500`.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 500)
    }
}
