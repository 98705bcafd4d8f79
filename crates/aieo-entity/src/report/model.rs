//! Report aggregate and read projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aieo_core::types::{AccountId, ReportId};

use super::status::ReportStatus;
use crate::inputs::AuditInputs;
use crate::result::AuditResult;

/// A persisted audit run with its approval metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report identifier.
    pub report_id: ReportId,
    /// Inputs as submitted.
    pub inputs: AuditInputs,
    /// Normalized result. Never changes after creation.
    pub result: AuditResult,
    /// Account that ran the audit, if signed in.
    pub user_id: Option<AccountId>,
    /// Contact email from the latest approval request.
    pub email: Option<String>,
    /// Contact name from the latest approval request.
    pub contact_name: Option<String>,
    /// Approval status.
    pub status: ReportStatus,
    /// When the report was saved.
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Build a freshly generated report in the `Open` state.
    pub fn new(inputs: AuditInputs, result: AuditResult, user_id: Option<AccountId>) -> Self {
        Self {
            report_id: ReportId::new(),
            inputs,
            result,
            user_id,
            email: None,
            contact_name: None,
            status: ReportStatus::Open,
            created_at: Utc::now(),
        }
    }

    /// The public projection without contact metadata.
    pub fn content(&self) -> ReportContent {
        ReportContent {
            report_id: self.report_id,
            inputs: self.inputs.clone(),
            result: self.result.clone(),
            created_at: self.created_at,
        }
    }

    /// The summary row shown in an account's report list.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            report_id: self.report_id,
            created_at: self.created_at,
            brand_name: self.inputs.brand_name.clone(),
            status: self.status,
            overall_score: Some(self.result.overall_score),
        }
    }
}

/// Inputs and result only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportContent {
    pub report_id: ReportId,
    pub inputs: AuditInputs,
    pub result: AuditResult,
    pub created_at: DateTime<Utc>,
}

/// One row of an account's report history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub report_id: ReportId,
    pub created_at: DateTime<Utc>,
    pub brand_name: String,
    pub status: ReportStatus,
    pub overall_score: Option<f64>,
}
