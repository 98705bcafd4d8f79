//! Typed job payload definitions.

use serde::{Deserialize, Serialize};

use aieo_core::types::ReportId;

/// Job type of the mailing-list sync that follows an approval.
pub const LEAD_SYNC: &str = "lead_sync";

/// Typed payloads for known job types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "job_type", rename_all = "snake_case")]
pub enum JobPayload {
    /// Push an approved report's contact to the mailing list.
    LeadSync(LeadSyncPayload),
}

impl JobPayload {
    /// Job type string stored next to the payload.
    pub fn job_type(&self) -> &'static str {
        match self {
            Self::LeadSync(_) => LEAD_SYNC,
        }
    }
}

/// Payload of a lead-sync job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSyncPayload {
    /// The approved report.
    pub report_id: ReportId,
}
