//! Mailing-list sync for approved reports.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

use aieo_core::types::PublicLinks;
use aieo_database::ReportStore;
use aieo_delivery::{LeadSink, Subscriber, SyncOutcome};
use aieo_entity::ReportStatus;
use aieo_entity::job::payload::LEAD_SYNC;
use aieo_entity::job::{Job, JobPayload};

use crate::executor::{JobExecutionError, JobHandler};

/// Pushes the contact of an approved report to the mailing list.
#[derive(Debug)]
pub struct LeadSyncJobHandler {
    reports: Arc<dyn ReportStore>,
    sink: Arc<dyn LeadSink>,
    /// Used for the report link; omitted when no public URL is configured.
    links: Option<PublicLinks>,
}

impl LeadSyncJobHandler {
    /// Create a new lead-sync handler
    pub fn new(
        reports: Arc<dyn ReportStore>,
        sink: Arc<dyn LeadSink>,
        links: Option<PublicLinks>,
    ) -> Self {
        Self {
            reports,
            sink,
            links,
        }
    }
}

#[async_trait]
impl JobHandler for LeadSyncJobHandler {
    fn job_type(&self) -> &str {
        LEAD_SYNC
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let JobPayload::LeadSync(payload) = job
            .typed_payload()
            .map_err(|e| JobExecutionError::Permanent(format!("Invalid lead_sync payload: {e}")))?;
        let report_id = payload.report_id;

        let report = self
            .reports
            .get_with_meta(report_id)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Report lookup failed: {e}")))?
            .ok_or_else(|| JobExecutionError::Permanent(format!("Report {report_id} not found")))?;

        if report.status != ReportStatus::Approved {
            return Err(JobExecutionError::Permanent(format!(
                "Report {report_id} is {}, not approved",
                report.status
            )));
        }
        let email = report.email.clone().ok_or_else(|| {
            JobExecutionError::Permanent(format!("Report {report_id} has no contact email"))
        })?;

        let subscriber = Subscriber {
            email,
            name: report.contact_name.clone(),
            company: report.inputs.brand_name.clone(),
            industry: report.inputs.industry.clone(),
            website: report.inputs.website_url.clone(),
            keywords: report.inputs.keywords.clone(),
            report_url: self.links.as_ref().map(|links| links.report(report_id)),
            ai_score: Some(report.result.overall_score),
        };

        match self.sink.add_subscriber(&subscriber).await {
            Ok(SyncOutcome::Synced) => {
                info!(report_id = %report_id, "Lead synced to mailing list");
                Ok(Some(json!({ "synced": true })))
            }
            Ok(SyncOutcome::Skipped) => {
                info!(report_id = %report_id, "Mailing list not configured, lead sync skipped");
                Ok(Some(json!({ "skipped": true })))
            }
            Err(e) => Err(e.into()),
        }
    }
}
