//! The report approval gate.
//!
//! ```text
//! OPEN ──request──▶ PENDING ──approve──▶ APPROVED
//!                    │  ▲
//!                    │  └── request again (overwrites contact)
//!                    └────── deny ─────▶ DENIED
//! ```
//!
//! Only reviewers approve or deny. Approval enqueues a lead-sync job whose
//! failure never undoes the decision.

use std::sync::Arc;

use tracing::{error, info};

use aieo_core::error::AppError;
use aieo_core::types::{PublicLinks, ReportId};
use aieo_database::{JobStore, ReportStore};
use aieo_delivery::{ApprovalNotice, DeliveryError, ReviewerNotifier};
use aieo_entity::Report;
use aieo_entity::job::{CreateJob, JobPayload, LeadSyncPayload};

use crate::validation::validate_contact;

/// Drives report status transitions.
#[derive(Debug, Clone)]
pub struct ApprovalGate {
    reports: Arc<dyn ReportStore>,
    notifier: Arc<dyn ReviewerNotifier>,
    jobs: Arc<dyn JobStore>,
    lead_sync_max_attempts: i32,
}

impl ApprovalGate {
    /// Creates a new approval gate.
    pub fn new(
        reports: Arc<dyn ReportStore>,
        notifier: Arc<dyn ReviewerNotifier>,
        jobs: Arc<dyn JobStore>,
        lead_sync_max_attempts: i32,
    ) -> Self {
        Self {
            reports,
            notifier,
            jobs,
            lead_sync_max_attempts,
        }
    }

    /// `OPEN | PENDING → PENDING`.
    ///
    /// The reviewer is notified first; when that fails the report is left
    /// untouched and the error is returned.
    pub async fn request_approval(
        &self,
        id: ReportId,
        contact_name: &str,
        email: &str,
        links: &PublicLinks,
    ) -> Result<(), AppError> {
        let contact = validate_contact(contact_name, email)?;
        let report = self.load(id).await?;

        if !report.status.accepts_approval_request() {
            return Err(AppError::state_conflict(format!(
                "Report is already {}",
                report.status
            )));
        }

        if !self.notifier.is_configured() {
            return Err(AppError::configuration(
                "Approval service is not configured",
            ));
        }

        let notice = ApprovalNotice {
            report_id: id.to_string(),
            brand: report.inputs.brand_name.clone(),
            contact_name: contact.contact_name.clone(),
            email: contact.email.clone(),
            industry: report.inputs.industry.clone(),
            website: report.inputs.website_url.clone(),
            score: report.result.overall_score,
            review_url: links.review(id),
        };
        self.notifier.notify(&notice).await.map_err(|e| {
            error!(report_id = %id, error = %e, "Reviewer notification failed");
            match e {
                DeliveryError::NotConfigured(_) => {
                    AppError::configuration("Approval service is not configured")
                }
                other => AppError::from(other),
            }
        })?;

        self.reports
            .set_pending(id, &contact.email, &contact.contact_name)
            .await?;

        info!(report_id = %id, "Approval requested");
        Ok(())
    }

    /// `PENDING → APPROVED`, then enqueue the lead sync.
    ///
    /// The store write is conditional on `Pending`; losing a race with
    /// another decision yields `StateConflict` and queues nothing.
    pub async fn approve(&self, id: ReportId) -> Result<(), AppError> {
        let report = self.load_pending(id).await?;
        if report.email.as_deref().is_none_or(|e| e.trim().is_empty()) {
            return Err(AppError::state_conflict("Report has no contact email"));
        }

        self.reports.set_approved(id).await?;
        info!(report_id = %id, "Report approved");

        if let Err(e) = self.enqueue_lead_sync(id).await {
            error!(report_id = %id, error = %e, "Failed to enqueue lead sync");
        }
        Ok(())
    }

    /// `PENDING → DENIED`.
    pub async fn deny(&self, id: ReportId) -> Result<(), AppError> {
        self.load_pending(id).await?;
        self.reports.set_denied(id).await?;
        info!(report_id = %id, "Report denied");
        Ok(())
    }

    async fn load(&self, id: ReportId) -> Result<Report, AppError> {
        self.reports
            .get_with_meta(id)
            .await?
            .ok_or_else(|| AppError::not_found("Report not found"))
    }

    async fn load_pending(&self, id: ReportId) -> Result<Report, AppError> {
        let report = self.load(id).await?;
        if !report.status.awaits_decision() {
            return Err(AppError::state_conflict(format!(
                "Report is {}, not pending",
                report.status
            )));
        }
        Ok(report)
    }

    async fn enqueue_lead_sync(&self, id: ReportId) -> Result<(), AppError> {
        let payload = JobPayload::LeadSync(LeadSyncPayload { report_id: id });
        let job = CreateJob::from_payload(&payload, self.lead_sync_max_attempts)?;
        let job = self.jobs.create(&job).await?;
        info!(report_id = %id, job_id = %job.id, "Lead sync queued");
        Ok(())
    }
}
