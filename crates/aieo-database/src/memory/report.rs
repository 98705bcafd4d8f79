//! In-memory report store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use aieo_core::error::AppError;
use aieo_core::result::AppResult;
use aieo_core::types::{AccountId, ReportId};
use aieo_entity::{AuditInputs, AuditResult, Report, ReportContent, ReportStatus, ReportSummary};

use crate::store::ReportStore;

/// Reports kept in a concurrent map.
#[derive(Debug, Clone, Default)]
pub struct MemoryReportStore {
    reports: Arc<DashMap<ReportId, Report>>,
}

impl MemoryReportStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reports.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether no report has been saved.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    fn decide(&self, id: ReportId, status: ReportStatus) -> AppResult<()> {
        let mut report = self
            .reports
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Report {id} not found")))?;

        if !report.status.awaits_decision() {
            return Err(AppError::state_conflict(format!(
                "Report is {}, not pending",
                report.status
            )));
        }
        report.status = status;
        Ok(())
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn save(
        &self,
        inputs: &AuditInputs,
        result: &AuditResult,
        owner: Option<AccountId>,
    ) -> AppResult<ReportId> {
        let report = Report::new(inputs.clone(), result.clone(), owner);
        let id = report.report_id;
        self.reports.insert(id, report);
        Ok(id)
    }

    async fn get(&self, id: ReportId) -> AppResult<Option<ReportContent>> {
        Ok(self.reports.get(&id).map(|r| r.content()))
    }

    async fn get_with_meta(&self, id: ReportId) -> AppResult<Option<Report>> {
        Ok(self.reports.get(&id).map(|r| r.clone()))
    }

    async fn set_pending(&self, id: ReportId, email: &str, contact_name: &str) -> AppResult<()> {
        let mut report = self
            .reports
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Report {id} not found")))?;

        if report.status == ReportStatus::Approved {
            return Err(AppError::state_conflict("Report already approved"));
        }

        report.status = ReportStatus::Pending;
        report.email = Some(email.to_string());
        report.contact_name = Some(contact_name.to_string());
        Ok(())
    }

    async fn set_approved(&self, id: ReportId) -> AppResult<()> {
        self.decide(id, ReportStatus::Approved)
    }

    async fn set_denied(&self, id: ReportId) -> AppResult<()> {
        self.decide(id, ReportStatus::Denied)
    }

    async fn discard(&self, id: ReportId) -> AppResult<bool> {
        Ok(self.reports.remove(&id).is_some())
    }

    async fn list_by_owner(&self, owner: AccountId) -> AppResult<Vec<ReportSummary>> {
        let mut summaries: Vec<ReportSummary> = self
            .reports
            .iter()
            .filter(|r| r.user_id == Some(owner))
            .map(|r| r.summary())
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
