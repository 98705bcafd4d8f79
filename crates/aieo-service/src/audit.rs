//! Audit run orchestration and report reads.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};

use aieo_core::error::AppError;
use aieo_core::types::{AccountId, ReportId};
use aieo_database::ReportStore;
use aieo_entity::{AuditInputs, AuditResult, Report, ReportContent, ReportSummary};
use aieo_generation::{FallbackGenerator, build_prompt, normalize};

use crate::quota::{QuotaStatus, UsagePolicy};
use crate::validation::validate_inputs;

/// A stored report and its result, returned from a successful run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditOutcome {
    pub report_id: ReportId,
    pub result: AuditResult,
}

/// Runs audits and serves stored reports.
#[derive(Debug, Clone)]
pub struct AuditService {
    /// Report persistence.
    reports: Arc<dyn ReportStore>,
    /// Per-account quota.
    usage: UsagePolicy,
    /// Model client with retry and fallback.
    generator: FallbackGenerator,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(reports: Arc<dyn ReportStore>, usage: UsagePolicy, generator: FallbackGenerator) -> Self {
        Self {
            reports,
            usage,
            generator,
        }
    }

    /// Run one audit: validate, check quota, generate, normalize, persist,
    /// then count the run against the account.
    ///
    /// Anonymous runs are not counted. A run that fails before the save
    /// leaves no report and does not touch the counter. When a concurrent
    /// run took the last slot, the report just saved is removed again and
    /// the run fails with `QuotaExceeded`.
    pub async fn submit_audit(
        &self,
        inputs: &AuditInputs,
        account: Option<AccountId>,
    ) -> Result<AuditOutcome, AppError> {
        let inputs = validate_inputs(inputs)?;

        if let Some(account) = account {
            self.usage.check(account).await?;
        }

        let started = Instant::now();
        let prompt = build_prompt(&inputs);
        let generation = self.generator.generate(&prompt).await?;

        let result = normalize(&generation.text, generation.citations).map_err(|e| {
            warn!(
                brand = %inputs.brand_name,
                error = %e,
                "Model output could not be normalized"
            );
            AppError::from(e)
        })?;

        let report_id = self.reports.save(&inputs, &result, account).await?;

        if let Some(account) = account {
            if let Err(e) = self.usage.claim(account).await {
                self.discard(report_id).await;
                return Err(e);
            }
        }

        info!(
            report_id = %report_id,
            brand = %inputs.brand_name,
            overall_score = result.overall_score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Audit completed"
        );

        Ok(AuditOutcome { report_id, result })
    }

    async fn discard(&self, id: ReportId) {
        match self.reports.discard(id).await {
            Ok(_) => info!(report_id = %id, "Discarded report over quota"),
            Err(e) => error!(report_id = %id, error = %e, "Failed to discard report over quota"),
        }
    }

    /// Inputs and result of a report.
    pub async fn fetch_report(&self, id: ReportId) -> Result<ReportContent, AppError> {
        self.reports
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Report not found"))
    }

    /// The full report including contact metadata and status.
    pub async fn fetch_report_with_meta(&self, id: ReportId) -> Result<Report, AppError> {
        self.reports
            .get_with_meta(id)
            .await?
            .ok_or_else(|| AppError::not_found("Report not found"))
    }

    /// Reports owned by `account`, newest first.
    pub async fn list_by_owner(&self, account: AccountId) -> Result<Vec<ReportSummary>, AppError> {
        self.reports.list_by_owner(account).await
    }

    /// Quota figures for `account`.
    pub async fn quota_status(&self, account: AccountId) -> Result<QuotaStatus, AppError> {
        self.usage.status(account).await
    }
}
