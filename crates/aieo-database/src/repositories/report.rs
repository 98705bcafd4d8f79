//! Report repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use aieo_core::error::{AppError, ErrorKind};
use aieo_core::result::AppResult;
use aieo_core::types::{AccountId, ReportId};
use aieo_entity::{AuditInputs, AuditResult, Report, ReportContent, ReportStatus, ReportSummary};

use crate::connection::ping;
use crate::store::ReportStore;

/// Raw `reports` row.
#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    report_id: Uuid,
    inputs: Json<AuditInputs>,
    result: Json<AuditResult>,
    user_id: Option<Uuid>,
    email: Option<String>,
    contact_name: Option<String>,
    status: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = AppError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Self {
            report_id: ReportId::from_uuid(row.report_id),
            inputs: row.inputs.0,
            result: row.result.0,
            user_id: row.user_id.map(AccountId::from_uuid),
            email: row.email,
            contact_name: row.contact_name,
            status: ReportStatus::from_column(row.status.as_deref())?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    report_id: Uuid,
    created_at: DateTime<Utc>,
    brand_name: Option<String>,
    status: Option<String>,
    overall_score: Option<f64>,
}

/// Repository for audit reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    /// Create a new report repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: ReportId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM reports WHERE report_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to look up report", e))
    }

    async fn decide(&self, id: ReportId, status: ReportStatus) -> AppResult<()> {
        let updated = sqlx::query(
            "UPDATE reports SET status = $2 WHERE report_id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(status.to_column())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to update report status", e)
        })?;

        if updated.rows_affected() > 0 {
            return Ok(());
        }
        if self.exists(id).await? {
            Err(AppError::state_conflict("Report is no longer pending"))
        } else {
            Err(AppError::not_found(format!("Report {id} not found")))
        }
    }
}

#[async_trait]
impl ReportStore for ReportRepository {
    async fn save(
        &self,
        inputs: &AuditInputs,
        result: &AuditResult,
        owner: Option<AccountId>,
    ) -> AppResult<ReportId> {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO reports (report_id, inputs, result, user_id) \
             VALUES ($1, $2, $3, $4) RETURNING report_id",
        )
        .bind(ReportId::new())
        .bind(Json(inputs))
        .bind(Json(result))
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map(ReportId::from_uuid)
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to save report", e))
    }

    async fn get(&self, id: ReportId) -> AppResult<Option<ReportContent>> {
        Ok(self.get_with_meta(id).await?.map(|r| r.content()))
    }

    async fn get_with_meta(&self, id: ReportId) -> AppResult<Option<Report>> {
        let row = sqlx::query_as::<_, ReportRow>(
            "SELECT report_id, inputs, result, user_id, email, contact_name, status, created_at \
             FROM reports WHERE report_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to fetch report", e))?;

        row.map(Report::try_from).transpose()
    }

    async fn set_pending(&self, id: ReportId, email: &str, contact_name: &str) -> AppResult<()> {
        let updated = sqlx::query(
            "UPDATE reports SET status = 'pending', email = $2, contact_name = $3 \
             WHERE report_id = $1 AND (status IS NULL OR status <> 'approved')",
        )
        .bind(id)
        .bind(email)
        .bind(contact_name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to mark report pending", e)
        })?;

        if updated.rows_affected() > 0 {
            return Ok(());
        }
        if self.exists(id).await? {
            Err(AppError::state_conflict("Report already approved"))
        } else {
            Err(AppError::not_found(format!("Report {id} not found")))
        }
    }

    async fn set_approved(&self, id: ReportId) -> AppResult<()> {
        self.decide(id, ReportStatus::Approved).await
    }

    async fn set_denied(&self, id: ReportId) -> AppResult<()> {
        self.decide(id, ReportStatus::Denied).await
    }

    async fn discard(&self, id: ReportId) -> AppResult<bool> {
        let deleted = sqlx::query("DELETE FROM reports WHERE report_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to delete report", e))?;
        Ok(deleted.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner: AccountId) -> AppResult<Vec<ReportSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT report_id, created_at, inputs->>'brandName' AS brand_name, status, \
             (result->>'overallScore')::float8 AS overall_score \
             FROM reports WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to list reports", e))?;

        rows.into_iter()
            .map(|row| {
                Ok(ReportSummary {
                    report_id: ReportId::from_uuid(row.report_id),
                    created_at: row.created_at,
                    brand_name: row.brand_name.unwrap_or_default(),
                    status: ReportStatus::from_column(row.status.as_deref())?,
                    overall_score: row.overall_score,
                })
            })
            .collect()
    }

    async fn ping(&self) -> AppResult<()> {
        ping(&self.pool).await
    }
}
