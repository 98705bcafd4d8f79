//! Repository tests against a live PostgreSQL.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use aieo_core::config::DatabaseConfig;
use aieo_core::error::ErrorKind;
use aieo_core::types::AccountId;
use aieo_database::repositories::{JobRepository, ProfileRepository, ReportRepository};
use aieo_database::{DatabasePool, JobStore, ReportStore, UsageCounter};
use aieo_entity::ReportStatus;
use aieo_entity::fixtures::{sample_inputs, sample_result};
use aieo_entity::job::{CreateJob, JobStatus};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a scratch database");
    let config = DatabaseConfig {
        url,
        ..Default::default()
    };
    let db = DatabasePool::connect(&config).await.expect("connect");
    aieo_database::migration::run_migrations(db.pool())
        .await
        .expect("migrate");
    db.pool().clone()
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_report_lifecycle() {
    let reports = ReportRepository::new(pool().await);
    let owner = AccountId::new();

    let id = reports
        .save(&sample_inputs(), &sample_result(), Some(owner))
        .await
        .expect("save");
    let report = reports.get_with_meta(id).await.expect("get").expect("row");
    assert_eq!(report.status, ReportStatus::Open);
    assert_eq!(report.result, sample_result());

    reports.set_pending(id, "a@x.io", "Ana").await.expect("pending");
    reports.set_approved(id).await.expect("approve");

    let err = reports.set_denied(id).await.expect_err("already decided");
    assert_eq!(err.kind, ErrorKind::StateConflict);

    let err = reports
        .set_pending(id, "b@x.io", "Bo")
        .await
        .expect_err("already approved");
    assert_eq!(err.kind, ErrorKind::StateConflict);

    let listed = reports.list_by_owner(owner).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].brand_name, sample_inputs().brand_name);
    assert_eq!(listed[0].status, ReportStatus::Approved);
    assert_eq!(listed[0].overall_score, Some(72.0));

    assert!(reports.discard(id).await.expect("discard"));
    assert!(reports.get(id).await.expect("get").is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_profile_increment_respects_ceiling() {
    let profiles = ProfileRepository::new(pool().await);
    let account = AccountId::new();

    assert_eq!(profiles.ensure(account).await.expect("ensure").audit_count, 0);
    assert_eq!(profiles.increment(account, 1).await.expect("inc"), Some(1));
    assert_eq!(profiles.increment(account, 1).await.expect("inc"), None);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_job_queue_round() {
    let jobs = JobRepository::new(pool().await);
    let job = jobs
        .create(&CreateJob {
            job_type: "lead_sync".to_string(),
            payload: serde_json::json!({ "report_id": uuid::Uuid::new_v4() }),
            max_attempts: 2,
            run_at: Some(Utc::now() - Duration::seconds(1)),
        })
        .await
        .expect("create");

    let mut claimed = None;
    while let Some(next) = jobs.dequeue().await.expect("dequeue") {
        if next.id == job.id {
            claimed = Some(next);
            break;
        }
    }
    let claimed = claimed.expect("claimed our job");
    assert_eq!(claimed.status, JobStatus::Running);
    assert_eq!(claimed.attempts, 1);

    jobs.fail(job.id, "bad request").await.expect("fail");
    let retried = jobs.retry(job.id).await.expect("retry").expect("was failed");
    assert_eq!(retried.status, JobStatus::Pending);
}
