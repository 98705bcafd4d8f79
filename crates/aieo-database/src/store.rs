//! Store ports used by the service and worker layers.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use aieo_core::result::AppResult;
use aieo_core::types::{AccountId, JobId, ReportId};
use aieo_entity::job::{CreateJob, Job, JobStatus};
use aieo_entity::{AuditInputs, AuditResult, Profile, Report, ReportContent, ReportSummary};

/// Persisted reports and their approval metadata.
#[async_trait]
pub trait ReportStore: Send + Sync + Debug {
    /// Persist a new report in the `Open` state and return its id.
    async fn save(
        &self,
        inputs: &AuditInputs,
        result: &AuditResult,
        owner: Option<AccountId>,
    ) -> AppResult<ReportId>;

    /// Inputs and result, or `None` when the id is unknown.
    async fn get(&self, id: ReportId) -> AppResult<Option<ReportContent>>;

    /// The full record including contact metadata and status.
    async fn get_with_meta(&self, id: ReportId) -> AppResult<Option<Report>>;

    /// Record contact details and move to `Pending`.
    ///
    /// Fails with `NotFound` for an unknown id and `StateConflict` when the
    /// report is already approved. A previous pending email is overwritten.
    async fn set_pending(&self, id: ReportId, email: &str, contact_name: &str) -> AppResult<()>;

    /// Move a pending report to `Approved`.
    ///
    /// The status check and the write are one step, so of two racing
    /// decisions only one lands; the other gets `StateConflict`.
    async fn set_approved(&self, id: ReportId) -> AppResult<()>;

    /// Move a pending report to `Denied`, with the same guard as
    /// [`ReportStore::set_approved`].
    async fn set_denied(&self, id: ReportId) -> AppResult<()>;

    /// Remove a report. Returns whether a row was deleted.
    async fn discard(&self, id: ReportId) -> AppResult<bool>;

    /// Summary rows for an account, newest first.
    async fn list_by_owner(&self, owner: AccountId) -> AppResult<Vec<ReportSummary>>;

    /// Cheap reachability check.
    async fn ping(&self) -> AppResult<()>;
}

/// Per-account audit counters.
#[async_trait]
pub trait UsageCounter: Send + Sync + Debug {
    /// Return the profile, creating it with a zero count if absent.
    async fn ensure(&self, account: AccountId) -> AppResult<Profile>;

    /// Atomically add one to the counter unless it already reached
    /// `ceiling`. Returns the new count, or `None` when the ceiling held.
    async fn increment(&self, account: AccountId, ceiling: i32) -> AppResult<Option<i32>>;
}

/// Durable background job queue.
#[async_trait]
pub trait JobStore: Send + Sync + Debug {
    /// Insert a pending job.
    async fn create(&self, job: &CreateJob) -> AppResult<Job>;

    /// Find a job by id.
    async fn find_by_id(&self, id: JobId) -> AppResult<Option<Job>>;

    /// Newest jobs first, optionally filtered by status.
    async fn list(&self, status: Option<JobStatus>, limit: i64) -> AppResult<Vec<Job>>;

    /// Claim the oldest due pending job, marking it running and counting the
    /// attempt.
    async fn dequeue(&self) -> AppResult<Option<Job>>;

    /// Mark a job completed.
    async fn complete(&self, id: JobId, result: Option<&serde_json::Value>) -> AppResult<()>;

    /// Mark a job failed for good.
    async fn fail(&self, id: JobId, error_message: &str) -> AppResult<()>;

    /// Put a running job back to pending, due at `run_at`.
    async fn reschedule(&self, id: JobId, error_message: &str, run_at: DateTime<Utc>)
    -> AppResult<()>;

    /// Reset a failed job for another round of attempts. Returns `None`
    /// when the job is not in the failed state.
    async fn retry(&self, id: JobId) -> AppResult<Option<Job>>;

    /// Number of jobs per status.
    async fn count_by_status(&self) -> AppResult<Vec<(JobStatus, i64)>>;

    /// Delete terminal jobs last touched before `before`.
    async fn cleanup_finished(&self, before: DateTime<Utc>) -> AppResult<u64>;
}
