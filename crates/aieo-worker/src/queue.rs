//! Job queue for enqueuing and dequeuing background jobs.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use aieo_core::error::AppError;
use aieo_core::types::JobId;
use aieo_database::JobStore;
use aieo_entity::job::{CreateJob, Job, JobPayload, JobStatus};

/// Job queue over a [`JobStore`].
#[derive(Debug, Clone)]
pub struct JobQueue {
    store: Arc<dyn JobStore>,
}

impl JobQueue {
    /// Create a new job queue
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Enqueue a typed job
    pub async fn enqueue(&self, payload: &JobPayload, max_attempts: i32) -> Result<Job, AppError> {
        let job = self
            .store
            .create(&CreateJob::from_payload(payload, max_attempts)?)
            .await?;
        debug!(job_id = %job.id, job_type = %job.job_type, "Enqueued job");
        Ok(job)
    }

    /// Claim the next due job
    pub async fn dequeue(&self) -> Result<Option<Job>, AppError> {
        let job = self.store.dequeue().await?;
        if let Some(job) = &job {
            debug!(job_id = %job.id, job_type = %job.job_type, "Dequeued job");
        }
        Ok(job)
    }

    /// Mark a job as completed successfully
    pub async fn complete(&self, job_id: JobId, result: Option<serde_json::Value>) -> Result<(), AppError> {
        self.store.complete(job_id, result.as_ref()).await?;
        debug!(job_id = %job_id, "Job completed");
        Ok(())
    }

    /// Mark a job as failed
    pub async fn fail(&self, job_id: JobId, error: &str) -> Result<(), AppError> {
        self.store.fail(job_id, error).await?;
        debug!(job_id = %job_id, error, "Job failed");
        Ok(())
    }

    /// Put a job back in the queue, due after `delay`
    pub async fn retry_later(&self, job_id: JobId, error: &str, delay: Duration) -> Result<(), AppError> {
        let delay = chrono::Duration::from_std(delay).unwrap_or(chrono::Duration::zero());
        self.store.reschedule(job_id, error, Utc::now() + delay).await?;
        debug!(job_id = %job_id, delay_seconds = delay.num_seconds(), "Job rescheduled");
        Ok(())
    }

    /// Get queue statistics
    pub async fn stats(&self) -> Result<QueueStats, AppError> {
        let counts = self.store.count_by_status().await?;
        let count = |status: JobStatus| {
            counts
                .iter()
                .find(|(s, _)| *s == status)
                .map_or(0, |(_, n)| *n)
        };
        Ok(QueueStats {
            pending: count(JobStatus::Pending),
            running: count(JobStatus::Running),
            completed: count(JobStatus::Completed),
            failed: count(JobStatus::Failed),
        })
    }
}

/// Queue statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Number of pending jobs
    pub pending: i64,
    /// Number of running jobs
    pub running: i64,
    /// Number of completed jobs not yet purged
    pub completed: i64,
    /// Number of failed jobs
    pub failed: i64,
}
