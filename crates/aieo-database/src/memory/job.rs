//! In-memory job queue.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use aieo_core::result::AppResult;
use aieo_core::types::JobId;
use aieo_entity::job::{CreateJob, Job, JobStatus};

use crate::store::JobStore;

/// Jobs behind a single lock so that dequeue is a claim.
#[derive(Debug, Clone, Default)]
pub struct MemoryJobStore {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl MemoryJobStore {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: JobId, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut Job) + Send,
    {
        let mut jobs = self.jobs.lock().await;
        if let Some(job) = jobs.get_mut(&id) {
            f(job);
            job.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, data: &CreateJob) -> AppResult<Job> {
        let now = Utc::now();
        let job = Job {
            id: JobId::new(),
            job_type: data.job_type.clone(),
            payload: data.payload.clone(),
            result: None,
            error_message: None,
            status: JobStatus::Pending,
            attempts: 0,
            max_attempts: data.max_attempts,
            run_at: data.run_at.unwrap_or(now),
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.jobs.lock().await.insert(job.id, job.clone());
        Ok(job)
    }

    async fn find_by_id(&self, id: JobId) -> AppResult<Option<Job>> {
        Ok(self.jobs.lock().await.get(&id).cloned())
    }

    async fn list(&self, status: Option<JobStatus>, limit: i64) -> AppResult<Vec<Job>> {
        let jobs = self.jobs.lock().await;
        let mut matching: Vec<Job> = jobs
            .values()
            .filter(|j| status.is_none_or(|s| j.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(matching)
    }

    async fn dequeue(&self) -> AppResult<Option<Job>> {
        let now = Utc::now();
        let mut jobs = self.jobs.lock().await;
        let next = jobs
            .values()
            .filter(|j| j.status == JobStatus::Pending && j.run_at <= now)
            .min_by_key(|j| (j.run_at, j.created_at))
            .map(|j| j.id);

        Ok(next.and_then(|id| jobs.get_mut(&id)).map(|job| {
            job.status = JobStatus::Running;
            job.attempts += 1;
            job.started_at = Some(now);
            job.updated_at = now;
            job.clone()
        }))
    }

    async fn complete(&self, id: JobId, result: Option<&serde_json::Value>) -> AppResult<()> {
        let result = result.cloned();
        self.update(id, move |job| {
            job.status = JobStatus::Completed;
            job.result = result;
            job.error_message = None;
            job.completed_at = Some(Utc::now());
        })
        .await
    }

    async fn fail(&self, id: JobId, error_message: &str) -> AppResult<()> {
        let message = error_message.to_string();
        self.update(id, move |job| {
            job.status = JobStatus::Failed;
            job.error_message = Some(message);
            job.completed_at = Some(Utc::now());
        })
        .await
    }

    async fn reschedule(
        &self,
        id: JobId,
        error_message: &str,
        run_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let message = error_message.to_string();
        self.update(id, move |job| {
            job.status = JobStatus::Pending;
            job.error_message = Some(message);
            job.run_at = run_at;
            job.started_at = None;
        })
        .await
    }

    async fn retry(&self, id: JobId) -> AppResult<Option<Job>> {
        let mut jobs = self.jobs.lock().await;
        let Some(job) = jobs.get_mut(&id).filter(|j| j.status == JobStatus::Failed) else {
            return Ok(None);
        };
        let now = Utc::now();
        job.status = JobStatus::Pending;
        job.attempts = 0;
        job.error_message = None;
        job.started_at = None;
        job.completed_at = None;
        job.run_at = now;
        job.updated_at = now;
        Ok(Some(job.clone()))
    }

    async fn count_by_status(&self) -> AppResult<Vec<(JobStatus, i64)>> {
        let jobs = self.jobs.lock().await;
        let mut counts: Vec<(JobStatus, i64)> = Vec::new();
        for job in jobs.values() {
            match counts.iter_mut().find(|(s, _)| *s == job.status) {
                Some((_, n)) => *n += 1,
                None => counts.push((job.status, 1)),
            }
        }
        counts.sort_by_key(|(s, _)| s.as_str());
        Ok(counts)
    }

    async fn cleanup_finished(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let mut jobs = self.jobs.lock().await;
        let initial = jobs.len();
        jobs.retain(|_, job| !(job.status.is_terminal() && job.updated_at < before));
        Ok((initial - jobs.len()) as u64)
    }
}
