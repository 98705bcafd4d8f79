//! Job executor: routes a claimed job to the handler registered for its type.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use aieo_delivery::DeliveryError;
use aieo_entity::job::Job;

/// A unit of background work for one `job_type`.
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// The `job_type` column value this handler owns
    fn job_type(&self) -> &str;

    /// Run the job. `Ok(Some(_))` is stored as the job result.
    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError>;
}

/// Why a job did not complete.
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Retrying cannot help: bad payload, missing report, rejected lead
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// The remote side may recover; re-queued while attempts remain
    #[error("Transient job failure: {0}")]
    Transient(String),
}

impl JobExecutionError {
    /// Whether the runner should re-queue the job.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<DeliveryError> for JobExecutionError {
    fn from(err: DeliveryError) -> Self {
        if err.is_transient() {
            Self::Transient(err.to_string())
        } else {
            Self::Permanent(err.to_string())
        }
    }
}

/// Handlers keyed by job type.
#[derive(Debug, Default)]
pub struct JobExecutor {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any earlier one for the same type.
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        info!(job_type = %job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    pub async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let handler = self.handlers.get(&job.job_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job type '{}'",
                job.job_type
            ))
        })?;

        info!(
            job_id = %job.id,
            job_type = %job.job_type,
            attempt = job.attempts,
            max_attempts = job.max_attempts,
            "Executing job"
        );

        handler.execute(job).await
    }

    /// Registered job types, sorted.
    pub fn job_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}
