//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, error, info};

use aieo_core::config::WorkerConfig;
use aieo_core::error::AppError;
use aieo_database::JobStore;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Store whose finished jobs are purged
    store: Arc<dyn JobStore>,
    /// Schedule and retention settings
    config: WorkerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("cleanup_cron", &self.config.cleanup_cron)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(store: Arc<dyn JobStore>, config: WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            store,
            config,
        })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_job_cleanup().await?;
        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }

    /// Finished-job purge on `worker.cleanup_cron`
    async fn register_job_cleanup(&self) -> Result<(), AppError> {
        let store = Arc::clone(&self.store);
        let retention_days = self.config.job_retention_days;

        let job = CronJob::new_async(self.config.cleanup_cron.as_str(), move |_uuid, _lock| {
            let store = Arc::clone(&store);
            Box::pin(async move {
                debug!("Running job cleanup");
                if let Err(e) = purge_finished_jobs(store.as_ref(), retention_days).await {
                    error!(error = %e, "Job cleanup failed");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid worker.cleanup_cron '{}': {e}",
                self.config.cleanup_cron
            ))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add job_cleanup schedule: {e}")))?;

        info!(cron = %self.config.cleanup_cron, "Registered: job_cleanup");
        Ok(())
    }
}

/// Delete finished jobs last updated more than `retention_days` ago.
pub async fn purge_finished_jobs(store: &dyn JobStore, retention_days: i64) -> Result<u64, AppError> {
    let cutoff = Utc::now() - Duration::days(retention_days.max(0));
    let removed = store.cleanup_finished(cutoff).await?;
    if removed > 0 {
        info!(removed, retention_days, "Purged finished jobs");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aieo_database::memory::MemoryJobStore;
    use aieo_entity::job::CreateJob;

    #[tokio::test]
    async fn test_purge_respects_retention() {
        let store = MemoryJobStore::new();
        let job = store
            .create(&CreateJob {
                job_type: "lead_sync".to_string(),
                payload: serde_json::json!({}),
                max_attempts: 1,
                run_at: None,
            })
            .await
            .expect("create");
        store.complete(job.id, None).await.expect("complete");

        assert_eq!(purge_finished_jobs(&store, 30).await.expect("purge"), 0);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert_eq!(purge_finished_jobs(&store, 0).await.expect("purge"), 1);
        assert!(store.find_by_id(job.id).await.expect("find").is_none());
    }
}
