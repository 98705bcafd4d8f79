//! Worker runner: main loop that polls for jobs and executes them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::time;
use tracing::{error, info, trace, warn};

use aieo_core::config::WorkerConfig;
use aieo_entity::job::Job;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::queue::JobQueue;

/// Upper bound on the retry delay.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(6 * 60 * 60);

/// Main worker runner that polls the queue and executes jobs
#[derive(Debug, Clone)]
pub struct WorkerRunner {
    /// Job queue for polling
    queue: Arc<JobQueue>,
    /// Job executor for dispatching
    executor: Arc<JobExecutor>,
    /// Worker configuration
    config: WorkerConfig,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(queue: Arc<JobQueue>, executor: Arc<JobExecutor>, config: WorkerConfig) -> Self {
        Self {
            queue,
            executor,
            config,
        }
    }

    /// Start the worker runner; runs until the cancel signal is received
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            concurrency = self.config.concurrency,
            poll_interval_seconds = self.config.poll_interval_seconds,
            "Worker started"
        );

        let concurrency = self.config.concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds.max(1));

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        info!("Worker received shutdown signal");
                        break;
                    }
                }
                claimed = self.poll_and_spawn(&semaphore) => {
                    if claimed {
                        continue;
                    }
                    tokio::select! {
                        _ = cancel.changed() => {
                            if *cancel.borrow() {
                                info!("Worker shutting down");
                                break;
                            }
                        }
                        _ = time::sleep(poll_interval) => {}
                    }
                }
            }
        }

        info!("Worker waiting for in-flight jobs to complete...");
        let permits = u32::try_from(concurrency).unwrap_or(u32::MAX);
        let _ = time::timeout(Duration::from_secs(30), semaphore.acquire_many(permits)).await;
        info!("Worker shut down complete");
    }

    /// Claim one job and process it to completion. Returns whether a job
    /// was found.
    pub async fn process_next(&self) -> bool {
        match self.queue.dequeue().await {
            Ok(Some(job)) => {
                self.process(job).await;
                true
            }
            Ok(None) => false,
            Err(e) => {
                error!(error = %e, "Failed to dequeue job");
                false
            }
        }
    }

    /// Claim a job if a slot is free and run it on a separate task.
    async fn poll_and_spawn(&self, semaphore: &Arc<Semaphore>) -> bool {
        let Ok(permit) = semaphore.clone().try_acquire_owned() else {
            trace!("All worker slots occupied, waiting...");
            return false;
        };

        match self.queue.dequeue().await {
            Ok(Some(job)) => {
                let runner = self.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    runner.process(job).await;
                });
                true
            }
            Ok(None) => {
                trace!("No jobs available");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to dequeue job");
                false
            }
        }
    }

    /// Execute a claimed job and record the outcome.
    async fn process(&self, job: Job) {
        let job_id = job.id;
        let outcome = match self.executor.execute(&job).await {
            Ok(result) => {
                info!(job_id = %job_id, "Job completed successfully");
                self.queue.complete(job_id, result).await
            }
            Err(JobExecutionError::Transient(msg)) if job.has_attempts_left() => {
                let delay = self.retry_delay(job.attempts);
                warn!(
                    job_id = %job_id,
                    attempt = job.attempts,
                    max_attempts = job.max_attempts,
                    retry_in_seconds = delay.as_secs(),
                    error = %msg,
                    "Job failed (transient), will retry"
                );
                self.queue.retry_later(job_id, &msg, delay).await
            }
            Err(e) => {
                error!(job_id = %job_id, attempt = job.attempts, error = %e, "Job failed");
                self.queue.fail(job_id, &e.to_string()).await
            }
        };

        if let Err(e) = outcome {
            error!(job_id = %job_id, error = %e, "Failed to record job outcome");
        }
    }

    /// Delay after failed attempt number `attempt`: the base delay doubled
    /// per earlier attempt.
    fn retry_delay(&self, attempt: i32) -> Duration {
        let exponent = u32::try_from(attempt.saturating_sub(1)).unwrap_or(0).min(16);
        Duration::from_secs(self.config.retry_delay_seconds)
            .saturating_mul(2u32.saturating_pow(exponent))
            .min(MAX_RETRY_DELAY)
    }
}
