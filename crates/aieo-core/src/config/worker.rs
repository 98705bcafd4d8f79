//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent job processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in seconds between job queue polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Attempts a lead-sync job gets before it is marked failed.
    #[serde(default = "default_max_attempts")]
    pub lead_sync_max_attempts: i32,
    /// Base delay before a transiently failed job runs again; grows with
    /// each attempt.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,
    /// Finished jobs older than this are purged.
    #[serde(default = "default_retention_days")]
    pub job_retention_days: i64,
    /// Cron expression (with seconds) for the purge task.
    #[serde(default = "default_cleanup_cron")]
    pub cleanup_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: default_concurrency(),
            poll_interval_seconds: default_poll_interval(),
            lead_sync_max_attempts: default_max_attempts(),
            retry_delay_seconds: default_retry_delay(),
            job_retention_days: default_retention_days(),
            cleanup_cron: default_cleanup_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    2
}

fn default_poll_interval() -> u64 {
    5
}

fn default_max_attempts() -> i32 {
    5
}

fn default_retry_delay() -> u64 {
    30
}

fn default_retention_days() -> i64 {
    30
}

fn default_cleanup_cron() -> String {
    "0 15 3 * * *".to_string()
}
