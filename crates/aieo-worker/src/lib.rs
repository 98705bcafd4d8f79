//! Background job processing and scheduled maintenance.
//!
//! This crate provides:
//! - A job queue over the [`JobStore`](aieo_database::JobStore) port
//! - A job executor that dispatches jobs to the correct handler
//! - A worker runner that polls for and executes queued jobs
//! - A cron scheduler that purges finished jobs
//! - The lead-sync handler that follows a report approval

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use queue::{JobQueue, QueueStats};
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
