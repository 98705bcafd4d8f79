//! Background job queue commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use aieo_core::config::AppConfig;
use aieo_core::error::AppError;
use aieo_core::types::JobId;
use aieo_database::JobStore;
use aieo_entity::job::JobStatus;
use aieo_worker::JobQueue;

use super::reports::parse_id;
use crate::output::{self, OutputFormat};

/// Arguments for job commands
#[derive(Debug, Args)]
pub struct JobsArgs {
    /// Job subcommand
    #[command(subcommand)]
    pub command: JobsCommand,
}

/// Job subcommands
#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// List jobs, newest first
    List {
        /// Only jobs in this status (pending, running, completed, failed, cancelled)
        #[arg(long)]
        status: Option<String>,
        /// Maximum number of jobs
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
    /// Show queue counts
    Stats,
    /// Re-queue a failed job
    Retry {
        /// Job ID
        id: String,
    },
}

/// Job display row
#[derive(Debug, Serialize, Tabled)]
struct JobRow {
    /// Job ID
    id: String,
    /// Type
    job_type: String,
    /// Status
    status: String,
    /// Attempts
    attempts: String,
    /// Next run
    run_at: String,
    /// Last error
    error: String,
}

/// Execute job commands
pub async fn execute(
    args: &JobsArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::connect(config).await?;

    match &args.command {
        JobsCommand::List { status, limit } => {
            let status = status.as_deref().map(str::parse::<JobStatus>).transpose()?;
            let jobs = stores.jobs.list(status, *limit).await?;
            let rows: Vec<JobRow> = jobs
                .iter()
                .map(|j| JobRow {
                    id: j.id.to_string(),
                    job_type: j.job_type.clone(),
                    status: j.status.to_string(),
                    attempts: format!("{}/{}", j.attempts, j.max_attempts),
                    run_at: j.run_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    error: j
                        .error_message
                        .as_deref()
                        .map(|e| e.chars().take(60).collect())
                        .unwrap_or_default(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        JobsCommand::Stats => {
            let queue = JobQueue::new(stores.jobs.clone() as Arc<dyn JobStore>);
            let stats = queue.stats().await?;
            match format {
                OutputFormat::Json => output::print_json(&stats),
                OutputFormat::Table => {
                    println!("Job Queue Status:");
                    output::print_kv("Pending", &stats.pending.to_string());
                    output::print_kv("Running", &stats.running.to_string());
                    output::print_kv("Failed", &stats.failed.to_string());
                    output::print_kv("Completed", &stats.completed.to_string());
                    output::print_kv("Worker Enabled", &config.worker.enabled.to_string());
                    output::print_kv("Concurrency", &config.worker.concurrency.to_string());
                }
            }
        }
        JobsCommand::Retry { id } => {
            let id: JobId = parse_id(id)?;
            match stores.jobs.retry(id).await? {
                Some(job) => output::print_success(&format!(
                    "Job {} re-queued ({} attempts allowed)",
                    job.id, job.max_attempts
                )),
                None => output::print_warning(&format!("Job {id} is not in the failed state")),
            }
        }
    }

    Ok(())
}
