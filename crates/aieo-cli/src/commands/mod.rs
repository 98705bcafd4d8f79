//! CLI command definitions and dispatch.

pub mod jobs;
pub mod migrate;
pub mod probe;
pub mod reports;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use aieo_core::config::{AppConfig, DatabaseBackend};
use aieo_core::error::AppError;
use aieo_database::DatabasePool;
use aieo_database::repositories::{JobRepository, ReportRepository};

use crate::output::OutputFormat;

/// AIEO audit service operator tool
#[derive(Debug, Parser)]
#[command(name = "aieo-cli", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment overlay (`config/{env}.toml`); defaults to
    /// `AIEO_ENV` or `development`
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Inspect and decide reports
    Reports(reports::ReportsArgs),
    /// Inspect the background job queue
    Jobs(jobs::JobsArgs),
    /// Check that the API key can reach the configured models
    ProbeModel(probe::ProbeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Reports(args) => reports::execute(args, &config, self.format).await,
            Commands::Jobs(args) => jobs::execute(args, &config, self.format).await,
            Commands::ProbeModel(args) => probe::execute(args, &config).await,
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        let env = self
            .env
            .clone()
            .or_else(|| std::env::var("AIEO_ENV").ok())
            .unwrap_or_else(|| "development".to_string());
        AppConfig::load(&env)
    }
}

/// Stores the CLI works against. Only PostgreSQL holds state across runs.
pub struct Stores {
    pub pool: DatabasePool,
    pub reports: Arc<ReportRepository>,
    pub jobs: Arc<JobRepository>,
}

/// Helper: connect to the configured PostgreSQL database
pub async fn connect(config: &AppConfig) -> Result<Stores, AppError> {
    if config.database.backend != DatabaseBackend::Postgres {
        return Err(AppError::configuration(
            "The CLI needs database.backend = \"postgres\"; the memory backend keeps no state",
        ));
    }
    let pool = DatabasePool::connect(&config.database).await?;
    tracing::debug!("Connected to database");
    Ok(Stores {
        reports: Arc::new(ReportRepository::new(pool.pool().clone())),
        jobs: Arc::new(JobRepository::new(pool.pool().clone())),
        pool,
    })
}
