//! AIEO audit server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use aieo_api::{AppState, TokenVerifier};
use aieo_core::config::{AppConfig, DatabaseBackend};
use aieo_core::error::AppError;
use aieo_core::types::PublicLinks;
use aieo_database::memory::{MemoryJobStore, MemoryReportStore, MemoryUsageCounter};
use aieo_database::repositories::{JobRepository, ProfileRepository, ReportRepository};
use aieo_database::{DatabasePool, JobStore, ReportStore, UsageCounter};
use aieo_delivery::{DiscordNotifier, MailerLiteClient};
use aieo_generation::FallbackGenerator;
use aieo_generation::client::GeminiClient;
use aieo_service::{ApprovalGate, AuditService, SubscriptionService, UsagePolicy};
use aieo_worker::jobs::LeadSyncJobHandler;
use aieo_worker::{CronScheduler, JobExecutor, JobQueue, WorkerRunner};

#[tokio::main]
async fn main() {
    let env = std::env::var("AIEO_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Store handles for the configured backend.
struct Stores {
    pool: Option<DatabasePool>,
    reports: Arc<dyn ReportStore>,
    counter: Arc<dyn UsageCounter>,
    jobs: Arc<dyn JobStore>,
}

async fn open_stores(config: &AppConfig) -> Result<Stores, AppError> {
    match config.database.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory stores; reports and jobs are lost on restart");
            Ok(Stores {
                pool: None,
                reports: Arc::new(MemoryReportStore::new()),
                counter: Arc::new(MemoryUsageCounter::new()),
                jobs: Arc::new(MemoryJobStore::new()),
            })
        }
        DatabaseBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = DatabasePool::connect(&config.database).await?;

            if config.database.run_migrations {
                tracing::info!("Running database migrations...");
                aieo_database::migration::run_migrations(pool.pool()).await?;
                tracing::info!("Database migrations complete");
            }

            Ok(Stores {
                reports: Arc::new(ReportRepository::new(pool.pool().clone())),
                counter: Arc::new(ProfileRepository::new(pool.pool().clone())),
                jobs: Arc::new(JobRepository::new(pool.pool().clone())),
                pool: Some(pool),
            })
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AIEO audit server v{}", env!("CARGO_PKG_VERSION"));
    let started_at = Instant::now();

    // ── Step 1: Stores ───────────────────────────────────────────
    let stores = open_stores(&config).await?;

    // ── Step 2: Outbound clients ─────────────────────────────────
    if !config.generation.has_api_key() {
        tracing::warn!("No generation API key configured; audits will fail");
    }
    let model = Arc::new(GeminiClient::new(&config.generation)?);
    let generator = FallbackGenerator::from_config(model, &config.generation);

    let notifier = Arc::new(DiscordNotifier::new(&config.review)?);
    if config.review.webhook().is_none() {
        tracing::warn!("No reviewer webhook configured; approval requests will be rejected");
    }
    let mailing = Arc::new(MailerLiteClient::new(&config.mailing_list)?);

    // ── Step 3: Services ─────────────────────────────────────────
    tracing::info!("Initializing services...");
    let audits = Arc::new(AuditService::new(
        Arc::clone(&stores.reports),
        UsagePolicy::new(Arc::clone(&stores.counter), config.quota.free_audits),
        generator,
    ));
    let approvals = Arc::new(ApprovalGate::new(
        Arc::clone(&stores.reports),
        notifier,
        Arc::clone(&stores.jobs),
        config.worker.lead_sync_max_attempts,
    ));
    let subscriptions = Arc::new(SubscriptionService::new(mailing.clone()));
    let tokens = Arc::new(TokenVerifier::new(&config.auth));
    if !tokens.is_enabled() {
        tracing::info!("Account tokens not configured; only anonymous audits are accepted");
    }

    // ── Step 4: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 5: Background worker and scheduler ──────────────────
    let mut scheduler = None;
    let worker_handle = if config.worker.enabled {
        tracing::info!("Starting background worker...");

        let queue = Arc::new(JobQueue::new(Arc::clone(&stores.jobs)));
        let links = config.server.public_base().map(PublicLinks::new);
        if links.is_none() {
            tracing::warn!("server.public_url not set; synced leads carry no report link");
        }

        let mut executor = JobExecutor::new();
        executor.register(Arc::new(LeadSyncJobHandler::new(
            Arc::clone(&stores.reports),
            mailing,
            links,
        )));

        tracing::info!(job_types = ?executor.job_types(), "Job handlers registered");
        let runner = WorkerRunner::new(queue, Arc::new(executor), config.worker.clone());

        let cron = CronScheduler::new(Arc::clone(&stores.jobs), config.worker.clone()).await?;
        cron.register_default_tasks().await?;
        cron.start().await?;
        scheduler = Some(cron);

        let worker_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            runner.run(worker_cancel).await;
        });

        tracing::info!("Background worker started");
        Some(handle)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = AppState {
        config: Arc::new(config.clone()),
        started_at,
        tokens,
        reports: Arc::clone(&stores.reports),
        jobs: Arc::clone(&stores.jobs),
        audits,
        approvals,
        subscriptions,
    };
    let app = aieo_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("AIEO audit server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 8: Wait for background tasks ────────────────────────
    tracing::info!("Waiting for background tasks to complete...");

    if let Some(handle) = worker_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Worker did not stop within {:?}", grace);
        }
    }
    if let Some(mut cron) = scheduler {
        if let Err(e) = cron.shutdown().await {
            tracing::warn!("Scheduler shutdown failed: {}", e);
        }
    }
    if let Some(pool) = stores.pool {
        pool.close().await;
    }

    tracing::info!("AIEO audit server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
