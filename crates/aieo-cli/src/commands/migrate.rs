//! Database migration command.

use aieo_core::config::AppConfig;
use aieo_core::error::AppError;

use crate::output;

/// Run all pending migrations
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let stores = super::connect(config).await?;

    println!("Running database migrations...");
    aieo_database::migration::run_migrations(stores.pool.pool()).await?;
    output::print_success("All migrations applied successfully.");

    stores.pool.close().await;
    Ok(())
}
