//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an environment overlay and `AIEO__*` variables.
//! Each sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod generation;
pub mod logging;
pub mod mailing;
pub mod quota;
pub mod review;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseBackend, DatabaseConfig};
pub use self::generation::GenerationConfig;
pub use self::logging::LoggingConfig;
pub use self::mailing::MailingListConfig;
pub use self::quota::QuotaConfig;
pub use self::review::ReviewConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Report and profile store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Generative API settings.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Per-account audit quota.
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Reviewer notification and access settings.
    #[serde(default)]
    pub review: ReviewConfig,
    /// Mailing-list sync settings.
    #[serde(default)]
    pub mailing_list: MailingListConfig,
    /// End-user token verification.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `AIEO__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("AIEO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_every_section() {
        let config: AppConfig = serde_json::from_str("{}").expect("empty config");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.quota.free_audits, 2);
        assert_eq!(config.generation.primary_model, "gemini-2.5-flash");
        assert_eq!(config.generation.fallback_model, "gemini-1.5-flash");
        assert_eq!(config.generation.max_attempts, 3);
        assert_eq!(config.generation.initial_backoff_ms, 2000);
        assert_eq!(config.database.backend, DatabaseBackend::Postgres);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "generation": { "primary_model": "gemini-2.0-flash" },
            "database": { "backend": "memory" }
        }))
        .expect("partial config");
        assert_eq!(config.generation.primary_model, "gemini-2.0-flash");
        assert_eq!(config.generation.fallback_model, "gemini-1.5-flash");
        assert_eq!(config.database.backend, DatabaseBackend::Memory);
    }
}
