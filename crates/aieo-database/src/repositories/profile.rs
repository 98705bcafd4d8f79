//! Profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use aieo_core::error::{AppError, ErrorKind};
use aieo_core::result::AppResult;
use aieo_core::types::AccountId;
use aieo_entity::Profile;

use crate::store::UsageCounter;

/// Repository for per-account usage profiles.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageCounter for ProfileRepository {
    async fn ensure(&self, account: AccountId) -> AppResult<Profile> {
        sqlx::query("INSERT INTO profiles (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(account)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to create profile", e))?;

        sqlx::query_as::<_, Profile>("SELECT id, audit_count, updated_at FROM profiles WHERE id = $1")
            .bind(account)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to fetch profile", e))
    }

    async fn increment(&self, account: AccountId, ceiling: i32) -> AppResult<Option<i32>> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE profiles SET audit_count = audit_count + 1, updated_at = NOW() \
             WHERE id = $1 AND audit_count < $2 RETURNING audit_count",
        )
        .bind(account)
        .bind(ceiling)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to increment audit count", e))
    }
}
