//! In-memory usage counter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use aieo_core::result::AppResult;
use aieo_core::types::AccountId;
use aieo_entity::Profile;

use crate::store::UsageCounter;

/// Profiles kept in a concurrent map. The entry lock makes the
/// check-and-increment atomic per account.
#[derive(Debug, Clone, Default)]
pub struct MemoryUsageCounter {
    profiles: Arc<DashMap<AccountId, Profile>>,
}

impl MemoryUsageCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageCounter for MemoryUsageCounter {
    async fn ensure(&self, account: AccountId) -> AppResult<Profile> {
        Ok(self
            .profiles
            .entry(account)
            .or_insert_with(|| Profile::new(account))
            .clone())
    }

    async fn increment(&self, account: AccountId, ceiling: i32) -> AppResult<Option<i32>> {
        let mut profile = self
            .profiles
            .entry(account)
            .or_insert_with(|| Profile::new(account));
        if profile.audit_count >= ceiling {
            return Ok(None);
        }
        profile.audit_count += 1;
        profile.updated_at = Utc::now();
        Ok(Some(profile.audit_count))
    }
}
