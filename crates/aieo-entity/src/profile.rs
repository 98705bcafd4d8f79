//! Per-account usage profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use aieo_core::types::AccountId;

/// Audit usage for one account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Account identifier.
    pub id: AccountId,
    /// Completed audit runs. Never decreases.
    pub audit_count: i32,
    /// Last change to the counter.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// A fresh profile with no audits.
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            audit_count: 0,
            updated_at: Utc::now(),
        }
    }

    /// Whether another audit fits under `quota`.
    pub fn has_quota(&self, quota: i32) -> bool {
        self.audit_count < quota
    }

    /// Audits left under `quota`.
    pub fn remaining(&self, quota: i32) -> i32 {
        (quota - self.audit_count).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_boundary() {
        let mut profile = Profile::new(AccountId::new());
        assert!(profile.has_quota(2));
        profile.audit_count = 2;
        assert!(!profile.has_quota(2));
        assert_eq!(profile.remaining(2), 0);
        profile.audit_count = 5;
        assert_eq!(profile.remaining(2), 0);
    }
}
