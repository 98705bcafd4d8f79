//! Free-audit quota on top of the usage counter.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use aieo_core::error::AppError;
use aieo_core::types::AccountId;
use aieo_database::UsageCounter;

/// Usage figures returned to the account owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub audit_count: i32,
    pub quota: i32,
    pub remaining: i32,
}

/// Enforces at most `free_audits` runs per account.
#[derive(Debug, Clone)]
pub struct UsagePolicy {
    counter: Arc<dyn UsageCounter>,
    free_audits: i32,
}

impl UsagePolicy {
    /// Creates a policy over `counter`.
    pub fn new(counter: Arc<dyn UsageCounter>, free_audits: i32) -> Self {
        Self {
            counter,
            free_audits,
        }
    }

    /// Audits allowed per account.
    pub fn free_audits(&self) -> i32 {
        self.free_audits
    }

    /// Fail with `QuotaExceeded` when the account has no audits left.
    pub async fn check(&self, account: AccountId) -> Result<(), AppError> {
        let profile = self.counter.ensure(account).await?;
        if !profile.has_quota(self.free_audits) {
            return Err(self.exhausted());
        }
        Ok(())
    }

    /// Count one completed run and return the new count.
    ///
    /// Fails with `QuotaExceeded` when a concurrent run took the last slot
    /// after [`UsagePolicy::check`] passed.
    pub async fn claim(&self, account: AccountId) -> Result<i32, AppError> {
        match self.counter.increment(account, self.free_audits).await? {
            Some(count) => Ok(count),
            None => {
                warn!(account_id = %account, "Quota reached by a concurrent run");
                Err(self.exhausted())
            }
        }
    }

    fn exhausted(&self) -> AppError {
        AppError::quota_exceeded(format!(
            "You have used all {} free audits on this account",
            self.free_audits
        ))
    }

    /// Current usage for `account`.
    pub async fn status(&self, account: AccountId) -> Result<QuotaStatus, AppError> {
        let profile = self.counter.ensure(account).await?;
        Ok(QuotaStatus {
            audit_count: profile.audit_count,
            quota: self.free_audits,
            remaining: profile.remaining(self.free_audits),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aieo_core::error::ErrorKind;
    use aieo_database::memory::MemoryUsageCounter;

    #[tokio::test]
    async fn test_check_fails_once_quota_used() {
        let policy = UsagePolicy::new(Arc::new(MemoryUsageCounter::new()), 2);
        let account = AccountId::new();

        policy.check(account).await.expect("first");
        assert_eq!(policy.claim(account).await.expect("claim"), 1);
        policy.check(account).await.expect("second");
        assert_eq!(policy.claim(account).await.expect("claim"), 2);

        let err = policy.check(account).await.expect_err("exhausted");
        assert_eq!(err.kind, ErrorKind::QuotaExceeded);

        let status = policy.status(account).await.expect("status");
        assert_eq!(
            status,
            QuotaStatus {
                audit_count: 2,
                quota: 2,
                remaining: 0
            }
        );
    }

    #[tokio::test]
    async fn test_claim_past_ceiling_is_quota_exceeded() {
        let counter = Arc::new(MemoryUsageCounter::new());
        let policy = UsagePolicy::new(counter.clone(), 1);
        let account = AccountId::new();

        policy.check(account).await.expect("first check");
        policy.check(account).await.expect("second check");
        policy.claim(account).await.expect("claim");

        let err = policy.claim(account).await.expect_err("over");
        assert_eq!(err.kind, ErrorKind::QuotaExceeded);
        assert_eq!(counter.ensure(account).await.expect("profile").audit_count, 1);
    }
}
