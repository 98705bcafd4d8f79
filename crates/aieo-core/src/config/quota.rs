//! Audit quota configuration.

use serde::{Deserialize, Serialize};

/// Per-account audit allowance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Completed audits an account may run before further submissions are
    /// rejected.
    #[serde(default = "default_free_audits")]
    pub free_audits: i32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_audits: default_free_audits(),
        }
    }
}

fn default_free_audits() -> i32 {
    2
}
