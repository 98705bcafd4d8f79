//! Reviewer notification and access configuration.

use serde::{Deserialize, Serialize};

/// Shortest webhook URL accepted as configured.
const MIN_WEBHOOK_URL_LEN: usize = 10;

/// Reviewer-side settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Chat webhook that receives approval requests.
    #[serde(default)]
    pub webhook_url: String,
    /// Bearer token required on reviewer routes.
    #[serde(default)]
    pub api_token: String,
    /// Webhook request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl ReviewConfig {
    /// The webhook URL when it looks usable.
    pub fn webhook(&self) -> Option<&str> {
        let url = self.webhook_url.trim();
        (url.len() >= MIN_WEBHOOK_URL_LEN).then_some(url)
    }

    /// The reviewer token when one is configured.
    pub fn token(&self) -> Option<&str> {
        let token = self.api_token.trim();
        (!token.is_empty()).then_some(token)
    }
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_webhook_is_unconfigured() {
        let mut config = ReviewConfig {
            webhook_url: "http://x".to_string(),
            ..Default::default()
        };
        assert!(config.webhook().is_none());
        config.webhook_url = "https://discord.com/api/webhooks/1/abc".to_string();
        assert!(config.webhook().is_some());
    }
}
