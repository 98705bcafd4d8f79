//! Mailing-list configuration.

use serde::{Deserialize, Serialize};

/// Keys shorter than this are treated as placeholders.
const MIN_API_KEY_LEN: usize = 50;

/// Mailing-list service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailingListConfig {
    /// API key. Missing or short keys skip the sync.
    #[serde(default)]
    pub api_key: String,
    /// REST base URL, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Group new subscribers are added to.
    #[serde(default)]
    pub group_id: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for MailingListConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            group_id: None,
            request_timeout_seconds: default_timeout(),
        }
    }
}

impl MailingListConfig {
    /// The API key when it looks usable.
    pub fn key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (key.len() >= MIN_API_KEY_LEN).then_some(key)
    }

    /// The group id, ignoring blank values.
    pub fn group(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }
}

fn default_base_url() -> String {
    "https://connect.mailerlite.com/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_key_is_ignored() {
        let mut config = MailingListConfig {
            api_key: "changeme".to_string(),
            ..Default::default()
        };
        assert!(config.key().is_none());
        config.api_key = "k".repeat(60);
        assert!(config.key().is_some());
    }

    #[test]
    fn test_blank_group_is_none() {
        let config = MailingListConfig {
            group_id: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.group().is_none());
    }
}
