//! Generative API configuration.

use serde::{Deserialize, Serialize};

/// Settings for the hosted text-generation API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// API key. Empty means audits answer with a configuration error.
    #[serde(default)]
    pub api_key: String,
    /// REST base URL, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model tried first.
    #[serde(default = "default_primary_model")]
    pub primary_model: String,
    /// Model tried once the primary is rate-limited or unavailable.
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,
    /// Attempts per model before giving up on it.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for every further attempt.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Per-request timeout in seconds. `0` leaves the transport default.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Enable live web search grounding.
    #[serde(default = "default_true")]
    pub grounding: bool,
    /// Ask the provider for `application/json` output. Some providers refuse
    /// this together with the search tool, so it is off by default.
    #[serde(default)]
    pub json_response: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            primary_model: default_primary_model(),
            fallback_model: default_fallback_model(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            request_timeout_seconds: default_request_timeout(),
            grounding: true,
            json_response: false,
        }
    }
}

impl GenerationConfig {
    /// Whether an API key has been supplied.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_primary_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_fallback_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    2000
}

fn default_request_timeout() -> u64 {
    0
}

fn default_true() -> bool {
    true
}
