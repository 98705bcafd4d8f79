//! End-user token configuration.

use serde::{Deserialize, Serialize};

/// Settings for verifying account bearer tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared with the identity provider. Empty disables
    /// account tokens; every request is then anonymous.
    #[serde(default)]
    pub jwt_secret: String,
    /// Expected `iss` claim, if any.
    #[serde(default)]
    pub issuer: Option<String>,
}

impl AuthConfig {
    /// Whether account tokens can be verified.
    pub fn is_enabled(&self) -> bool {
        !self.jwt_secret.is_empty()
    }
}
