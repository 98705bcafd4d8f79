//! Account bearer-token verification (HS256).

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aieo_core::config::AuthConfig;
use aieo_core::error::AppError;
use aieo_core::types::AccountId;

/// Claims read from an account token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account ID.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issuer, checked when one is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Verifies account tokens issued by the identity provider.
#[derive(Clone)]
pub struct TokenVerifier {
    /// `None` when no secret is configured.
    decoding_key: Option<DecodingKey>,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("enabled", &self.is_enabled())
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;
        if let Some(issuer) = config.issuer.as_deref().filter(|i| !i.is_empty()) {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: config
                .is_enabled()
                .then(|| DecodingKey::from_secret(config.jwt_secret.as_bytes())),
            validation,
        }
    }

    /// Whether tokens can be verified at all.
    pub fn is_enabled(&self) -> bool {
        self.decoding_key.is_some()
    }

    /// Validate `token` and return the account it names.
    pub fn verify(&self, token: &str) -> Result<AccountId, AppError> {
        let key = self
            .decoding_key
            .as_ref()
            .ok_or_else(|| AppError::configuration("Account sign-in is not configured"))?;

        let data = decode::<Claims>(token, key, &self.validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::authentication("Token has expired")
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                AppError::authentication("Invalid token signature")
            }
            _ => AppError::authentication(format!("Token validation failed: {e}")),
        })?;

        Ok(AccountId::from_uuid(data.claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aieo_core::error::ErrorKind;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(secret: &str, sub: Uuid, exp: i64) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &Claims { sub, exp, iss: None },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode")
    }

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            issuer: None,
        }
    }

    #[test]
    fn test_valid_token_yields_account() {
        let verifier = TokenVerifier::new(&config("s3cret"));
        let sub = Uuid::new_v4();
        let exp = chrono::Utc::now().timestamp() + 600;
        let account = verifier.verify(&token("s3cret", sub, exp)).expect("verify");
        assert_eq!(account.into_uuid(), sub);
    }

    #[test]
    fn test_wrong_secret_and_expiry_are_rejected() {
        let verifier = TokenVerifier::new(&config("s3cret"));
        let exp = chrono::Utc::now().timestamp() + 600;
        let err = verifier
            .verify(&token("other", Uuid::new_v4(), exp))
            .expect_err("bad signature");
        assert_eq!(err.kind, ErrorKind::Authentication);

        let expired = chrono::Utc::now().timestamp() - 3600;
        let err = verifier
            .verify(&token("s3cret", Uuid::new_v4(), expired))
            .expect_err("expired");
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_disabled_verifier_is_a_configuration_error() {
        let verifier = TokenVerifier::new(&AuthConfig::default());
        assert!(!verifier.is_enabled());
        let err = verifier.verify("anything").expect_err("disabled");
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
