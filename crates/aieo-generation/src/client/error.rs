//! Failures of a single generation call.

use thiserror::Error;

use aieo_core::error::{AppError, ErrorKind};

/// Failure of one request to the generative API.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key configured.
    #[error("generative API key is not configured")]
    MissingApiKey,

    /// The provider throttled the request.
    #[error("model {model} is rate limited: {message}")]
    RateLimited { model: String, message: String },

    /// The provider reported itself unavailable.
    #[error("model {model} is unavailable: {message}")]
    Unavailable { model: String, message: String },

    /// Any other non-success response.
    #[error("model {model} returned HTTP {status}: {message}")]
    Api {
        model: String,
        status: u16,
        message: String,
    },

    /// The response had no candidate text.
    #[error("model {model} returned an empty response")]
    EmptyResponse { model: String },

    /// The request never produced a usable response.
    #[error("generative API request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl GenerationError {
    /// Throttling signals are the only ones retried against the same model.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Throttling and unavailability move the request to the secondary model.
    pub fn should_fall_back(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Unavailable { .. })
    }

    /// HTTP status reported by the provider, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Unavailable { .. } => Some(503),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        let (kind, message) = match &err {
            GenerationError::MissingApiKey => (
                ErrorKind::Configuration,
                "Report generation is not configured".to_string(),
            ),
            GenerationError::RateLimited { .. } => (
                ErrorKind::RateLimit,
                "The report engine is busy right now. Please try again in a few minutes."
                    .to_string(),
            ),
            GenerationError::Unavailable { .. } => (
                ErrorKind::ServiceUnavailable,
                "The report engine is temporarily unavailable. Please try again.".to_string(),
            ),
            GenerationError::EmptyResponse { .. } => (ErrorKind::Format, err.to_string()),
            GenerationError::Api { .. } | GenerationError::Request(_) => {
                (ErrorKind::ExternalService, err.to_string())
            }
        };
        AppError::with_source(kind, message, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_covers_unavailable_but_retry_does_not() {
        let err = GenerationError::Unavailable {
            model: "m".into(),
            message: "overloaded".into(),
        };
        assert!(err.should_fall_back());
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_api_error_neither_retries_nor_falls_back() {
        let err = GenerationError::Api {
            model: "m".into(),
            status: 400,
            message: "bad request".into(),
        };
        assert!(!err.should_fall_back());
        assert!(!err.is_rate_limited());
        assert_eq!(AppError::from(err).kind, ErrorKind::ExternalService);
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            AppError::from(GenerationError::MissingApiKey).kind,
            ErrorKind::Configuration
        );
        let limited = GenerationError::RateLimited {
            model: "m".into(),
            message: "quota".into(),
        };
        assert_eq!(AppError::from(limited).kind, ErrorKind::RateLimit);
    }
}
