//! Delivery failures.

use aieo_core::error::{AppError, ErrorKind};

/// Error type for outbound deliveries.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The channel has no usable URL or credential.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Remote returned HTTP {status}: {body}")]
    HttpStatus {
        /// Response status.
        status: u16,
        /// First part of the response body.
        body: String,
    },
}

impl DeliveryError {
    /// Whether a later attempt may succeed without operator action.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NotConfigured(_) => false,
            Self::Request(_) => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

impl From<DeliveryError> for AppError {
    fn from(err: DeliveryError) -> Self {
        match err {
            DeliveryError::NotConfigured(channel) => {
                AppError::configuration(format!("{channel} is not configured"))
            }
            other => AppError::with_source(
                ErrorKind::ExternalService,
                "Outbound delivery failed",
                other,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> DeliveryError {
        DeliveryError::HttpStatus {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(status(429).is_transient());
        assert!(status(502).is_transient());
        assert!(!status(400).is_transient());
        assert!(!status(422).is_transient());
        assert!(!DeliveryError::NotConfigured("Mailing list").is_transient());
    }

    #[test]
    fn test_not_configured_maps_to_configuration() {
        let err: AppError = DeliveryError::NotConfigured("Reviewer webhook").into();
        assert_eq!(err.kind, ErrorKind::Configuration);
        let err: AppError = status(500).into();
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }
}
