//! Connectivity check for the configured API key and models.

use std::fmt;

use crate::client::{GenerationError, TextGenerator};

/// Prompt sent by the probe.
pub const PROBE_PROMPT: &str = "Reply with exactly: OK";

/// What a single probe call told us about a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The model answered.
    Ok,
    /// The model id is unknown to the provider.
    NotFound,
    /// The key works but is throttled.
    RateLimited,
    /// The key lacks access to the model.
    PermissionDenied,
    /// The key was rejected.
    Unauthorized,
    /// No key configured.
    MissingKey,
    /// Anything else.
    Failed(String),
}

impl ProbeOutcome {
    /// Classify a generation result.
    pub fn from_result<T>(result: &Result<T, GenerationError>) -> Self {
        let err = match result {
            Ok(_) => return Self::Ok,
            Err(e) => e,
        };
        match err {
            GenerationError::MissingApiKey => Self::MissingKey,
            GenerationError::RateLimited { .. } => Self::RateLimited,
            GenerationError::EmptyResponse { .. } => Self::Ok,
            other => match other.status() {
                Some(404) => Self::NotFound,
                Some(403) => Self::PermissionDenied,
                Some(401) => Self::Unauthorized,
                Some(400) if other.to_string().contains("API key not valid") => {
                    Self::Unauthorized
                }
                _ => Self::Failed(other.to_string()),
            },
        }
    }

    /// Whether further models are worth trying with the same key.
    pub fn is_key_problem(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::PermissionDenied | Self::MissingKey
        )
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::NotFound => write!(f, "model not found"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::MissingKey => write!(f, "no API key configured"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Probe each model in order, stopping early on key-level failures.
pub async fn probe_models(
    generator: &dyn TextGenerator,
    models: &[String],
) -> Vec<(String, ProbeOutcome)> {
    let mut outcomes = Vec::with_capacity(models.len());
    for model in models {
        let outcome = ProbeOutcome::from_result(&generator.generate(PROBE_PROMPT, model).await);
        let stop = outcome.is_key_problem();
        outcomes.push((model.clone(), outcome));
        if stop {
            break;
        }
    }
    outcomes
}
