//! Rate-limit retries and secondary-model fallback.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use aieo_core::config::GenerationConfig;

use super::{Generation, GenerationError, TextGenerator};

/// Attempts and backoff applied to each model independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per model, including the first.
    pub max_attempts: u32,
    /// Delay after the first rate-limited attempt. Doubles each time.
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(2000),
        }
    }
}

/// Calls a primary model with retries, then a fallback model once.
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    /// Underlying single-shot client.
    inner: Arc<dyn TextGenerator>,
    /// Model tried first.
    primary: String,
    /// Model tried when the primary is throttled or unavailable.
    fallback: String,
    /// Retry policy per model.
    policy: RetryPolicy,
}

impl FallbackGenerator {
    /// Creates a generator from explicit models and policy.
    pub fn new(
        inner: Arc<dyn TextGenerator>,
        primary: impl Into<String>,
        fallback: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            inner,
            primary: primary.into(),
            fallback: fallback.into(),
            policy,
        }
    }

    /// Creates a generator from the `generation` config section.
    pub fn from_config(inner: Arc<dyn TextGenerator>, config: &GenerationConfig) -> Self {
        Self::new(
            inner,
            config.primary_model.clone(),
            config.fallback_model.clone(),
            RetryPolicy {
                max_attempts: config.max_attempts.max(1),
                initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            },
        )
    }

    /// Model tried first.
    pub fn primary_model(&self) -> &str {
        &self.primary
    }

    /// Generate text for `prompt`.
    ///
    /// When both models fail, the primary model's error is returned.
    pub async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let primary_err = match self.run_model(prompt, &self.primary).await {
            Ok(generation) => return Ok(generation),
            Err(e) => e,
        };

        if !primary_err.should_fall_back() || self.fallback.is_empty() {
            return Err(primary_err);
        }

        warn!(
            primary = %self.primary,
            fallback = %self.fallback,
            error = %primary_err,
            "Primary model failed, falling back"
        );

        match self.run_model(prompt, &self.fallback).await {
            Ok(generation) => Ok(generation),
            Err(fallback_err) => {
                warn!(
                    model = %self.fallback,
                    error = %fallback_err,
                    "Fallback model failed"
                );
                Err(primary_err)
            }
        }
    }

    /// Run the retry cycle against one model.
    async fn run_model(&self, prompt: &str, model: &str) -> Result<Generation, GenerationError> {
        let mut attempt = 1;
        loop {
            match self.inner.generate(prompt, model).await {
                Ok(generation) => {
                    info!(model, attempt, "Generation succeeded");
                    return Ok(generation);
                }
                Err(e) if e.is_rate_limited() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff(attempt);
                    warn!(
                        model,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;

    /// Replays scripted outcomes and records every call.
    #[derive(Debug, Default)]
    struct ScriptedGenerator {
        outcomes: Mutex<VecDeque<Result<Generation, GenerationError>>>,
        calls: Mutex<Vec<(String, Instant)>>,
        always_rate_limited: bool,
    }

    impl ScriptedGenerator {
        fn rate_limited_forever() -> Self {
            Self {
                always_rate_limited: true,
                ..Default::default()
            }
        }

        fn scripted(outcomes: Vec<Result<Generation, GenerationError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, Instant)> {
            self.calls.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str, model: &str) -> Result<Generation, GenerationError> {
            self.calls
                .lock()
                .expect("lock")
                .push((model.to_string(), Instant::now()));
            if self.always_rate_limited {
                return Err(rate_limited(model));
            }
            self.outcomes
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::EmptyResponse { model: model.into() }))
        }
    }

    fn rate_limited(model: &str) -> GenerationError {
        GenerationError::RateLimited {
            model: model.to_string(),
            message: "RESOURCE_EXHAUSTED".to_string(),
        }
    }

    fn ok(text: &str) -> Result<Generation, GenerationError> {
        Ok(Generation {
            text: text.to_string(),
            citations: Vec::new(),
        })
    }

    fn generator(inner: Arc<ScriptedGenerator>) -> FallbackGenerator {
        FallbackGenerator::new(inner, "primary", "secondary", RetryPolicy::default())
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(2000));
        assert_eq!(policy.backoff(2), Duration::from_millis(4000));
        assert_eq!(policy.backoff(3), Duration::from_millis(8000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_rate_limit_makes_six_attempts() {
        let inner = Arc::new(ScriptedGenerator::rate_limited_forever());
        let err = generator(inner.clone())
            .generate("prompt")
            .await
            .expect_err("should fail");

        let calls = inner.calls();
        let models: Vec<&str> = calls.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(
            models,
            ["primary", "primary", "primary", "secondary", "secondary", "secondary"]
        );

        let gap = |a: usize, b: usize| calls[b].1 - calls[a].1;
        assert_eq!(gap(0, 1), Duration::from_millis(2000));
        assert_eq!(gap(1, 2), Duration::from_millis(4000));
        assert_eq!(gap(2, 3), Duration::ZERO);
        assert_eq!(gap(3, 4), Duration::from_millis(2000));
        assert_eq!(gap(4, 5), Duration::from_millis(4000));

        match err {
            GenerationError::RateLimited { model, .. } => assert_eq!(model, "primary"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_one_rate_limit() {
        let inner = Arc::new(ScriptedGenerator::scripted(vec![
            Err(rate_limited("primary")),
            ok("{}"),
        ]));
        let generation = generator(inner.clone()).generate("prompt").await.expect("ok");
        assert_eq!(generation.text, "{}");
        assert_eq!(inner.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_are_not_retried_or_redirected() {
        let inner = Arc::new(ScriptedGenerator::scripted(vec![Err(GenerationError::Api {
            model: "primary".into(),
            status: 400,
            message: "bad request".into(),
        })]));
        let err = generator(inner.clone())
            .generate("prompt")
            .await
            .expect_err("should fail");
        assert_eq!(inner.calls().len(), 1);
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_goes_straight_to_fallback() {
        let inner = Arc::new(ScriptedGenerator::scripted(vec![
            Err(GenerationError::Unavailable {
                model: "primary".into(),
                message: "UNAVAILABLE".into(),
            }),
            ok("{\"fallback\":true}"),
        ]));
        let generation = generator(inner.clone()).generate("prompt").await.expect("ok");
        assert!(generation.text.contains("fallback"));

        let calls = inner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "primary");
        assert_eq!(calls[1].0, "secondary");
        assert_eq!(calls[1].1 - calls[0].1, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_error_surfaces_when_fallback_fails_differently() {
        let inner = Arc::new(ScriptedGenerator::scripted(vec![
            Err(GenerationError::Unavailable {
                model: "primary".into(),
                message: "UNAVAILABLE".into(),
            }),
            Err(GenerationError::Api {
                model: "secondary".into(),
                status: 404,
                message: "model not found".into(),
            }),
        ]));
        let err = generator(inner).generate("prompt").await.expect_err("fail");
        assert!(matches!(err, GenerationError::Unavailable { ref model, .. } if model == "primary"));
    }
}
