//! Generative text clients and the retry/fallback policy around them.

pub mod error;
pub mod fallback;
pub mod gemini;

use async_trait::async_trait;

use aieo_entity::result::Source;

pub use error::GenerationError;
pub use fallback::{FallbackGenerator, RetryPolicy};
pub use gemini::GeminiClient;

/// Raw model output plus the grounding citations the provider returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    /// Model text, untrusted.
    pub text: String,
    /// Web pages consulted while grounding, empty when none.
    pub citations: Vec<Source>,
}

/// A single call to a hosted text model.
#[async_trait]
pub trait TextGenerator: Send + Sync + std::fmt::Debug {
    /// Send `prompt` to `model` once. No retries at this level.
    async fn generate(&self, prompt: &str, model: &str) -> Result<Generation, GenerationError>;
}
