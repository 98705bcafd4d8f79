//! # aieo-generation
//!
//! Turns validated audit inputs into a normalized [`AuditResult`]:
//!
//! 1. [`prompt::build_prompt`] renders the instruction text.
//! 2. [`client::FallbackGenerator`] calls a [`client::TextGenerator`] with
//!    rate-limit retries and a secondary model.
//! 3. [`normalize::normalize`] recovers the JSON object from the raw text
//!    and validates it into closed enums.
//!
//! [`AuditResult`]: aieo_entity::AuditResult

pub mod client;
pub mod normalize;
pub mod probe;
pub mod prompt;

pub use client::{FallbackGenerator, Generation, GenerationError, TextGenerator};
pub use normalize::{NormalizeError, normalize};
pub use prompt::build_prompt;
