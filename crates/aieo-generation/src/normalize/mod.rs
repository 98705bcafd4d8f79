//! Model text to validated [`AuditResult`].
//!
//! Two independent stages: [`extract::extract_json`] recovers a candidate
//! object from free text, then [`schema::parse_audit_result`] validates and
//! coerces it.

pub mod coerce;
pub mod extract;
pub mod schema;

use thiserror::Error;

use aieo_core::error::{AppError, ErrorKind};
use aieo_entity::AuditResult;
use aieo_entity::result::Source;

pub use coerce::Coerce;
pub use extract::extract_json;
pub use schema::{FieldError, parse_audit_result};

/// Why model output could not become an [`AuditResult`].
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The model returned nothing.
    #[error("Received empty response from the AI engine.")]
    Empty,

    /// No strategy recovered a JSON object.
    #[error("The report data is formatted incorrectly. Please try again.")]
    NoJson,

    /// The object did not match the report shape.
    #[error("Audit response validation failed: {}", join_errors(.0))]
    Schema(Vec<FieldError>),
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        let details = match &err {
            NormalizeError::Schema(errors) => Some(serde_json::Value::Array(
                errors
                    .iter()
                    .map(|e| serde_json::Value::String(e.to_string()))
                    .collect(),
            )),
            _ => None,
        };
        let mut app = AppError::new(ErrorKind::Format, err.to_string());
        app.details = details;
        app
    }
}

/// Recover, validate and coerce model output. `citations` replace any
/// sources the model wrote itself.
pub fn normalize(raw_text: &str, citations: Vec<Source>) -> Result<AuditResult, NormalizeError> {
    let candidate = extract_json(raw_text)?;
    let mut result = parse_audit_result(&candidate)?;
    result.sources = citations;
    Ok(result)
}
