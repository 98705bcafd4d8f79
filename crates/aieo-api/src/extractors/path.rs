//! Typed path parameter extraction.

use std::str::FromStr;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use aieo_core::error::AppError;

/// A single `{id}` path segment parsed into a typed identifier. Parse
/// failures answer with the JSON error body.
#[derive(Debug, Clone, Copy)]
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: FromStr + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        raw.parse::<T>()
            .map(IdPath)
            .map_err(|_| AppError::validation(format!("Invalid identifier: {raw}")))
    }
}
