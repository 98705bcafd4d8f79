//! Reviewer access via a shared bearer token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use aieo_core::error::AppError;

use super::bearer_token;
use crate::state::AppState;

/// Proof that the request carries the reviewer token.
#[derive(Debug, Clone, Copy)]
pub struct Reviewer;

impl FromRequestParts<AppState> for Reviewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let expected = state
            .config
            .review
            .token()
            .ok_or_else(|| AppError::configuration("Reviewer access is not configured"))?;

        let presented = bearer_token(parts)?
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        if !constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
            return Err(AppError::authorization("Invalid reviewer token"));
        }
        Ok(Reviewer)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
