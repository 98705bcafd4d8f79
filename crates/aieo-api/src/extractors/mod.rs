//! Custom Axum extractors.

pub mod account;
pub mod body;
pub mod origin;
pub mod path;
pub mod reviewer;

pub use account::{AccountUser, MaybeAccount};
pub use body::JsonBody;
pub use origin::RequestOrigin;
pub use path::IdPath;
pub use reviewer::Reviewer;

use axum::http::request::Parts;

use aieo_core::error::AppError;

/// Bearer token from the `Authorization` header, if any.
pub(crate) fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| AppError::authentication("Invalid Authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim()))
        .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))
}
