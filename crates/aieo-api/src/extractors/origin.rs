//! Public base URL for links built while handling a request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use aieo_core::error::AppError;
use aieo_core::types::PublicLinks;

use crate::state::AppState;

/// Links rooted at `server.public_url`, or at the request's `Host` with
/// `X-Forwarded-Proto` (default `https`) when no public URL is configured.
#[derive(Debug, Clone)]
pub struct RequestOrigin(pub PublicLinks);

impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(base) = state.config.server.public_base() {
            return Ok(RequestOrigin(PublicLinks::new(base)));
        }

        let header = |name: &str| parts.headers.get(name).and_then(|v| v.to_str().ok());
        let host = header("x-forwarded-host")
            .or_else(|| header("host"))
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| AppError::validation("Missing Host header"))?;
        let proto = header("x-forwarded-proto").and_then(|p| p.split(',').next());

        Ok(RequestOrigin(PublicLinks::from_host(host, proto)))
    }
}
