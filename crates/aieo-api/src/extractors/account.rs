//! Account extractors: pull the account token from the Authorization header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use aieo_core::error::AppError;
use aieo_core::types::AccountId;

use super::bearer_token;
use crate::state::AppState;

/// A signed-in account. Rejects anonymous requests with 401.
#[derive(Debug, Clone, Copy)]
pub struct AccountUser(pub AccountId);

/// The account when a token is presented. A token that is present but
/// invalid is still rejected.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAccount(pub Option<AccountId>);

impl FromRequestParts<AppState> for MaybeAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(MaybeAccount(Some(state.tokens.verify(token)?))),
            None => Ok(MaybeAccount(None)),
        }
    }
}

impl FromRequestParts<AppState> for AccountUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;
        Ok(AccountUser(state.tokens.verify(token)?))
    }
}
