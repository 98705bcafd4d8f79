//! Signed-in account handlers.

use axum::Json;
use axum::extract::State;

use aieo_core::error::AppError;

use crate::dto::response::{ApiResponse, MeResponse};
use crate::extractors::AccountUser;
use crate::state::AppState;

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    AccountUser(account): AccountUser,
) -> Result<Json<ApiResponse<MeResponse>>, AppError> {
    let quota = state.audits.quota_status(account).await?;
    let reports = state.audits.list_by_owner(account).await?;

    Ok(Json(ApiResponse::ok(MeResponse {
        account_id: account,
        quota,
        reports,
    })))
}
