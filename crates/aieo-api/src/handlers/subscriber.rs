//! Mailing-list sign-up handler.

use axum::Json;
use axum::extract::State;

use aieo_core::error::AppError;
use aieo_delivery::SyncOutcome;
use aieo_service::SubscribeRequest;

use crate::extractors::{JsonBody, RequestOrigin};
use crate::state::AppState;

/// POST /api/subscribers
pub async fn subscribe(
    State(state): State<AppState>,
    RequestOrigin(links): RequestOrigin,
    JsonBody(req): JsonBody<SubscribeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state.subscriptions.subscribe(&req, &links).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "synced": outcome == SyncOutcome::Synced }
    })))
}
