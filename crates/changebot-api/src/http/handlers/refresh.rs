//! POST /api/v1/refresh - Trigger remote reindexing.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use changebot_core::webhook::client::WebhookClient;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/refresh - Fire the refresh webhook.
///
/// 503 when no refresh endpoint is configured, 502 when the call fails.
pub async fn refresh(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state.client.refresh().await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({"refreshed": true}),
        request_id,
        elapsed,
    )))
}
