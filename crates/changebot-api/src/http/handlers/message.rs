//! Chat message HTTP handler.
//!
//! POST /api/v1/sessions/{id}/messages
//!
//! Appends the user turn, exchanges with the webhook, appends the assistant
//! turn, and returns both. Webhook failures are not HTTP errors: the reply is
//! the generic error turn and `error` carries the banner text.

use std::time::Instant;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use changebot_types::chat::Turn;

use crate::http::error::AppError;
use crate::http::handlers::session::parse_uuid;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for sending a message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// The two turns produced by one interaction cycle.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub user: Turn,
    pub assistant: Turn,
    /// Banner text when the exchange failed.
    pub error: Option<String>,
}

/// POST /api/v1/sessions/{id}/messages - Send a message to the webhook.
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SendMessageResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let Json(body) = payload?;
    let sid = parse_uuid(&session_id)?;
    let outcome = state
        .sessions
        .submit(&sid, state.client.as_ref(), &body.message)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    tracing::info!(
        session_id = %sid,
        response_ms = elapsed,
        failed = outcome.error.is_some(),
        "Message exchanged"
    );

    let data = SendMessageResponse {
        user: outcome.user,
        assistant: outcome.assistant,
        error: outcome.error.map(|e| e.banner()),
    };
    let resp = ApiResponse::success(data, request_id, elapsed)
        .with_link("messages", &format!("/api/v1/sessions/{sid}/messages"));

    Ok(Json(resp))
}
