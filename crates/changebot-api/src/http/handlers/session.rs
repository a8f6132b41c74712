//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions                - Start a session
//! - GET    /api/v1/sessions                - List live sessions
//! - GET    /api/v1/sessions/{id}           - Get a single session
//! - GET    /api/v1/sessions/{id}/messages  - Get the transcript
//! - POST   /api/v1/sessions/{id}/clear     - Clear the transcript
//! - DELETE /api/v1/sessions/{id}           - Tear the session down

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use changebot_types::chat::{SessionSummary, Turn};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// POST /api/v1/sessions - Start a new empty session.
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<SessionSummary>>) {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let summary = state.sessions.create();
    let id = summary.id;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(summary, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{id}"))
        .with_link("messages", &format!("/api/v1/sessions/{id}/messages"));

    (StatusCode::CREATED, Json(resp))
}

/// GET /api/v1/sessions - List live sessions, oldest first.
pub async fn list_sessions(State(state): State<AppState>) -> Json<ApiResponse<Vec<SessionSummary>>> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sessions = state.sessions.list();

    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(sessions, request_id, elapsed).with_link("self", "/api/v1/sessions"))
}

/// GET /api/v1/sessions/{id} - Get a session by ID.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionSummary>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    let summary = state.sessions.summary(&sid)?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(summary, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{sid}"))
        .with_link("messages", &format!("/api/v1/sessions/{sid}/messages"));

    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id}/messages - Get the transcript in display order.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Turn>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    let transcript = state.sessions.transcript(&sid)?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(transcript, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{sid}/messages"))
        .with_link("session", &format!("/api/v1/sessions/{sid}"));

    Ok(Json(resp))
}

/// POST /api/v1/sessions/{id}/clear - Empty the transcript but keep the session.
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    state.sessions.clear(&sid)?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"cleared": true, "session_id": sid}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

/// DELETE /api/v1/sessions/{id} - Remove a session, cancelling any in-flight request.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    state.sessions.remove(&sid)?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(serde_json::json!({"deleted": true}), request_id, elapsed);

    Ok(Json(resp))
}
