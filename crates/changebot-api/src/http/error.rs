//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use changebot_types::error::{RefreshError, SessionError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat session errors.
    Session(SessionError),
    /// Refresh call errors.
    Refresh(RefreshError),
    /// Validation error.
    Validation(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<RefreshError> for AppError {
    fn from(e: RefreshError) -> Self {
        AppError::Refresh(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Session(SessionError::NotFound) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", "Session not found".to_string())
            }
            AppError::Session(SessionError::EmptyMessage) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Message must not be empty".to_string())
            }
            AppError::Session(SessionError::Busy) => (
                StatusCode::CONFLICT,
                "SESSION_BUSY",
                "A request is already in flight for this session".to_string(),
            ),
            AppError::Refresh(RefreshError::NotConfigured) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "REFRESH_NOT_CONFIGURED",
                "Refresh endpoint is not configured".to_string(),
            ),
            AppError::Refresh(e) => (StatusCode::BAD_GATEWAY, "REFRESH_FAILED", e.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        tracing::debug!(status = status.as_u16(), code, "Request failed");
        let request_id = uuid::Uuid::now_v7().to_string();
        (status, Json(ApiResponse::error(code, &message, request_id))).into_response()
    }
}
