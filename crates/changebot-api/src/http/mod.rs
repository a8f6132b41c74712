//! HTTP/REST API layer for the chatbot.
//!
//! Axum-based REST API at `/api/v1/` with envelope response format and CORS
//! support. Each API session owns an isolated transcript.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
