//! HTTP request handlers for the REST API.

pub mod message;
pub mod refresh;
pub mod session;
