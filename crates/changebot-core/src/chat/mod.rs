//! Chat session control for the Change Machine chatbot.
//!
//! `ChatSession` is the controller for one transcript; `SessionRegistry`
//! keys sessions by id for multi-user front-ends; `extract` maps webhook
//! responses to display text.

pub mod extract;
pub mod registry;
pub mod session;
