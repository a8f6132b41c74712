//! Shared domain types for the Change Machine chatbot.
//!
//! Turns, session summaries, configuration, and the error enums used by every
//! other crate in the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
