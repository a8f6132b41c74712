//! Business logic and port definitions for the Change Machine chatbot.
//!
//! This crate defines the `WebhookClient` port that the infrastructure layer
//! implements, plus the session controller built on it. It depends only on
//! `changebot-types` -- never on `changebot-infra` or any HTTP crate.

pub mod chat;
pub mod webhook;
