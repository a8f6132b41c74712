//! Infrastructure layer for the Change Machine chatbot.
//!
//! Contains the reqwest implementation of the `WebhookClient` port defined in
//! `changebot-core`, plus data directory resolution and config file loading.

pub mod config;
pub mod filesystem;
pub mod webhook;
