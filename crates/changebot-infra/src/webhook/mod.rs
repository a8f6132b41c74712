//! Webhook client implementations.

pub mod http;

pub use http::{HttpRefreshClient, HttpWebhookClient};
