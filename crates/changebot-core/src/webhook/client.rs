//! WebhookClient trait definition.
//!
//! Uses RPITIT (native async fn in traits, Rust 2024 edition), the same
//! pattern as the repository traits.

use changebot_types::error::{ExchangeError, RefreshError};
use serde_json::Value;

/// Outbound calls to the remote webhook service.
///
/// Implementations live in changebot-infra (e.g., `HttpWebhookClient`).
/// Every call is a single attempt: implementations must not retry.
pub trait WebhookClient: Send + Sync {
    /// The chat endpoint this client posts to (for banners and logs).
    fn endpoint(&self) -> &str;

    /// Send `{"query": query}` to the chat endpoint and return the parsed body.
    ///
    /// The body may be any JSON value; no schema is enforced on the remote side.
    fn exchange(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Value, ExchangeError>> + Send;

    /// POST `{}` to the refresh endpoint. The response body is ignored.
    ///
    /// Returns `RefreshError::NotConfigured` without any network traffic when
    /// no refresh endpoint is set.
    fn refresh(&self) -> impl std::future::Future<Output = Result<(), RefreshError>> + Send;
}
