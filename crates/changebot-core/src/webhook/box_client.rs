//! BoxWebhookClient -- object-safe dynamic dispatch wrapper for WebhookClient.
//!
//! 1. Define an object-safe `WebhookClientDyn` trait with boxed futures
//! 2. Blanket-impl `WebhookClientDyn` for all `T: WebhookClient`
//! 3. `BoxWebhookClient` wraps `Box<dyn WebhookClientDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use changebot_types::error::{ExchangeError, RefreshError};
use serde_json::Value;

use super::client::WebhookClient;

/// Object-safe version of [`WebhookClient`] with boxed futures.
pub trait WebhookClientDyn: Send + Sync {
    fn endpoint(&self) -> &str;

    fn exchange_boxed<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ExchangeError>> + Send + 'a>>;

    fn refresh_boxed(&self) -> Pin<Box<dyn Future<Output = Result<(), RefreshError>> + Send + '_>>;
}

impl<T: WebhookClient> WebhookClientDyn for T {
    fn endpoint(&self) -> &str {
        WebhookClient::endpoint(self)
    }

    fn exchange_boxed<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ExchangeError>> + Send + 'a>> {
        Box::pin(self.exchange(query))
    }

    fn refresh_boxed(&self) -> Pin<Box<dyn Future<Output = Result<(), RefreshError>> + Send + '_>> {
        Box::pin(self.refresh())
    }
}

/// Type-erased webhook client.
///
/// Since `WebhookClient` uses RPITIT it cannot be a trait object directly.
/// `BoxWebhookClient` implements `WebhookClient` itself by delegating to the
/// inner trait object, so it can be passed anywhere a client is expected.
pub struct BoxWebhookClient {
    inner: Box<dyn WebhookClientDyn>,
}

impl BoxWebhookClient {
    /// Wrap a concrete `WebhookClient` in a type-erased box.
    pub fn new<T: WebhookClient + 'static>(client: T) -> Self {
        Self {
            inner: Box::new(client),
        }
    }
}

impl WebhookClient for BoxWebhookClient {
    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }

    async fn exchange(&self, query: &str) -> Result<Value, ExchangeError> {
        self.inner.exchange_boxed(query).await
    }

    async fn refresh(&self) -> Result<(), RefreshError> {
        self.inner.refresh_boxed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoClient;

    impl WebhookClient for EchoClient {
        fn endpoint(&self) -> &str {
            "http://echo.test/webhook"
        }

        async fn exchange(&self, query: &str) -> Result<Value, ExchangeError> {
            Ok(json!({ "response": query }))
        }

        async fn refresh(&self) -> Result<(), RefreshError> {
            Err(RefreshError::NotConfigured)
        }
    }

    #[tokio::test]
    async fn test_box_client_delegates() {
        let client = BoxWebhookClient::new(EchoClient);
        assert_eq!(WebhookClient::endpoint(&client), "http://echo.test/webhook");

        let body = client.exchange("ping").await.unwrap();
        assert_eq!(body, json!({ "response": "ping" }));

        assert_eq!(client.refresh().await, Err(RefreshError::NotConfigured));
    }
}
