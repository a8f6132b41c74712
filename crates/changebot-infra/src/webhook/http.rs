//! HttpWebhookClient -- concrete [`WebhookClient`] over reqwest.
//!
//! Posts `{"query": ...}` to the chat endpoint and `{}` to the optional
//! refresh endpoint. One attempt per call, bounded by the configured timeout.

use std::time::Duration;

use serde_json::{Value, json};

use changebot_core::webhook::client::WebhookClient;
use changebot_types::config::ChatConfig;
use changebot_types::error::{ConfigError, ExchangeError, RefreshError};

use crate::config::validate_url;

/// Error bodies longer than this are cut before they reach logs and banners.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Webhook client backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpWebhookClient {
    client: reqwest::Client,
    endpoint: String,
    refresher: HttpRefreshClient,
    timeout_secs: u64,
}

impl HttpWebhookClient {
    /// Build a client from resolved configuration.
    ///
    /// Fails when the chat endpoint is unset or either URL is invalid.
    pub fn from_config(config: &ChatConfig) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint().ok_or(ConfigError::MissingEndpoint)?;
        validate_url("endpoint_url", endpoint)?;

        let refresher = HttpRefreshClient::from_config(config)?;

        Ok(Self {
            client: refresher.client.clone(),
            endpoint: endpoint.to_string(),
            refresher,
            timeout_secs: config.request_timeout_secs,
        })
    }

    /// The refresh endpoint, if one is configured.
    pub fn refresh_url(&self) -> Option<&str> {
        self.refresher.url()
    }

    fn transport_error(&self, e: reqwest::Error) -> ExchangeError {
        if e.is_timeout() {
            ExchangeError::Timeout(self.timeout_secs)
        } else {
            ExchangeError::Transport(e.to_string())
        }
    }
}

/// Client for the refresh webhook alone.
///
/// Needs no chat endpoint, so `changebot refresh` works with only
/// `refresh_url` configured.
#[derive(Debug, Clone)]
pub struct HttpRefreshClient {
    client: reqwest::Client,
    url: Option<String>,
    timeout_secs: u64,
}

impl HttpRefreshClient {
    /// Build from resolved configuration. A blank or unset `refresh_url` is
    /// not an error; `refresh` then reports `NotConfigured`.
    pub fn from_config(config: &ChatConfig) -> Result<Self, ConfigError> {
        let url = match config.refresh_endpoint() {
            Some(url) => {
                validate_url("refresh_url", url)?;
                Some(url.to_string())
            }
            None => None,
        };

        if config.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            url,
            timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// POST `{}` to the refresh endpoint, ignoring the response body.
    pub async fn refresh(&self) -> Result<(), RefreshError> {
        let Some(url) = self.url.as_deref() else {
            return Err(RefreshError::NotConfigured);
        };

        let response = self
            .client
            .post(url)
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RefreshError::Timeout(self.timeout_secs)
                } else {
                    RefreshError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::Status(status.as_u16()));
        }

        tracing::info!(url = %url, "Refresh request accepted");
        Ok(())
    }
}

impl WebhookClient for HttpWebhookClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn exchange(&self, query: &str) -> Result<Value, ExchangeError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Webhook returned non-success status");
            return Err(ExchangeError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        let body = serde_json::from_str::<Value>(&text)
            .map_err(|e| ExchangeError::Decode(e.to_string()))?;

        tracing::debug!(bytes = text.len(), "Webhook response received");
        Ok(body)
    }

    async fn refresh(&self) -> Result<(), RefreshError> {
        self.refresher.refresh().await
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::Json;
    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(endpoint: &str, refresh_url: Option<&str>, timeout_secs: u64) -> HttpWebhookClient {
        HttpWebhookClient::from_config(&ChatConfig {
            endpoint_url: Some(endpoint.to_string()),
            refresh_url: refresh_url.map(str::to_string),
            request_timeout_secs: timeout_secs,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_exchange_posts_query_and_parses_json() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
        let router = Router::new()
            .route(
                "/webhook",
                post(|State(seen): State<Arc<Mutex<Vec<Value>>>>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push(body);
                    Json(json!({ "answer": "forty-two" }))
                }),
            )
            .with_state(Arc::clone(&seen));
        let base = spawn_server(router).await;
        let client = client_for(&format!("{base}/webhook"), None, 5);

        let body = client.exchange("what is the answer?").await.unwrap();

        assert_eq!(body, json!({ "answer": "forty-two" }));
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[json!({ "query": "what is the answer?" })]
        );
    }

    #[tokio::test]
    async fn test_exchange_accepts_non_object_json() {
        let router = Router::new().route("/webhook", post(|| async { Json(json!("just text")) }));
        let base = spawn_server(router).await;
        let client = client_for(&format!("{base}/webhook"), None, 5);

        assert_eq!(client.exchange("hi").await.unwrap(), json!("just text"));
    }

    #[tokio::test]
    async fn test_exchange_non_success_status() {
        let router = Router::new().route(
            "/webhook",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "workflow crashed") }),
        );
        let base = spawn_server(router).await;
        let client = client_for(&format!("{base}/webhook"), None, 5);

        let err = client.exchange("hi").await.unwrap_err();
        assert_eq!(
            err,
            ExchangeError::Status {
                status: 500,
                body: "workflow crashed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_exchange_invalid_json() {
        let router = Router::new().route("/webhook", post(|| async { "<html>not json</html>" }));
        let base = spawn_server(router).await;
        let client = client_for(&format!("{base}/webhook"), None, 5);

        let err = client.exchange("hi").await.unwrap_err();
        assert!(matches!(err, ExchangeError::Decode(_)));
        assert_eq!(err.banner(), "Error: API returned invalid JSON response");
    }

    #[tokio::test]
    async fn test_exchange_connection_refused() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(&format!("http://{addr}/webhook"), None, 5);

        let err = client.exchange("hi").await.unwrap_err();
        assert!(matches!(err, ExchangeError::Transport(_)));
    }

    #[tokio::test]
    async fn test_exchange_timeout() {
        let router = Router::new().route(
            "/webhook",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!("too late"))
            }),
        );
        let base = spawn_server(router).await;
        let client = client_for(&format!("{base}/webhook"), None, 1);

        assert_eq!(client.exchange("hi").await.unwrap_err(), ExchangeError::Timeout(1));
    }

    #[tokio::test]
    async fn test_refresh_not_configured_short_circuits() {
        let client = client_for("http://127.0.0.1:9/webhook", None, 5);
        assert!(client.refresh_url().is_none());
        assert_eq!(client.refresh().await, Err(RefreshError::NotConfigured));
    }

    #[tokio::test]
    async fn test_refresh_posts_empty_object() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
        let router = Router::new()
            .route(
                "/refresh",
                post(|State(seen): State<Arc<Mutex<Vec<Value>>>>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push(body);
                    "ignored body"
                }),
            )
            .with_state(Arc::clone(&seen));
        let base = spawn_server(router).await;
        let client = client_for(
            &format!("{base}/webhook"),
            Some(&format!("{base}/refresh")),
            5,
        );

        client.refresh().await.unwrap();
        assert_eq!(seen.lock().unwrap().as_slice(), &[json!({})]);
    }

    #[tokio::test]
    async fn test_refresh_non_success_status() {
        let router = Router::new().route("/refresh", post(|| async { StatusCode::NOT_FOUND }));
        let base = spawn_server(router).await;
        let client = client_for(
            &format!("{base}/webhook"),
            Some(&format!("{base}/refresh")),
            5,
        );

        assert_eq!(client.refresh().await, Err(RefreshError::Status(404)));
    }

    #[tokio::test]
    async fn test_refresh_client_needs_no_chat_endpoint() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
        let router = Router::new()
            .route(
                "/refresh",
                post(|State(seen): State<Arc<Mutex<Vec<Value>>>>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push(body);
                    StatusCode::OK
                }),
            )
            .with_state(Arc::clone(&seen));
        let base = spawn_server(router).await;
        let refresher = HttpRefreshClient::from_config(&ChatConfig {
            endpoint_url: None,
            refresh_url: Some(format!("{base}/refresh")),
            request_timeout_secs: 5,
        })
        .unwrap();

        refresher.refresh().await.unwrap();
        assert_eq!(seen.lock().unwrap().as_slice(), &[json!({})]);
    }

    #[tokio::test]
    async fn test_refresh_client_unset_url() {
        let refresher = HttpRefreshClient::from_config(&ChatConfig::default()).unwrap();
        assert!(refresher.url().is_none());
        assert_eq!(refresher.refresh().await, Err(RefreshError::NotConfigured));
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let err = HttpWebhookClient::from_config(&ChatConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEndpoint));
    }

    #[test]
    fn test_from_config_blank_refresh_is_unset() {
        let client = client_for("https://hooks.example.com/webhook", Some("  "), 5);
        assert_eq!(client.endpoint(), "https://hooks.example.com/webhook");
        assert!(client.refresh_url().is_none());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("héllo", 2), "hé...");
    }
}
