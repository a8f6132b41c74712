//! Application state wiring configuration, webhook client, and sessions.
//!
//! AppState is shared by the CLI commands and the REST API handlers. The
//! webhook client is type-erased so tests can substitute their own.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use changebot_core::chat::registry::SessionRegistry;
use changebot_core::webhook::box_client::BoxWebhookClient;
use changebot_core::webhook::client::WebhookClient;
use changebot_infra::config::{ConfigOverrides, load_chat_config, resolve_config};
use changebot_infra::webhook::HttpWebhookClient;
use changebot_types::config::ChatConfig;
use changebot_types::error::ConfigError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ChatConfig>,
    pub client: Arc<BoxWebhookClient>,
    pub sessions: SessionRegistry,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Wire state around the reqwest webhook client.
    ///
    /// Fails when the chat endpoint is unset or invalid.
    pub fn from_config(config: ChatConfig, data_dir: PathBuf) -> Result<Self, ConfigError> {
        let client = HttpWebhookClient::from_config(&config)?;
        Ok(Self::with_client(config, client, data_dir))
    }

    /// Wire state around any webhook client.
    pub fn with_client<C: WebhookClient + 'static>(
        config: ChatConfig,
        client: C,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            config: Arc::new(config),
            client: Arc::new(BoxWebhookClient::new(client)),
            sessions: SessionRegistry::new(),
            data_dir,
        }
    }
}

/// Load `config.toml` from `data_dir` and layer command-line overrides on top.
pub async fn load_config(data_dir: &Path, overrides: ConfigOverrides) -> anyhow::Result<ChatConfig> {
    let file_config = load_chat_config(data_dir).await;
    Ok(resolve_config(file_config, overrides)?)
}
