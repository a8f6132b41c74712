//! Configuration types for the chatbot.
//!
//! `ChatConfig` represents `config.toml` in the data directory. Every field
//! can be overridden from the environment or the command line.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.changebot/config.toml`. All fields have defaults; the chat
/// endpoint has none and must be supplied before chatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Webhook that answers chat queries.
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Webhook that triggers remote reindexing. Unset disables refresh.
    #[serde(default)]
    pub refresh_url: Option<String>,

    /// Upper bound on a single outbound request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            refresh_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ChatConfig {
    /// The chat endpoint, with blank values treated as unset.
    pub fn endpoint(&self) -> Option<&str> {
        non_blank(self.endpoint_url.as_deref())
    }

    /// The refresh endpoint, with blank values treated as unset.
    pub fn refresh_endpoint(&self) -> Option<&str> {
        non_blank(self.refresh_url.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
