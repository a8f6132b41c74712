//! Configuration loader for the chatbot.
//!
//! Reads `config.toml` from the data directory (`~/.changebot/` by default)
//! and deserializes it into [`ChatConfig`]. Falls back to defaults when the
//! file is missing or malformed. Command-line and environment values are
//! layered on top with [`ConfigOverrides`].

use std::path::Path;

use changebot_types::config::ChatConfig;
use changebot_types::error::ConfigError;
use reqwest::Url;

use crate::filesystem::config_path;

/// Values supplied on the command line or through the environment.
///
/// `None` leaves the file value in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint_url: Option<String>,
    pub refresh_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ChatConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_chat_config(data_dir: &Path) -> ChatConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return ChatConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ChatConfig::default();
        }
    };

    match toml::from_str::<ChatConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ChatConfig::default()
        }
    }
}

/// Apply overrides on top of a loaded config and validate the result.
///
/// Blank URLs count as unset. A non-blank URL must be absolute http(s).
/// The chat endpoint may still be unset afterwards; callers that need it
/// check [`ChatConfig::endpoint`].
pub fn resolve_config(
    mut config: ChatConfig,
    overrides: ConfigOverrides,
) -> Result<ChatConfig, ConfigError> {
    if let Some(url) = overrides.endpoint_url {
        config.endpoint_url = Some(url);
    }
    if let Some(url) = overrides.refresh_url {
        config.refresh_url = Some(url);
    }
    if let Some(secs) = overrides.request_timeout_secs {
        config.request_timeout_secs = secs;
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout);
    }
    if let Some(url) = config.endpoint() {
        validate_url("endpoint_url", url)?;
    }
    if let Some(url) = config.refresh_endpoint() {
        validate_url("refresh_url", url)?;
    }

    Ok(config)
}

/// Parse `value` as an absolute http or https URL.
pub fn validate_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        field,
        message: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            field,
            message: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_chat_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_chat_config(tmp.path()).await;
        assert_eq!(config, ChatConfig::default());
    }

    #[tokio::test]
    async fn load_chat_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            config_path(tmp.path()),
            r#"
endpoint_url = "https://hooks.example.com/webhook/rag"
request_timeout_secs = 45
"#,
        )
        .await
        .unwrap();

        let config = load_chat_config(tmp.path()).await;
        assert_eq!(config.endpoint(), Some("https://hooks.example.com/webhook/rag"));
        assert!(config.refresh_endpoint().is_none());
        assert_eq!(config.request_timeout_secs, 45);
    }

    #[tokio::test]
    async fn load_chat_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(config_path(tmp.path()), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_chat_config(tmp.path()).await;
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn resolve_config_overrides_win() {
        let file = ChatConfig {
            endpoint_url: Some("https://file.example.com/chat".to_string()),
            refresh_url: None,
            request_timeout_secs: 30,
        };
        let overrides = ConfigOverrides {
            endpoint_url: Some("https://flag.example.com/chat".to_string()),
            refresh_url: Some("https://flag.example.com/refresh".to_string()),
            request_timeout_secs: Some(5),
        };

        let config = resolve_config(file, overrides).unwrap();
        assert_eq!(config.endpoint(), Some("https://flag.example.com/chat"));
        assert_eq!(config.refresh_endpoint(), Some("https://flag.example.com/refresh"));
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn resolve_config_without_overrides_keeps_file() {
        let file = ChatConfig {
            endpoint_url: Some("http://localhost:5678/webhook/rag".to_string()),
            refresh_url: None,
            request_timeout_secs: 12,
        };
        let config = resolve_config(file.clone(), ConfigOverrides::default()).unwrap();
        assert_eq!(config, file);
    }

    #[test]
    fn resolve_config_blank_refresh_is_unset() {
        let overrides = ConfigOverrides {
            refresh_url: Some(String::new()),
            ..Default::default()
        };
        let config = resolve_config(ChatConfig::default(), overrides).unwrap();
        assert!(config.refresh_endpoint().is_none());
    }

    #[test]
    fn resolve_config_rejects_bad_values() {
        let overrides = ConfigOverrides {
            endpoint_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(ChatConfig::default(), overrides),
            Err(ConfigError::InvalidUrl { field: "endpoint_url", .. })
        ));

        let overrides = ConfigOverrides {
            refresh_url: Some("ftp://example.com/refresh".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(ChatConfig::default(), overrides),
            Err(ConfigError::InvalidUrl { field: "refresh_url", .. })
        ));

        let overrides = ConfigOverrides {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(ChatConfig::default(), overrides),
            Err(ConfigError::InvalidTimeout)
        ));
    }
}
