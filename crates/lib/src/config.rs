//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.minds/config.json`) and environment.
//! The two Messenger secrets are normally supplied through the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Webhook server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Messenger page settings.
    #[serde(default)]
    pub messenger: MessengerConfig,
}

/// Webhook server bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for the webhook HTTP server (default 3000).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0"; the platform must reach the webhook).
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_gateway_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// Messenger page config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessengerConfig {
    /// Page access token for the Send API. Overridden by PAGE_ACCESS_TOKEN env.
    pub page_access_token: Option<String>,
    /// Secret the platform echoes in the webhook verification handshake. Overridden by VERIFY_TOKEN env.
    pub verify_token: Option<String>,
    /// Send API base URL (default https://graph.facebook.com/v2.6).
    pub api_base: Option<String>,
}

/// Non-blank env value wins over a non-blank configured value.
fn resolve_secret(env_value: Option<String>, configured: Option<&String>) -> Option<String> {
    env_value
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            configured
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve the page access token: env PAGE_ACCESS_TOKEN overrides config.
pub fn resolve_page_access_token(config: &Config) -> Option<String> {
    resolve_secret(
        std::env::var("PAGE_ACCESS_TOKEN").ok(),
        config.messenger.page_access_token.as_ref(),
    )
}

/// Resolve the webhook verify token: env VERIFY_TOKEN overrides config.
pub fn resolve_verify_token(config: &Config) -> Option<String> {
    resolve_secret(
        std::env::var("VERIFY_TOKEN").ok(),
        config.messenger.verify_token.as_ref(),
    )
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("MINDS_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".minds").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path, or the default path (MINDS_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gateway_port_and_bind() {
        let g = GatewayConfig::default();
        assert_eq!(g.port, 3000);
        assert_eq!(g.bind, "0.0.0.0");
    }

    #[test]
    fn parses_camel_case_with_missing_sections() {
        let config: Config = serde_json::from_str(
            r#"{ "messenger": { "pageAccessToken": "EAAB", "apiBase": "http://localhost:9000" } }"#,
        )
        .unwrap();
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(config.messenger.page_access_token.as_deref(), Some("EAAB"));
        assert_eq!(config.messenger.api_base.as_deref(), Some("http://localhost:9000"));
        assert!(config.messenger.verify_token.is_none());
    }

    #[test]
    fn env_secret_overrides_config() {
        let configured = "from-config".to_string();
        assert_eq!(
            resolve_secret(Some(" from-env ".to_string()), Some(&configured)).as_deref(),
            Some("from-env")
        );
        assert_eq!(
            resolve_secret(Some("   ".to_string()), Some(&configured)).as_deref(),
            Some("from-config")
        );
        assert_eq!(resolve_secret(None, Some(&" ".to_string())), None);
        assert_eq!(resolve_secret(None, None), None);
    }

    #[test]
    fn load_config_missing_file_is_default() {
        let path = std::env::temp_dir().join(format!("minds-missing-{}.json", uuid::Uuid::new_v4()));
        let (config, used) = load_config(Some(path.clone())).unwrap();
        assert_eq!(used, path);
        assert_eq!(config.gateway.port, 3000);
    }

    #[test]
    fn load_config_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("minds-bad-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("parsing config"));
        let _ = std::fs::remove_file(path);
    }
}
