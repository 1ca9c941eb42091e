//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.tutorbot/config.json`) and environment.
//! Everything is read once at startup and passed around immutably; there is no
//! runtime reconfiguration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream chat-completion API settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Server bind and port settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Listening port (default 10000). Overridden by the PORT env var when set.
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0" — the webhook caller is an external platform).
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

fn default_server_port() -> u16 {
    10000
}

fn default_server_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

/// Upstream chat-completion API settings (DeepSeek, OpenAI-compatible).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamConfig {
    /// OpenAI-compat base URL (default "https://api.deepseek.com/v1").
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_upstream_model")]
    pub model: String,

    /// max_tokens for each completion. Replies are intentionally short.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Total request timeout in seconds (connect + response).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token for the upstream API. Overridden by DEEPSEEK_API_KEY env when set.
    pub api_key: Option<String>,
}

fn default_upstream_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_upstream_model() -> String {
    "deepseek-chat".to_string()
}

fn default_max_tokens() -> u32 {
    50
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            model: default_upstream_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

/// Resolve the upstream API key: env DEEPSEEK_API_KEY overrides config.
pub fn resolve_api_key(config: &Config) -> Option<String> {
    resolve_api_key_from(std::env::var("DEEPSEEK_API_KEY").ok(), config)
}

/// Key resolution with the env value passed in (whitespace-only counts as unset).
fn resolve_api_key_from(env_key: Option<String>, config: &Config) -> Option<String> {
    env_key
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            config
                .upstream
                .api_key
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve the listening port: env PORT overrides config when it parses.
pub fn resolve_port(config: &Config) -> u16 {
    resolve_port_from(std::env::var("PORT").ok(), config)
}

/// Port resolution with the env value passed in (unparsable counts as unset).
fn resolve_port_from(env_port: Option<String>, config: &Config) -> u16 {
    env_port
        .and_then(|s| s.trim().parse::<u16>().ok())
        .unwrap_or(config.server.port)
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("TUTORBOT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".tutorbot").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or TUTORBOT_CONFIG_PATH). Missing file => default config.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(default_config_path);
    if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        return Ok(Config::default());
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing config from {}", path.display()))
}
