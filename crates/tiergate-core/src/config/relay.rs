//! Chat intermediary configuration.

use super::{ConfigError, parse_duration};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where chat messages are relayed, and how the intermediary reaches the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Endpoint of the AI tool-calling intermediary.
    pub url: String,

    /// Environment variable holding the intermediary's API key.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Model name passed through to the intermediary.
    #[serde(default = "default_model")]
    pub model: String,

    /// Public URL of the MCP gateway, as seen by the intermediary.
    pub gateway_url: String,

    /// Label of the gateway in the intermediary's tool list.
    #[serde(default = "default_server_label")]
    pub server_label: String,

    /// Request timeout (e.g., "60s").
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl RelayConfig {
    /// Parsed request timeout.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration("relay.timeout", &self.timeout)
    }

    /// Resolve the API key from the environment.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_server_label() -> String {
    "tiergate".to_string()
}

fn default_timeout() -> String {
    "60s".to_string()
}
