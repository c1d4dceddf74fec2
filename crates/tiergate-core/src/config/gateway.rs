//! MCP resource gateway configuration.

use super::{ConfigError, parse_duration};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the MCP resource gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Transport type: "http" or "stdio".
    #[serde(default)]
    pub transport: GatewayTransport,

    /// HTTP host (only used when transport is HTTP).
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port (only used when transport is HTTP).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Role resolution endpoint on the auth server.
    #[serde(default = "default_role_url")]
    pub role_url: String,

    /// Upper bound on the role callback (e.g., "2s").
    #[serde(default = "default_role_timeout")]
    pub role_timeout: String,
}

/// Gateway transport type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GatewayTransport {
    /// HTTP transport, bearer token per request.
    #[default]
    Http,
    /// Standard input/output transport.
    Stdio,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            transport: GatewayTransport::default(),
            host: default_host(),
            port: default_port(),
            role_url: default_role_url(),
            role_timeout: default_role_timeout(),
        }
    }
}

impl GatewayConfig {
    /// Parsed role callback timeout.
    pub fn role_timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration("gateway.role_timeout", &self.role_timeout)
    }

    /// `host:port` bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_role_url() -> String {
    "http://127.0.0.1:8080/api/role".to_string()
}

fn default_role_timeout() -> String {
    "2s".to_string()
}
