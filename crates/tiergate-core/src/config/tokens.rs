//! Token signing configuration.
//!
//! Access and delegated-capability tokens are signed with two separate keys.
//! Each key is resolved from an environment variable first, then from a file.

use super::{ConfigError, parse_duration};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the two signing keys and token lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Environment variable containing the access-token private key (hex-encoded).
    #[serde(default)]
    pub access_private_key_env: Option<String>,

    /// Path to the access-token private key file.
    #[serde(default)]
    pub access_private_key_file: Option<PathBuf>,

    /// Environment variable containing the delegated-token private key (hex-encoded).
    #[serde(default)]
    pub delegated_private_key_env: Option<String>,

    /// Path to the delegated-token private key file.
    #[serde(default)]
    pub delegated_private_key_file: Option<PathBuf>,

    /// Lifetime of both tokens (e.g., "24h").
    #[serde(default = "default_ttl")]
    pub ttl: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_private_key_env: None,
            access_private_key_file: None,
            delegated_private_key_env: None,
            delegated_private_key_file: None,
            ttl: default_ttl(),
        }
    }
}

impl TokenConfig {
    /// Parsed token lifetime.
    pub fn ttl(&self) -> Result<Duration, ConfigError> {
        parse_duration("tokens.ttl", &self.ttl)
    }

    /// Resolve the access-token private key from environment or file.
    pub fn resolve_access_private_key(&self) -> Result<Option<String>, std::io::Error> {
        resolve_key(
            self.access_private_key_env.as_deref(),
            self.access_private_key_file.as_deref(),
        )
    }

    /// Resolve the delegated-token private key from environment or file.
    pub fn resolve_delegated_private_key(&self) -> Result<Option<String>, std::io::Error> {
        resolve_key(
            self.delegated_private_key_env.as_deref(),
            self.delegated_private_key_file.as_deref(),
        )
    }
}

fn resolve_key(env_var: Option<&str>, path: Option<&Path>) -> Result<Option<String>, std::io::Error> {
    // Try environment variable first
    if let Some(env_var) = env_var {
        if let Ok(key) = std::env::var(env_var) {
            return Ok(Some(key.trim().to_string()));
        }
    }

    // A configured file must exist
    if let Some(path) = path {
        let key = std::fs::read_to_string(path)
            .map_err(|e| std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
        return Ok(Some(key.trim().to_string()));
    }

    Ok(None)
}

fn default_ttl() -> String {
    "24h".to_string()
}
