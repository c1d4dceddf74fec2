//! Configuration types for Tiergate.
//!
//! Everything is loaded from a single YAML file (`tiergate.yaml` by default).
//! Relative paths inside the file are resolved against the file's directory by
//! [`TiergateConfig::load_with_context`].
//!
//! ```yaml
//! server:
//!   port: 8080
//!   secure_cookies: true
//! tokens:
//!   access_private_key_env: TIERGATE_ACCESS_KEY
//!   delegated_private_key_env: TIERGATE_DELEGATED_KEY
//!   ttl: 24h
//! users:
//!   - username: alice
//!     password_hash: "$argon2id$v=19$..."
//!     role: admin
//! gateway:
//!   role_url: http://127.0.0.1:8080/api/role
//! content:
//!   admin_path: content/secret.md
//!   public_path: content/public.md
//! ```

pub mod content;
pub mod gateway;
pub mod relay;
pub mod server;
pub mod tokens;
pub mod users;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use content::ContentConfig;
pub use gateway::{GatewayConfig, GatewayTransport};
pub use relay::RelayConfig;
pub use server::ServerConfig;
pub use tokens::TokenConfig;
pub use users::UserEntry;

/// Complete Tiergate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TiergateConfig {
    /// Auth server settings (login, role, chat).
    #[serde(default)]
    pub server: ServerConfig,

    /// Signing keys and token lifetime.
    #[serde(default)]
    pub tokens: TokenConfig,

    /// Preloaded credential set.
    #[serde(default)]
    pub users: Vec<UserEntry>,

    /// Downstream chat intermediary. Chat is disabled when absent.
    #[serde(default)]
    pub relay: Option<RelayConfig>,

    /// MCP resource gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Content fixtures served by the gateway.
    #[serde(default)]
    pub content: ContentConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid duration for {field}: {source}")]
    Duration {
        field: &'static str,
        #[source]
        source: humantime::DurationError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TiergateConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration and resolve relative paths against the file's directory.
    pub fn load_with_context(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        config.content.admin_path = resolve_path(&base_dir, &config.content.admin_path);
        config.content.public_path = resolve_path(&base_dir, &config.content.public_path);
        if let Some(file) = &config.tokens.access_private_key_file {
            config.tokens.access_private_key_file = Some(resolve_path(&base_dir, file));
        }
        if let Some(file) = &config.tokens.delegated_private_key_file {
            config.tokens.delegated_private_key_file = Some(resolve_path(&base_dir, file));
        }

        Ok(config)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for user in &self.users {
            if user.username.trim().is_empty() {
                return Err(ConfigError::Config("user with empty username".into()));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::Config(format!(
                    "duplicate user: {}",
                    user.username
                )));
            }
        }

        self.tokens.ttl()?;
        if self.gateway.role_timeout()?.is_zero() {
            return Err(ConfigError::Config(
                "gateway.role_timeout must be greater than zero".into(),
            ));
        }
        if let Some(relay) = &self.relay {
            relay.timeout()?;
        }

        Ok(())
    }
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

pub(crate) fn parse_duration(field: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(raw).map_err(|source| ConfigError::Duration { field, source })
}
