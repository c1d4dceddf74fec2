//! CLI command implementations for Tiergate.

pub mod gateway;
pub mod hash_password;
pub mod keys;
pub mod serve;

use anyhow::{Context, Result};
use std::path::Path;
use tiergate_core::TiergateConfig;

/// Load the configuration, resolving relative paths against its directory.
pub fn load_config(path: &Path) -> Result<TiergateConfig> {
    let config = TiergateConfig::load_with_context(path)
        .with_context(|| format!("Failed to load config file: {}", path.display()))?;
    tracing::info!(config = %path.display(), "Loaded configuration");
    Ok(config)
}
