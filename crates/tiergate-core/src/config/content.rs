//! Content fixtures served by the gateway.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Paths of the two content tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Served when the resolved role is admin.
    #[serde(default = "default_admin_path")]
    pub admin_path: PathBuf,

    /// Served otherwise.
    #[serde(default = "default_public_path")]
    pub public_path: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            admin_path: default_admin_path(),
            public_path: default_public_path(),
        }
    }
}

fn default_admin_path() -> PathBuf {
    PathBuf::from("content/secret.md")
}

fn default_public_path() -> PathBuf {
    PathBuf::from("content/public.md")
}
