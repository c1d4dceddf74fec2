//! The two content tiers.

use crate::error::ResourceReadError;
use std::path::{Path, PathBuf};
use tiergate_core::{ContentConfig, RoleDecision};

/// Reads the admin or public content file for a role decision.
///
/// Files are read on every call, so edits are picked up without a restart.
#[derive(Debug, Clone)]
pub struct ContentStore {
    admin_path: PathBuf,
    public_path: PathBuf,
}

impl ContentStore {
    pub fn new(admin_path: impl Into<PathBuf>, public_path: impl Into<PathBuf>) -> Self {
        Self {
            admin_path: admin_path.into(),
            public_path: public_path.into(),
        }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new(config.admin_path.clone(), config.public_path.clone())
    }

    /// Path served for `decision`. Only an admin decision selects the admin file.
    pub fn path_for(&self, decision: &RoleDecision) -> &Path {
        if decision.is_admin() {
            &self.admin_path
        } else {
            &self.public_path
        }
    }

    /// Full text of the file for `decision`.
    pub async fn read(&self, decision: &RoleDecision) -> Result<String, ResourceReadError> {
        let path = self.path_for(decision);
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ResourceReadError {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Log a warning for each configured file that is missing.
    pub fn check(&self) {
        for path in [&self.admin_path, &self.public_path] {
            if !path.is_file() {
                tracing::warn!(path = %path.display(), "Content file not found");
            }
        }
    }
}
