//! Token purpose tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a token may be used for. Each purpose has its own signing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// Entry to the protected chat interface.
    Access,
    /// Forwarded through the intermediary to resolve the holder's role.
    Delegated,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Access => "access",
            Purpose::Delegated => "delegated",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
