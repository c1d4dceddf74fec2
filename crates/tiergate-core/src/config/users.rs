//! Preloaded credential set.

use crate::role::Role;
use serde::{Deserialize, Serialize};

/// One provisioned user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    /// Unique username.
    pub username: String,

    /// Argon2 PHC string (see `tiergate hash-password`).
    pub password_hash: String,

    /// Role granted to the user.
    #[serde(default)]
    pub role: Role,
}
