//! Roles and role decisions.
//!
//! A [`RoleDecision`] is computed per request from a delegated-capability token
//! and never persisted. `Admin` and `Public` are distinct variants so an
//! undetermined role can only ever be expressed as `Public`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a provisioned user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May read the secret content tier.
    Admin,
    /// Least-privileged tier.
    #[default]
    Public,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Public => "public",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of role resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleDecision {
    /// The token verified and belongs to an admin user.
    Admin { username: String },
    /// Public tier. `username` is `None` when the role could not be determined.
    Public { username: Option<String> },
}

impl RoleDecision {
    /// The fail-safe default.
    pub fn public() -> Self {
        RoleDecision::Public { username: None }
    }

    /// Decision for a user whose record was found.
    pub fn for_user(username: impl Into<String>, role: Role) -> Self {
        let username = username.into();
        match role {
            Role::Admin => RoleDecision::Admin { username },
            Role::Public => RoleDecision::Public {
                username: Some(username),
            },
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RoleDecision::Admin { .. } => Role::Admin,
            RoleDecision::Public { .. } => Role::Public,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, RoleDecision::Admin { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            RoleDecision::Admin { username } => Some(username),
            RoleDecision::Public { username } => username.as_deref(),
        }
    }

    /// Wire form returned by the role endpoint.
    pub fn to_response(&self) -> RoleResponse {
        RoleResponse {
            role: self.role(),
            username: self.username().map(str::to_string),
            is_admin: self.is_admin(),
        }
    }
}

/// JSON body of the role endpoint: `{role, username, isAdmin}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResponse {
    pub role: Role,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

impl From<RoleResponse> for RoleDecision {
    /// Admin only when `role` and `isAdmin` agree.
    fn from(response: RoleResponse) -> Self {
        match (response.role, response.is_admin, response.username) {
            (Role::Admin, true, Some(username)) => RoleDecision::Admin { username },
            (_, _, username) => RoleDecision::Public { username },
        }
    }
}
