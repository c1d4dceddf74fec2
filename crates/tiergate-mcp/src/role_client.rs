//! Role callback to the auth server.
//!
//! The gateway holds no signing keys. It learns the caller's role by
//! replaying the bearer token to the role endpoint as the delegated cookie.

use crate::error::{McpError, RoleLookupError};
use async_trait::async_trait;
use std::time::Duration;
use tiergate_core::{DELEGATED_COOKIE_NAME, GatewayConfig, RoleDecision, RoleResponse};

/// Asks the role endpoint what a delegated token is worth.
#[async_trait]
pub trait RoleLookup: Send + Sync {
    async fn lookup(&self, bearer: &str) -> Result<RoleResponse, RoleLookupError>;
}

/// Resolve the role for an optional bearer token.
///
/// No token means public with no network call. Every lookup error is public.
pub async fn resolve(lookup: &dyn RoleLookup, bearer: Option<&str>) -> RoleDecision {
    let Some(bearer) = bearer else {
        tracing::debug!("No bearer token; serving public tier");
        return RoleDecision::public();
    };

    match lookup.lookup(bearer).await {
        Ok(response) => RoleDecision::from(response),
        Err(e) => {
            tracing::warn!(error = %e, "Role lookup failed; serving public tier");
            RoleDecision::public()
        }
    }
}

/// [`RoleLookup`] over HTTP: `GET role_url` with the token as a cookie.
#[derive(Debug, Clone)]
pub struct HttpRoleLookup {
    client: reqwest::Client,
    role_url: String,
}

impl HttpRoleLookup {
    /// Create a lookup with its own client bounded by `timeout`.
    pub fn new(role_url: impl Into<String>, timeout: Duration) -> Result<Self, McpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| McpError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, role_url))
    }

    /// Build from the gateway section of the configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, McpError> {
        let timeout = config
            .role_timeout()
            .map_err(|e| McpError::Config(e.to_string()))?;
        Self::new(config.role_url.clone(), timeout)
    }

    /// Create with a custom HTTP client (useful for testing).
    pub fn with_client(client: reqwest::Client, role_url: impl Into<String>) -> Self {
        Self {
            client,
            role_url: role_url.into(),
        }
    }

    pub fn role_url(&self) -> &str {
        &self.role_url
    }
}

#[async_trait]
impl RoleLookup for HttpRoleLookup {
    async fn lookup(&self, bearer: &str) -> Result<RoleResponse, RoleLookupError> {
        let response = self
            .client
            .get(&self.role_url)
            .header(
                reqwest::header::COOKIE,
                format!("{}={}", DELEGATED_COOKIE_NAME, bearer),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoleLookupError::Status {
                status: status.as_u16(),
            });
        }

        let role: RoleResponse = response
            .json()
            .await
            .map_err(|e| RoleLookupError::Decode(e.to_string()))?;
        tracing::debug!(role = %role.role, username = ?role.username, "Role endpoint answered");
        Ok(role)
    }
}
