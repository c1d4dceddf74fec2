//! # tiergate-core
//!
//! Types shared by every Tiergate crate:
//!
//! - [`config`]: the `tiergate.yaml` configuration model
//! - [`role`]: roles and the per-request [`RoleDecision`]

// Configuration types shared across all Tiergate crates
pub mod config;
pub mod role;

pub use config::{
    ConfigError, ContentConfig, GatewayConfig, GatewayTransport, RelayConfig, ServerConfig,
    TiergateConfig, TokenConfig, UserEntry,
};
pub use role::{Role, RoleDecision, RoleResponse};

/// Cookie carrying the access token.
pub const ACCESS_COOKIE_NAME: &str = "tiergate_access";

/// Cookie carrying the delegated-capability token.
pub const DELEGATED_COOKIE_NAME: &str = "tiergate_delegated";
