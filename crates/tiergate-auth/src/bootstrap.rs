//! Startup wiring: keys, credential set and relay from configuration.

use crate::credentials::StaticCredentialStore;
use crate::relay::HttpChatRelay;
use crate::state::AppState;
use anyhow::Context;
use std::sync::Arc;
use tiergate_core::{TiergateConfig, TokenConfig};
use tiergate_token::{KeyPair, TokenService};

/// Build the token service from the configured key material.
///
/// Both keys configured: use them. Neither configured: generate an ephemeral
/// pair, which invalidates every session on restart. Only one configured is
/// an error.
pub fn build_token_service(config: &TokenConfig) -> anyhow::Result<TokenService> {
    let ttl = config.ttl()?;
    let access = config
        .resolve_access_private_key()
        .context("failed to read access-token private key")?;
    let delegated = config
        .resolve_delegated_private_key()
        .context("failed to read delegated-token private key")?;

    let service = match (access, delegated) {
        (Some(access), Some(delegated)) => TokenService::new(
            KeyPair::from_private_key_hex(&access).context("invalid access-token private key")?,
            KeyPair::from_private_key_hex(&delegated)
                .context("invalid delegated-token private key")?,
            ttl,
        )?,
        (None, None) => {
            tracing::warn!(
                "No signing keys configured; generated ephemeral keys (sessions will not survive a restart)"
            );
            TokenService::ephemeral(ttl)?
        }
        (Some(_), None) => anyhow::bail!("access-token key configured without a delegated-token key"),
        (None, Some(_)) => anyhow::bail!("delegated-token key configured without an access-token key"),
    };

    Ok(service)
}

/// Build the auth server state from the full configuration.
pub fn build_state(config: &TiergateConfig) -> anyhow::Result<AppState> {
    let tokens = build_token_service(&config.tokens)?;

    let credentials = StaticCredentialStore::from_entries(&config.users);
    if credentials.is_empty() {
        tracing::warn!("No users configured; every login will fail");
    } else {
        tracing::info!(users = credentials.len(), "Loaded credential set");
    }

    let mut state =
        AppState::new(tokens, credentials).with_secure_cookies(config.server.secure_cookies);

    match &config.relay {
        Some(relay) => {
            let relay = HttpChatRelay::from_config(relay).context("failed to build chat relay")?;
            state = state.with_relay(Arc::new(relay));
        }
        None => tracing::info!("No chat relay configured; /api/chat will return 503"),
    }

    Ok(state)
}
