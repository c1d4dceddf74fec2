//! Serve command for starting the auth server.
//!
//! `tiergate serve` - Start the login, role and chat endpoints.

use super::load_config;
use std::path::Path;
use tiergate_auth::AuthServer;
use tiergate_auth::bootstrap::build_state;

pub async fn run(config_path: &Path, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    let state = build_state(&config)?;
    AuthServer::new(config.server, state).run().await?;
    Ok(())
}
