//! Gateway command for starting the MCP resource gateway.
//!
//! `tiergate gateway` - HTTP transport, bearer token per request.
//! `tiergate gateway --stdio` - stdio transport, bearer from `TIERGATE_BEARER`.

use super::load_config;
use anyhow::Context;
use std::path::Path;
use tiergate_core::GatewayTransport;
use tiergate_mcp::{HttpServer, McpServer, RequestContext};

/// Environment variable holding the delegated token in stdio mode.
pub const BEARER_ENV: &str = "TIERGATE_BEARER";

pub async fn run(config_path: &Path, stdio: bool, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.gateway.port = port;
    }

    let transport = if stdio {
        GatewayTransport::Stdio
    } else {
        config.gateway.transport
    };

    let server = McpServer::from_config(&config).context("Failed to build resource gateway")?;

    match transport {
        GatewayTransport::Stdio => {
            let ctx = stdio_context(std::env::var(BEARER_ENV).ok());
            if ctx.bearer().is_none() {
                tracing::warn!("{} not set; every call will be served the public tier", BEARER_ENV);
            }
            server.run_stdio(ctx).await?;
        }
        GatewayTransport::Http => {
            HttpServer::new(config.gateway.bind_addr(), server).run().await?;
        }
    }

    Ok(())
}

fn stdio_context(bearer: Option<String>) -> RequestContext {
    bearer
        .map(RequestContext::with_bearer)
        .unwrap_or_else(RequestContext::anonymous)
}
