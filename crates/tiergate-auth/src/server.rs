//! Auth server implementation.

use crate::error::AuthError;
use crate::routes;
use crate::state::AppState;
use tiergate_core::ServerConfig;
use tokio::net::TcpListener;

/// The auth server.
pub struct AuthServer {
    config: ServerConfig,
    state: AppState,
}

impl AuthServer {
    /// Create a new auth server with the given configuration.
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Start the auth server and serve until ctrl-c.
    pub async fn run(self) -> Result<(), AuthError> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AuthError::StartupFailed(format!("{}: {}", addr, e)))?;

        tracing::info!(address = %addr, "Starting Tiergate auth server");
        self.serve(listener).await
    }

    /// Serve on an already-bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), AuthError> {
        let app = routes::create_router(self.state);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AuthError::StartupFailed(e.to_string()))?;

        tracing::info!("Auth server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
