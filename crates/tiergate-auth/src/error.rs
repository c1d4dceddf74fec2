//! Error types for the auth server.

use crate::relay::RelayError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tiergate_token::TokenError;

/// Errors returned by auth server handlers.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login failed. Deliberately does not say which field was wrong.
    #[error("invalid username or password")]
    AuthenticationFailed,

    /// No valid access token on a protected route.
    #[error("authentication required")]
    AuthenticationRequired,

    /// Invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Chat was requested but no intermediary is configured.
    #[error("chat relay is not configured")]
    RelayUnavailable,

    /// The intermediary failed.
    #[error("chat relay failed: {0}")]
    Relay(#[from] RelayError),

    /// Token issuance failed.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Failed to start the server.
    #[error("failed to start auth server: {0}")]
    StartupFailed(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::AuthenticationFailed | AuthError::AuthenticationRequired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::RelayUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Relay(_) => StatusCode::BAD_GATEWAY,
            AuthError::Token(_) | AuthError::StartupFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AuthError::Relay(e) => {
                tracing::warn!(error = %e, "Chat relay failed");
                "chat relay failed".to_string()
            }
            AuthError::Token(e) => {
                tracing::error!(error = %e, "Token issuance failed");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
