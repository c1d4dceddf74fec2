//! Access-token guard for protected routes.

use crate::error::AuthError;
use crate::session::extract_cookie;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{DateTime, Utc};
use tiergate_core::ACCESS_COOKIE_NAME;
use tiergate_token::Purpose;

/// The user behind a verified access token, inserted as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Reject the request with 401 unless it carries a valid access token.
///
/// A delegated token in the access slot fails the purpose check.
pub async fn require_access(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token =
        extract_cookie(req.headers(), ACCESS_COOKIE_NAME).ok_or(AuthError::AuthenticationRequired)?;

    let verified = state
        .tokens()
        .verify(&token, Purpose::Access)
        .map_err(|e| {
            tracing::info!(error = %e, path = %req.uri().path(), "Access token rejected");
            AuthError::AuthenticationRequired
        })?;

    req.extensions_mut().insert(AuthenticatedUser {
        username: verified.username,
        token_id: verified.token_id,
        expires_at: verified.expires_at,
    });

    Ok(next.run(req).await)
}
