//! Request handlers for the auth server.

use crate::credentials::authenticate;
use crate::error::AuthError;
use crate::middleware::AuthenticatedUser;
use crate::role::resolve_role;
use crate::session::{extract_cookie, login_cookies, logout_cookies};
use crate::state::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tiergate_core::{DELEGATED_COOKIE_NAME, Role, RoleResponse};
use tiergate_token::Purpose;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// `POST /api/login`: verify credentials and set both token cookies.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let record = authenticate(state.credentials(), &request.username, &request.password).await?;
    let issued = state.tokens().issue_pair(&record.username)?;

    tracing::info!(
        user = %record.username,
        role = %record.role,
        expires_at = %issued.expires_at,
        "Login succeeded"
    );

    let [access, delegated] = login_cookies(
        &issued,
        state.tokens().ttl().num_seconds(),
        state.secure_cookies(),
    );

    Ok((
        AppendHeaders([(header::SET_COOKIE, access), (header::SET_COOKIE, delegated)]),
        Json(LoginResponse {
            username: record.username,
            role: record.role,
        }),
    ))
}

/// `POST /api/logout`: clear both token cookies.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let [access, delegated] = logout_cookies(state.secure_cookies());
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(header::SET_COOKIE, access), (header::SET_COOKIE, delegated)]),
    )
}

/// `GET /api/role`: always 200, public on any failure.
pub async fn role(State(state): State<AppState>, headers: HeaderMap) -> Json<RoleResponse> {
    let token = extract_cookie(&headers, DELEGATED_COOKIE_NAME);
    let decision = resolve_role(state.tokens(), state.credentials(), token.as_deref()).await;
    Json(decision.to_response())
}

/// `GET /api/session`
pub async fn session(Extension(user): Extension<AuthenticatedUser>) -> Json<SessionResponse> {
    Json(SessionResponse {
        username: user.username,
    })
}

/// `POST /api/chat`: relay the message with the delegated token as bearer.
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AuthError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AuthError::InvalidRequest("message must not be empty".into()));
    }

    let relay = state.relay().ok_or(AuthError::RelayUnavailable)?;
    let delegated = extract_cookie(&headers, DELEGATED_COOKIE_NAME);
    match delegated.as_deref() {
        None => {
            tracing::warn!(user = %user.username, "Chat without delegated token; gateway will serve public content");
        }
        Some(token) => {
            // Both cookies must come from the same login
            if let Ok(verified) = state.tokens().verify(token, Purpose::Delegated) {
                if verified.username != user.username {
                    tracing::warn!(
                        user = %user.username,
                        delegated_user = %verified.username,
                        "Delegated token belongs to another user"
                    );
                    return Err(AuthError::AuthenticationRequired);
                }
            }
        }
    }

    let reply = relay.relay(message, delegated.as_deref()).await?;
    tracing::debug!(user = %user.username, "Chat relayed");

    Ok(Json(ChatResponse { reply }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
