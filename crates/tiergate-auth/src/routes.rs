//! Route definitions for the auth server.

use crate::handlers;
use crate::middleware::require_access;
use crate::state::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the auth server router.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/session", get(handlers::session))
        .route("/api/chat", post(handlers::chat))
        .route_layer(from_fn_with_state(state.clone(), require_access));

    Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/role", get(handlers::role))
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
