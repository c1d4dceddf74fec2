//! # tiergate-auth
//!
//! The auth server: the only component holding the signing keys.
//!
//! | Route | Guard | Behaviour |
//! |-------|-------|-----------|
//! | `POST /api/login` | none | verify credentials, set access + delegated cookies |
//! | `POST /api/logout` | none | clear both cookies |
//! | `GET /api/role` | delegated cookie | `{role, username, isAdmin}`, public on any failure |
//! | `GET /api/session` | access cookie | current user |
//! | `POST /api/chat` | access cookie | relay to the intermediary with the delegated token as bearer |
//! | `GET /health` | none | liveness |
//!
//! Access to the system fails closed (401). Role resolution fails safe to the
//! public tier and never returns an error status; this includes the case where
//! the credential store itself cannot be reached, so "not an admin" and
//! "could not tell" are deliberately indistinguishable to callers.

pub mod bootstrap;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod relay;
pub mod role;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;

pub use credentials::{
    CredentialRecord, CredentialStore, StaticCredentialStore, StoreError, hash_password,
};
pub use error::AuthError;
pub use middleware::AuthenticatedUser;
pub use relay::{ChatRelay, HttpChatRelay, RelayError};
pub use role::resolve_role;
pub use routes::create_router;
pub use server::AuthServer;
pub use state::AppState;
