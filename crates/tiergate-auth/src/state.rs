//! Auth server application state.

use crate::credentials::CredentialStore;
use crate::relay::ChatRelay;
use std::sync::Arc;
use tiergate_token::TokenService;

/// Shared application state for the auth server.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Clone)]
struct AppStateInner {
    /// Issues and verifies both token purposes.
    tokens: Arc<TokenService>,
    /// Provisioned users.
    credentials: Arc<dyn CredentialStore>,
    /// Intermediary for `/api/chat`, if configured.
    relay: Option<Arc<dyn ChatRelay>>,
    /// Mark session cookies `Secure`.
    secure_cookies: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(tokens: TokenService, credentials: impl CredentialStore + 'static) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                tokens: Arc::new(tokens),
                credentials: Arc::new(credentials),
                relay: None,
                secure_cookies: false,
            }),
        }
    }

    /// Create state with a chat relay.
    pub fn with_relay(self, relay: Arc<dyn ChatRelay>) -> Self {
        self.map_inner(|inner| AppStateInner {
            relay: Some(relay),
            ..inner
        })
    }

    /// Create state that marks cookies `Secure`.
    pub fn with_secure_cookies(self, secure: bool) -> Self {
        self.map_inner(|inner| AppStateInner {
            secure_cookies: secure,
            ..inner
        })
    }

    fn map_inner(self, f: impl FnOnce(AppStateInner) -> AppStateInner) -> Self {
        let inner = Arc::try_unwrap(self.inner).unwrap_or_else(|arc| (*arc).clone());
        Self {
            inner: Arc::new(f(inner)),
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    pub fn credentials(&self) -> &dyn CredentialStore {
        self.inner.credentials.as_ref()
    }

    pub fn relay(&self) -> Option<&Arc<dyn ChatRelay>> {
        self.inner.relay.as_ref()
    }

    pub fn secure_cookies(&self) -> bool {
        self.inner.secure_cookies
    }
}
