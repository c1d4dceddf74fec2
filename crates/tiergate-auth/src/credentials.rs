//! Credential store and password verification.
//!
//! The credential set is fixed at startup. [`CredentialStore`] is the seam
//! that lets tests (or a future database) stand in for the static set.

use crate::error::AuthError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Version};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tiergate_core::{Role, UserEntry};

pub use argon2::Params as HashParams;

/// Verified against when the username is unknown, so both failure paths cost
/// one Argon2 verification.
const UNKNOWN_USER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0c2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// A provisioned user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: Role,
}

/// Errors raised by a credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Lookup interface over the credential set.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by name. `Ok(None)` means no such user.
    async fn lookup(&self, username: &str) -> Result<Option<CredentialRecord>, StoreError>;
}

/// In-memory credential set loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    users: HashMap<String, CredentialRecord>,
}

impl StaticCredentialStore {
    pub fn new(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|r| (r.username.clone(), r))
            .collect();
        Self { users }
    }

    /// Build from the `users` section of the configuration.
    pub fn from_entries(entries: &[UserEntry]) -> Self {
        Self::new(entries.iter().map(|e| CredentialRecord {
            username: e.username.clone(),
            password_hash: e.password_hash.clone(),
            role: e.role,
        }))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn lookup(&self, username: &str) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self.users.get(username).cloned())
    }
}

/// Hash a password with default Argon2id parameters.
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    hash_with(&Argon2::default(), password)
}

/// Hash a password with explicit Argon2id cost parameters.
pub fn hash_password_with(password: &str, params: HashParams) -> Result<String, StoreError> {
    hash_with(&Argon2::new(Algorithm::Argon2id, Version::V0x13, params), password)
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| StoreError::Hashing(e.to_string()))
}

/// Check a password against a PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

/// Validate a username/password pair.
///
/// Unknown user, wrong password and store failure all yield the same
/// [`AuthError::AuthenticationFailed`].
pub async fn authenticate(
    store: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<CredentialRecord, AuthError> {
    let record = match store.lookup(username).await {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(error = %e, "Credential lookup failed during login");
            None
        }
    };

    match record {
        Some(record) if verify_password(password, &record.password_hash) => Ok(record),
        Some(_) => Err(AuthError::AuthenticationFailed),
        None => {
            verify_password(password, UNKNOWN_USER_HASH);
            Err(AuthError::AuthenticationFailed)
        }
    }
}
