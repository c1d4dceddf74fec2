//! Error types for the token crate.

use crate::purpose::Purpose;
use thiserror::Error;

/// Errors that can occur while managing keys or issuing tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Failed to generate keypair.
    #[error("failed to generate keypair: {0}")]
    KeyGenerationFailed(String),

    /// Failed to parse private key.
    #[error("failed to parse private key: {0}")]
    InvalidPrivateKey(String),

    /// Access and delegated tokens would be signed with the same key.
    #[error("access and delegated tokens must use distinct signing keys")]
    SharedSigningKey,

    /// Token lifetime cannot be represented.
    #[error("invalid token lifetime: {0}")]
    InvalidTtl(String),

    /// Failed to create token.
    #[error("failed to create token: {0}")]
    TokenCreationFailed(String),

    /// Failed to serialize token.
    #[error("token serialization error: {0}")]
    SerializationError(String),

    /// IO error (reading/writing keys).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Reasons a presented token is rejected.
///
/// Every variant is a rejection; callers decide whether to fail closed
/// (protected resources) or fall back to the public tier (role resolution).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Signature does not match the key for the expected purpose, or the
    /// token could not be decoded at all.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token is past its expiry timestamp.
    #[error("token has expired at {expired_at}")]
    Expired { expired_at: String },

    /// Token is validly signed but carries a different purpose tag.
    #[error("token purpose mismatch: expected {expected}, found {found}")]
    PurposeMismatch { expected: Purpose, found: String },

    /// Token is missing a required claim.
    #[error("token missing required claim: {claim}")]
    MissingClaim { claim: String },
}
