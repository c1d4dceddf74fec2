//! Token issuance and verification.

use crate::error::{TokenError, VerificationError};
use crate::keys::KeyPair;
use crate::purpose::Purpose;
use biscuit_auth::builder::AuthorizerBuilder;
use biscuit_auth::macros::fact;
use biscuit_auth::{Authorizer, Biscuit};
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

/// Issues and verifies access and delegated-capability tokens.
///
/// Holds one keypair per [`Purpose`]. The purpose passed to [`issue`](Self::issue)
/// selects the signing key, and the purpose passed to [`verify`](Self::verify)
/// selects the verification key and the expected purpose tag.
#[derive(Debug)]
pub struct TokenService {
    access_key: KeyPair,
    delegated_key: KeyPair,
    ttl: Duration,
}

/// Both tokens issued at login.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access: String,
    pub delegated: String,
    pub expires_at: DateTime<Utc>,
}

/// A token that passed signature, purpose and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// The user the token is bound to.
    pub username: String,
    /// The purpose tag, equal to the expected purpose.
    pub purpose: Purpose,
    /// Unique identifier of this token.
    pub token_id: String,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

impl TokenService {
    /// Create a token service from two distinct keypairs.
    pub fn new(
        access_key: KeyPair,
        delegated_key: KeyPair,
        ttl: std::time::Duration,
    ) -> Result<Self, TokenError> {
        if access_key.public_key_hex() == delegated_key.public_key_hex() {
            return Err(TokenError::SharedSigningKey);
        }
        let ttl = Duration::from_std(ttl).map_err(|e| TokenError::InvalidTtl(e.to_string()))?;
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidTtl("lifetime must be positive".into()));
        }

        Ok(Self {
            access_key,
            delegated_key,
            ttl,
        })
    }

    /// Create a token service with freshly generated keys.
    ///
    /// Tokens issued by an ephemeral service do not survive a restart.
    pub fn ephemeral(ttl: std::time::Duration) -> Result<Self, TokenError> {
        Self::new(KeyPair::generate()?, KeyPair::generate()?, ttl)
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn key(&self, purpose: Purpose) -> &KeyPair {
        match purpose {
            Purpose::Access => &self.access_key,
            Purpose::Delegated => &self.delegated_key,
        }
    }

    /// Issue a token for `username` with the given purpose.
    pub fn issue(&self, username: &str, purpose: Purpose) -> Result<String, TokenError> {
        self.issue_at(username, purpose, Utc::now())
    }

    /// Issue a token as of `now`.
    pub fn issue_at(
        &self,
        username: &str,
        purpose: Purpose,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.mint(self.key(purpose), username, purpose, now)
    }

    /// Issue the access and delegated tokens for one login.
    pub fn issue_pair(&self, username: &str) -> Result<IssuedTokens, TokenError> {
        let now = Utc::now();
        Ok(IssuedTokens {
            access: self.issue_at(username, Purpose::Access, now)?,
            delegated: self.issue_at(username, Purpose::Delegated, now)?,
            expires_at: now + self.ttl,
        })
    }

    fn mint(
        &self,
        key: &KeyPair,
        username: &str,
        purpose: Purpose,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let issued_at = now.timestamp();
        let expires_at = (now + self.ttl).timestamp();
        let token_id = Uuid::new_v4().to_string();

        let tag = purpose.as_str().to_string();
        let biscuit = Biscuit::builder()
            .fact(fact!("user({user})", user = username.to_string()))
            .and_then(|b| b.fact(fact!("purpose({tag})", tag = tag)))
            .and_then(|b| b.fact(fact!("issued_at({issued_at})", issued_at = issued_at)))
            .and_then(|b| b.fact(fact!("expires_at({expires_at})", expires_at = expires_at)))
            .and_then(|b| b.fact(fact!("token_id({id})", id = token_id.clone())))
            .map_err(|e| TokenError::TokenCreationFailed(e.to_string()))?
            .build(key.inner())
            .map_err(|e| TokenError::TokenCreationFailed(e.to_string()))?;

        tracing::debug!(user = %username, %purpose, %token_id, expires_at, "Issued token");

        biscuit
            .to_base64()
            .map_err(|e| TokenError::SerializationError(e.to_string()))
    }

    /// Verify a token against the expected purpose.
    pub fn verify(
        &self,
        token: &str,
        expected: Purpose,
    ) -> Result<VerifiedToken, VerificationError> {
        self.verify_at(token, expected, Utc::now())
    }

    /// Verify a token as of `now`.
    ///
    /// Signature, purpose tag and expiry are each checked; any failure rejects.
    pub fn verify_at(
        &self,
        token: &str,
        expected: Purpose,
        now: DateTime<Utc>,
    ) -> Result<VerifiedToken, VerificationError> {
        let biscuit = Biscuit::from_base64(token.trim(), self.key(expected).public_key())
            .map_err(|e| {
                tracing::debug!(error = %e, %expected, "Token failed signature verification");
                VerificationError::InvalidSignature
            })?;

        let mut authorizer = AuthorizerBuilder::new()
            .build(&biscuit)
            .map_err(|e| {
                tracing::debug!(error = %e, "Failed to build authorizer");
                VerificationError::InvalidSignature
            })?;

        let username = query_string(&mut authorizer, "user")?;
        let found = query_string(&mut authorizer, "purpose")?;
        let token_id = query_string(&mut authorizer, "token_id")?;
        let issued_at = query_timestamp(&mut authorizer, "issued_at")?;
        let expires_at = query_timestamp(&mut authorizer, "expires_at")?;

        if found != expected.as_str() {
            return Err(VerificationError::PurposeMismatch { expected, found });
        }

        if now > expires_at {
            return Err(VerificationError::Expired {
                expired_at: expires_at.to_rfc3339(),
            });
        }

        Ok(VerifiedToken {
            username,
            purpose: expected,
            token_id,
            issued_at,
            expires_at,
        })
    }
}

fn query_string(authorizer: &mut Authorizer, name: &str) -> Result<String, VerificationError> {
    let rule = format!("data($x) <- {}($x)", name);
    let results: Vec<(String,)> = authorizer.query(rule.as_str()).map_err(|_| missing(name))?;
    results.into_iter().next().map(|(s,)| s).ok_or_else(|| missing(name))
}

fn query_timestamp(
    authorizer: &mut Authorizer,
    name: &str,
) -> Result<DateTime<Utc>, VerificationError> {
    let rule = format!("data($x) <- {}($x)", name);
    let results: Vec<(i64,)> = authorizer.query(rule.as_str()).map_err(|_| missing(name))?;
    results
        .into_iter()
        .next()
        .and_then(|(ts,)| Utc.timestamp_opt(ts, 0).single())
        .ok_or_else(|| missing(name))
}

fn missing(claim: &str) -> VerificationError {
    VerificationError::MissingClaim {
        claim: claim.to_string(),
    }
}
