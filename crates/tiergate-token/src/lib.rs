//! # tiergate-token
//!
//! Issuance and verification of the two Tiergate session tokens.
//!
//! ## Two-Key Token Model
//!
//! | Token | Purpose tag | Signed with | Verified by |
//! |-------|-------------|-------------|-------------|
//! | **Access** | `access` | access key | protected-resource endpoint |
//! | **Delegated** | `delegated` | delegated key | role resolution endpoint |
//!
//! Both are Biscuit tokens (Ed25519) whose authority block carries
//! `user`, `purpose`, `issued_at`, `expires_at` and `token_id` facts. The two
//! keys must differ: [`TokenService::new`] refuses a shared key, and
//! [`TokenService::verify`] checks the purpose tag as well as the signature, so
//! a token minted for one purpose never verifies for the other.

pub mod error;
pub mod keys;
pub mod purpose;
pub mod token;

pub use error::{TokenError, VerificationError};
pub use keys::KeyPair;
pub use purpose::Purpose;
pub use token::{IssuedTokens, TokenService, VerifiedToken};
