//! Keypair management for token signing.

use crate::error::TokenError;
use biscuit_auth::{Algorithm, KeyPair as BiscuitKeyPair, PrivateKey, PublicKey};
use rand::RngCore;
use std::fmt;
use std::path::Path;

/// An Ed25519 keypair for signing and verifying one kind of token.
pub struct KeyPair {
    inner: BiscuitKeyPair,
}

impl KeyPair {
    /// Generate a new random keypair.
    pub fn generate() -> Result<Self, TokenError> {
        let mut rng = rand::rng();
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);

        let private_key = PrivateKey::from_bytes(&bytes, Algorithm::Ed25519)
            .map_err(|e| TokenError::KeyGenerationFailed(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    /// Create a keypair from an existing private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let inner = BiscuitKeyPair::from(&private_key);
        Self { inner }
    }

    /// Load a keypair from a hex-encoded private key string.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, TokenError> {
        let private_key = PrivateKey::from_bytes_hex(hex.trim(), Algorithm::Ed25519)
            .map_err(|e| TokenError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    /// Load a keypair from a private key file.
    pub fn load_from_file(private_key_path: &Path) -> Result<Self, TokenError> {
        let hex = std::fs::read_to_string(private_key_path)?;
        Self::from_private_key_hex(&hex)
    }

    /// Save the private key to a file.
    pub fn save_to_file(&self, private_key_path: &Path) -> Result<(), TokenError> {
        std::fs::write(private_key_path, self.private_key_hex())?;
        Ok(())
    }

    /// Get the inner biscuit keypair.
    pub fn inner(&self) -> &BiscuitKeyPair {
        &self.inner
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        self.inner.public()
    }

    /// Get the private key as hex string.
    pub fn private_key_hex(&self) -> String {
        self.inner.private().to_bytes_hex()
    }

    /// Get the public key as hex string.
    pub fn public_key_hex(&self) -> String {
        self.inner.public().to_bytes_hex()
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}
