// TokenVault: Crypto error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Keypair generation failed: {0}")]
    KeyGeneration(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    /// Every verification failure collapses into this one variant so callers
    /// cannot tell a bad signature from a malformed claims body.
    #[error("Signed claims could not be verified")]
    Verification,

    #[error("Key derivation error: {0}")]
    Derivation(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Authentication failed: wrong key or tampered ciphertext")]
    AuthenticationFailure,
}
