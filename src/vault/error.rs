// TokenVault: Vault error types

use std::path::PathBuf;

use thiserror::Error;

use crate::crypto::CryptoError;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Vault file is corrupt: {0}")]
    CorruptFormat(String),

    #[error(
        "Vault is encrypted: provide a password or set `{}`",
        crate::config::PASSWORD_ENV_VAR
    )]
    PasswordRequired,

    #[error("Password is incorrect: the vault could not be decrypted with it")]
    IncorrectPassword,

    #[error("Vault file unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
