// TokenVault: Top-level error types
//
// Aggregates vault errors (which carry crypto failures) and CLI input
// errors into a single error enum for the application boundary.

use thiserror::Error;

/// Top-level error type for all TokenVault operations.
#[derive(Debug, Error)]
pub enum TokenVaultError {
    #[error(transparent)]
    Vault(#[from] crate::vault::VaultError),

    #[error("Metadata must be a valid JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TokenVaultError>;
