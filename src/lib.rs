// TokenVault: Library root
//
// Issues bearer tokens bound to an identifier and validates them against
// per-identifier public keys, with an optionally encrypted vault file.

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod vault;

pub use crypto::cipher::generate_key;
pub use error::{Result, TokenVaultError};
pub use vault::{
    is_encrypted, Metadata, Persistence, PasswordSource, SharedVault, TokenVault, VaultError,
};
