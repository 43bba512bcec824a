// TokenVault: Vault Module
//
// The credential store and its at-rest persistence. Tokens are issued and
// validated against per-identifier public keys held in memory; the mapping
// is saved to and loaded from a single file, optionally encrypted.

mod error;
mod models;
mod password;
mod persistence;
mod store;

pub use error::VaultError;
pub use models::{metadata_from_value, Metadata, FRESHNESS_FIELD, TOKEN_DELIMITER};
pub use password::{resolve_password, EnvPasswordSource, NoPasswordSource, PasswordSource};
pub use persistence::{deserialize, is_encrypted, serialize, Persistence};
pub use store::{SharedVault, TokenVault};

#[cfg(test)]
pub(crate) use password::mock;
