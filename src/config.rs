// TokenVault: Configuration constants

/// Environment variable consulted for a default vault password.
pub const PASSWORD_ENV_VAR: &str = "TOKENVAULT_PASSWORD";

/// Vault file used by the CLI when no path is given.
pub const DEFAULT_VAULT_PATH: &str = "vault.db";

/// Log filter applied when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "tokenvault=info";
