// TokenVault: CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: init, add, remove, validate, list, encrypted, generate-key.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_VAULT_PATH;

pub use commands::{execute, execute_with};

/// TokenVault: issue and validate identifier-bound tokens.
#[derive(Parser, Debug)]
#[command(name = "tokenvault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the vault lives and how to unlock it.
#[derive(Args, Debug, Clone)]
pub struct VaultArgs {
    /// Path to the vault file.
    #[arg(default_value = DEFAULT_VAULT_PATH)]
    pub path: PathBuf,

    /// Vault password. Falls back to TOKENVAULT_PASSWORD, then to no password.
    #[arg(short, long)]
    pub password: Option<String>,
}

impl VaultArgs {
    pub fn password_bytes(&self) -> Option<&[u8]> {
        self.password.as_deref().map(str::as_bytes)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty vault file.
    Init {
        #[command(flatten)]
        vault: VaultArgs,

        /// Write the vault unencrypted, ignoring TOKENVAULT_PASSWORD.
        #[arg(long, conflicts_with = "password")]
        no_password: bool,

        /// Print the password even when it was supplied rather than generated.
        #[arg(long)]
        echo_password: bool,
    },

    /// Issue a token for KEY and print it.
    Add {
        /// Identifier the token is bound to (e.g. a user id or email).
        key: String,

        #[command(flatten)]
        vault: VaultArgs,

        /// Metadata as a JSON object, returned on successful validation.
        #[arg(short, long)]
        metadata: Option<String>,
    },

    /// Remove KEY, invalidating every token issued for it.
    Remove {
        key: String,

        #[command(flatten)]
        vault: VaultArgs,
    },

    /// Validate a token and print its metadata.
    Validate {
        token: String,

        #[command(flatten)]
        vault: VaultArgs,
    },

    /// List identifiers in the vault.
    List {
        #[command(flatten)]
        vault: VaultArgs,
    },

    /// Report whether the vault file is encrypted.
    Encrypted {
        /// Path to the vault file.
        #[arg(default_value = DEFAULT_VAULT_PATH)]
        path: PathBuf,
    },

    /// Print a freshly generated vault password.
    GenerateKey,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_defaults_path_and_password() {
        let cli = Cli::try_parse_from(["tokenvault", "add", "a@x.com"]).unwrap();
        match cli.command {
            Commands::Add { key, vault, metadata } => {
                assert_eq!(key, "a@x.com");
                assert_eq!(vault.path, PathBuf::from("vault.db"));
                assert!(vault.password.is_none());
                assert!(metadata.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_add_with_all_options() {
        let cli = Cli::try_parse_from([
            "tokenvault",
            "add",
            "a@x.com",
            "my.db",
            "-p",
            "secret",
            "-m",
            r#"{"role":"admin"}"#,
        ])
        .unwrap();

        match cli.command {
            Commands::Add { vault, metadata, .. } => {
                assert_eq!(vault.path, PathBuf::from("my.db"));
                assert_eq!(vault.password_bytes(), Some(b"secret".as_slice()));
                assert_eq!(metadata.as_deref(), Some(r#"{"role":"admin"}"#));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_init_no_password_conflicts_with_password() {
        let result =
            Cli::try_parse_from(["tokenvault", "init", "--no-password", "-p", "secret"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_key_subcommand_name() {
        let cli = Cli::try_parse_from(["tokenvault", "generate-key"]).unwrap();
        assert!(matches!(cli.command, Commands::GenerateKey));
    }
}
