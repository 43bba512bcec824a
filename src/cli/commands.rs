// TokenVault: CLI Command Handlers
//
// Each function handles one CLI subcommand by loading the vault, calling a
// single store or persistence operation, and saving when something changed.
// Password resolution, validation and file handling all live in `vault`.

use std::path::Path;

use serde_json::Value;

use crate::crypto::cipher::generate_key;
use crate::error::TokenVaultError;
use crate::vault::{
    is_encrypted, metadata_from_value, resolve_password, NoPasswordSource, PasswordSource,
    Persistence, TokenVault,
};

use super::{Commands, VaultArgs};

/// Execute the parsed CLI command, taking default passwords from
/// `TOKENVAULT_PASSWORD`.
pub fn execute(command: Commands) -> Result<(), TokenVaultError> {
    execute_with(command, &Persistence::from_env())
}

/// Execute the parsed CLI command against an explicit password source.
pub fn execute_with<S: PasswordSource>(
    command: Commands,
    persistence: &Persistence<S>,
) -> Result<(), TokenVaultError> {
    match command {
        Commands::Init {
            vault,
            no_password,
            echo_password,
        } => cmd_init(persistence, vault, no_password, echo_password),
        Commands::Add {
            key,
            vault,
            metadata,
        } => cmd_add(persistence, key, vault, metadata),
        Commands::Remove { key, vault } => cmd_remove(persistence, key, vault),
        Commands::Validate { token, vault } => cmd_validate(persistence, token, vault),
        Commands::List { vault } => cmd_list(persistence, vault),
        Commands::Encrypted { path } => cmd_encrypted(&path),
        Commands::GenerateKey => cmd_generate_key(),
    }
}

// ─── Init ────────────────────────────────────────────────────────────────────

fn cmd_init<S: PasswordSource>(
    persistence: &Persistence<S>,
    args: VaultArgs,
    no_password: bool,
    echo_password: bool,
) -> Result<(), TokenVaultError> {
    let vault = TokenVault::new();

    if no_password {
        Persistence::with_source(NoPasswordSource).save(&vault, &args.path, None)?;
        println!("Vault created at {} and not encrypted", args.path.display());
        return Ok(());
    }

    let password = match resolve_password(args.password_bytes(), persistence.source()) {
        Some(password) => {
            if echo_password {
                println!("password: {}", String::from_utf8_lossy(&password));
            }
            password
        }
        None => {
            let password = generate_key();
            println!("Generated password: {}", String::from_utf8_lossy(&password));
            println!("Keep it safe: set TOKENVAULT_PASSWORD or pass it with -p");
            password
        }
    };

    persistence.save(&vault, &args.path, Some(password.as_slice()))?;
    println!(
        "Vault created at {} and encrypted with password",
        args.path.display()
    );

    Ok(())
}

// ─── Add / Remove ────────────────────────────────────────────────────────────

fn cmd_add<S: PasswordSource>(
    persistence: &Persistence<S>,
    key: String,
    args: VaultArgs,
    metadata: Option<String>,
) -> Result<(), TokenVaultError> {
    let metadata = match metadata {
        Some(raw) => Some(metadata_from_value(serde_json::from_str::<Value>(&raw)?)?),
        None => None,
    };

    let mut vault = persistence.load(&args.path, args.password_bytes())?;
    let token = vault.issue(&key, metadata.as_ref())?;
    persistence.save(&vault, &args.path, args.password_bytes())?;

    println!("token: {}", token);
    Ok(())
}

fn cmd_remove<S: PasswordSource>(
    persistence: &Persistence<S>,
    key: String,
    args: VaultArgs,
) -> Result<(), TokenVaultError> {
    let mut vault = persistence.load(&args.path, args.password_bytes())?;

    if vault.remove(&key) {
        persistence.save(&vault, &args.path, args.password_bytes())?;
        println!("Removed key '{}' from vault", key);
    } else {
        println!("Key '{}' not found in vault", key);
    }

    Ok(())
}

// ─── Read-only commands ──────────────────────────────────────────────────────

fn cmd_validate<S: PasswordSource>(
    persistence: &Persistence<S>,
    token: String,
    args: VaultArgs,
) -> Result<(), TokenVaultError> {
    let vault = persistence.load(&args.path, args.password_bytes())?;

    match vault.validate(&token) {
        Some(metadata) => println!("{}", Value::Object(metadata)),
        None => println!("Token is not valid"),
    }

    Ok(())
}

fn cmd_list<S: PasswordSource>(
    persistence: &Persistence<S>,
    args: VaultArgs,
) -> Result<(), TokenVaultError> {
    let vault = persistence.load(&args.path, args.password_bytes())?;

    for identifier in vault.identifiers() {
        println!("{}", identifier);
    }

    Ok(())
}

fn cmd_encrypted(path: &Path) -> Result<(), TokenVaultError> {
    if is_encrypted(path)? {
        println!("Vault is encrypted");
    } else {
        println!("Vault is not encrypted");
    }
    Ok(())
}

fn cmd_generate_key() -> Result<(), TokenVaultError> {
    println!("{}", String::from_utf8_lossy(&generate_key()));
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
