// TokenVault: Persistence codec
//
// The vault file is either the plaintext JSON document below or that same
// document sealed by `crypto::cipher`. Nothing on disk marks which one it
// is: without a password the loader tries the plaintext parse, with one it
// tries decryption first.
//
//   {"version":1,"entries":{"<identifier>":"<base64 SPKI PEM>", ...}}

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crypto::{cipher, CryptoError};

use super::models::VerificationKey;
use super::password::{resolve_password, EnvPasswordSource, PasswordSource};
use super::{TokenVault, VaultError};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct VaultDocument {
    version: u32,
    entries: BTreeMap<String, String>,
}

// ─── Codec ───────────────────────────────────────────────────────────────────

/// Encode the vault's identifier → verification key mapping.
/// Identifiers are sorted, so equal vaults encode to equal bytes.
pub fn serialize(vault: &TokenVault) -> Result<Vec<u8>, VaultError> {
    let document = VaultDocument {
        version: FORMAT_VERSION,
        entries: vault
            .entries
            .iter()
            .map(|(identifier, key)| (identifier.clone(), BASE64.encode(key.as_bytes())))
            .collect(),
    };

    serde_json::to_vec(&document)
        .map_err(|e| VaultError::CorruptFormat(format!("vault could not be encoded: {}", e)))
}

/// Decode bytes produced by [`serialize`].
pub fn deserialize(bytes: &[u8]) -> Result<TokenVault, VaultError> {
    let document: VaultDocument =
        serde_json::from_slice(bytes).map_err(|e| VaultError::CorruptFormat(e.to_string()))?;

    if document.version != FORMAT_VERSION {
        return Err(VaultError::CorruptFormat(format!(
            "unsupported format version {}",
            document.version
        )));
    }

    let mut entries = BTreeMap::new();
    for (identifier, encoded) in document.entries {
        if identifier.is_empty() {
            return Err(VaultError::CorruptFormat("empty identifier".to_string()));
        }
        let key = BASE64.decode(encoded.as_bytes()).map_err(|e| {
            VaultError::CorruptFormat(format!(
                "verification key for `{}` is not valid base64: {}",
                identifier, e
            ))
        })?;
        entries.insert(identifier, VerificationKey::new(key));
    }

    Ok(TokenVault::from_entries(entries))
}

/// What raw file bytes look like without decrypting them.
enum Plaintext {
    Vault(TokenVault),
    /// JSON, but not a vault document.
    Malformed(VaultError),
    /// Not JSON at all; most likely ciphertext.
    Opaque,
}

fn classify(raw: &[u8]) -> Plaintext {
    if raw.is_empty() {
        return Plaintext::Malformed(VaultError::CorruptFormat("file is empty".to_string()));
    }

    match deserialize(raw) {
        Ok(vault) => Plaintext::Vault(vault),
        Err(e) if serde_json::from_slice::<Value>(raw).is_ok() => Plaintext::Malformed(e),
        Err(_) => Plaintext::Opaque,
    }
}

// ─── File Operations ─────────────────────────────────────────────────────────

/// Saves and loads vault files, resolving passwords against `source`.
#[derive(Debug, Clone, Default)]
pub struct Persistence<S = EnvPasswordSource> {
    source: S,
}

impl Persistence<EnvPasswordSource> {
    /// Default passwords come from `TOKENVAULT_PASSWORD`.
    pub fn from_env() -> Self {
        Self {
            source: EnvPasswordSource::new(),
        }
    }
}

impl<S: PasswordSource> Persistence<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Write `vault` to `path`, encrypted when a password resolves.
    pub fn save(
        &self,
        vault: &TokenVault,
        path: &Path,
        password: Option<&[u8]>,
    ) -> Result<(), VaultError> {
        let plaintext = serialize(vault)?;

        let (data, encrypted) = match resolve_password(password, &self.source) {
            Some(password) => (cipher::encrypt(&plaintext, &password)?, true),
            None => (plaintext, false),
        };

        fs::write(path, &data).map_err(|source| VaultError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            path = %path.display(),
            identifiers = vault.len(),
            encrypted,
            "Vault saved"
        );
        Ok(())
    }

    /// Read a vault from `path`.
    ///
    /// Without a password, non-JSON content is `PasswordRequired`. With one,
    /// a failed decryption is `IncorrectPassword` unless the file turns out
    /// to be a plaintext vault, which is then loaded as is.
    pub fn load(&self, path: &Path, password: Option<&[u8]>) -> Result<TokenVault, VaultError> {
        let raw = read_file(path)?;

        let vault = match resolve_password(password, &self.source) {
            Some(password) => match cipher::decrypt(&raw, &password) {
                Ok(plaintext) => deserialize(&plaintext)?,
                Err(CryptoError::AuthenticationFailure) => match classify(&raw) {
                    Plaintext::Vault(vault) => {
                        tracing::warn!(
                            path = %path.display(),
                            "Password supplied but vault file is not encrypted"
                        );
                        vault
                    }
                    Plaintext::Malformed(e) => return Err(e),
                    Plaintext::Opaque => return Err(VaultError::IncorrectPassword),
                },
                Err(e) => return Err(e.into()),
            },
            None => match classify(&raw) {
                Plaintext::Vault(vault) => vault,
                Plaintext::Malformed(e) => return Err(e),
                Plaintext::Opaque => return Err(VaultError::PasswordRequired),
            },
        };

        tracing::info!(
            path = %path.display(),
            identifiers = vault.len(),
            "Vault loaded"
        );
        Ok(vault)
    }
}

/// Whether the file at `path` is something other than a plaintext vault
/// document. No password is consulted.
pub fn is_encrypted(path: &Path) -> Result<bool, VaultError> {
    let raw = read_file(path)?;
    Ok(matches!(classify(&raw), Plaintext::Opaque))
}

fn read_file(path: &Path) -> Result<Vec<u8>, VaultError> {
    fs::read(path).map_err(|source| VaultError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

impl TokenVault {
    /// Load a vault, taking the default password from `TOKENVAULT_PASSWORD`.
    pub fn open(path: impl AsRef<Path>, password: Option<&[u8]>) -> Result<Self, VaultError> {
        Persistence::from_env().load(path.as_ref(), password)
    }

    /// Save this vault, taking the default password from `TOKENVAULT_PASSWORD`.
    pub fn save(&self, path: impl AsRef<Path>, password: Option<&[u8]>) -> Result<(), VaultError> {
        Persistence::from_env().save(self, path.as_ref(), password)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
