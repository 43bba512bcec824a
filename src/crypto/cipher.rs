// TokenVault: At-rest cipher
//
// Authenticated encryption for the vault file. The caller's key is treated as
// password material: every encryption draws a fresh salt, derives a 32-byte
// AES-256-GCM key from it with Argon2id, and prepends salt and nonce to the
// ciphertext.
//
// Layout: salt (16) || nonce (12) || ciphertext || tag (16)

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::RngCore;
use zeroize::Zeroizing;

use super::CryptoError;

// ─── Constants ───────────────────────────────────────────────────────────────

const SALT_LEN: usize = 16;

/// AES-GCM standard nonce size.
const NONCE_LEN: usize = 12;

const TAG_LEN: usize = 16;

/// Derived AES-256 key length.
const DERIVED_KEY_LEN: usize = 32;

/// Entropy of a generated key, before base64 encoding.
const GENERATED_KEY_LEN: usize = 32;

// Argon2id parameters: m=19456 (19 MiB), t=2, p=1.
const ARGON2_M_COST: u32 = 19456;
const ARGON2_T_COST: u32 = 2;
const ARGON2_P_COST: u32 = 1;

// ─── Operations ──────────────────────────────────────────────────────────────

/// Generate a fresh key usable with [`encrypt`] and [`decrypt`].
///
/// 256 bits of randomness, URL-safe base64 encoded so the key can travel
/// through an environment variable or a command-line argument.
pub fn generate_key() -> Zeroizing<Vec<u8>> {
    let mut raw = Zeroizing::new([0u8; GENERATED_KEY_LEN]);
    rand::rng().fill_bytes(&mut raw[..]);
    Zeroizing::new(URL_SAFE.encode(&raw[..]).into_bytes())
}

/// Encrypt `data` under `key`. Output decrypts only under the same key.
pub fn encrypt(data: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut rng = rand::rng();
    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let derived = derive_key(key, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&derived[..])
        .map_err(|e| CryptoError::Encryption(format!("cipher init failed: {}", e)))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), data)
        .map_err(|e| CryptoError::Encryption(format!("encryption failed: {}", e)))?;

    let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt `data` produced by [`encrypt`].
///
/// A wrong key, a flipped bit or a truncated input all yield
/// [`CryptoError::AuthenticationFailure`]; wrong plaintext is never returned.
pub fn decrypt(data: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if data.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
        return Err(CryptoError::AuthenticationFailure);
    }

    let (salt, rest) = data.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let derived = derive_key(key, salt)?;
    let cipher = Aes256Gcm::new_from_slice(&derived[..])
        .map_err(|e| CryptoError::Encryption(format!("cipher init failed: {}", e)))?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailure)
}

fn derive_key(password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; DERIVED_KEY_LEN]>, CryptoError> {
    let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(DERIVED_KEY_LEN))
        .map_err(|e| CryptoError::Derivation(format!("invalid Argon2 params: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut derived = Zeroizing::new([0u8; DERIVED_KEY_LEN]);
    argon2
        .hash_password_into(password, salt, &mut derived[..])
        .map_err(|e| CryptoError::Derivation(format!("Argon2id hash failed: {}", e)))?;

    Ok(derived)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
