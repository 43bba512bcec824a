// TokenVault: Signature adapter
//
// RS256 (RSASSA-PKCS1-v1_5 / SHA-256) over a JSON claims object, encoded as a
// compact JWS. Each issuance gets its own 2048-bit keypair; the private half
// lives only inside a `SigningKey` for the duration of one signing call.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::pkcs8::EncodePublicKey;
use rsa::rand_core::OsRng;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use super::CryptoError;

/// RSA modulus size. The public exponent is the `rsa` crate default, 65537.
const RSA_KEY_BITS: usize = 2048;

const ALGORITHM: Algorithm = Algorithm::RS256;

/// The private half of a freshly generated keypair, PKCS#1 PEM encoded.
/// Zeroized on drop and never printed.
pub struct SigningKey {
    pem: Zeroizing<String>,
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("pem", &"[REDACTED]")
            .finish()
    }
}

/// Generate a new RSA keypair.
///
/// Returns the signing key and the SubjectPublicKeyInfo PEM of the public
/// key. This is the expensive step of issuance.
pub fn generate_keypair() -> Result<(SigningKey, Vec<u8>), CryptoError> {
    let private = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
        .map_err(|e| CryptoError::KeyGeneration(format!("RSA key generation failed: {}", e)))?;
    let public = RsaPublicKey::from(&private);

    let private_pem = private
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyGeneration(format!("private key encoding failed: {}", e)))?;
    let public_pem = public
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyGeneration(format!("public key encoding failed: {}", e)))?;

    Ok((SigningKey { pem: private_pem }, public_pem.into_bytes()))
}

/// Sign a claims object, producing `header.payload.signature`.
pub fn sign(claims: &Map<String, Value>, key: &SigningKey) -> Result<String, CryptoError> {
    let encoding_key = EncodingKey::from_rsa_pem(key.pem.as_bytes())
        .map_err(|e| CryptoError::Signing(format!("invalid private key: {}", e)))?;

    jsonwebtoken::encode(&Header::new(ALGORITHM), claims, &encoding_key)
        .map_err(|e| CryptoError::Signing(e.to_string()))
}

/// Verify signed claims against a public key PEM and return the claims.
///
/// Only the header algorithm and the signature over `header.payload` are
/// checked. The payload is decoded as a plain JSON object, so names like
/// `sub` or `exp` are caller data with any JSON value.
///
/// Bad signatures, foreign algorithms, malformed encodings and unusable keys
/// all return the same [`CryptoError::Verification`].
pub fn verify(signed: &str, public_pem: &[u8]) -> Result<Map<String, Value>, CryptoError> {
    let decoding_key =
        DecodingKey::from_rsa_pem(public_pem).map_err(|_| CryptoError::Verification)?;

    let (message, signature) = signed.rsplit_once('.').ok_or(CryptoError::Verification)?;
    let (_, payload) = message.split_once('.').ok_or(CryptoError::Verification)?;

    let header = jsonwebtoken::decode_header(signed).map_err(|_| CryptoError::Verification)?;
    if header.alg != ALGORITHM {
        return Err(CryptoError::Verification);
    }

    match jsonwebtoken::crypto::verify(signature, message.as_bytes(), &decoding_key, ALGORITHM) {
        Ok(true) => {}
        _ => return Err(CryptoError::Verification),
    }

    let payload = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| CryptoError::Verification)?;
    serde_json::from_slice(&payload).map_err(|_| CryptoError::Verification)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
