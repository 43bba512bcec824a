// TokenVault: Crypto Module
//
// Thin adapters over existing primitives. `cipher` protects the vault file at
// rest (AES-256-GCM under an Argon2id-derived key); `signature` mints per-
// identifier RSA keypairs and signs/verifies claims as RS256 JWS.

mod error;

pub mod cipher;
pub mod signature;

pub use error::CryptoError;
