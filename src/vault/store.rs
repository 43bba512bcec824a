// TokenVault: Credential store
//
// Maps each identifier to the public half of the keypair that signed its
// most recent token. Private keys are dropped as soon as a token is signed,
// so the store never holds anything that can mint tokens. Re-issuing for an
// identifier replaces its public key, which invalidates every older token
// for that identifier; removing it invalidates all of them.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use uuid::Uuid;

use crate::crypto::signature;

use super::models::{compose_token, split_token, Metadata, VerificationKey, FRESHNESS_FIELD};
use super::VaultError;

/// A vault shared between threads. `validate` takes the read lock;
/// `issue`, `remove` and saving take the write lock (or at least exclude
/// writers).
pub type SharedVault = Arc<RwLock<TokenVault>>;

/// In-memory credential store: identifier → verification key.
#[derive(Debug, Default, Clone)]
pub struct TokenVault {
    pub(super) entries: BTreeMap<String, VerificationKey>,
}

impl TokenVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn from_entries(entries: BTreeMap<String, VerificationKey>) -> Self {
        Self { entries }
    }

    /// Wrap this vault for sharing across threads.
    pub fn into_shared(self) -> SharedVault {
        Arc::new(RwLock::new(self))
    }

    /// Issue a token for `identifier` carrying a copy of `metadata`.
    ///
    /// Generates a fresh RSA keypair, signs the metadata plus a random
    /// freshness marker, keeps only the public key and returns
    /// `<signed-claims>==<identifier>`. Any previous token for the same
    /// identifier stops validating.
    pub fn issue(
        &mut self,
        identifier: &str,
        metadata: Option<&Metadata>,
    ) -> Result<String, VaultError> {
        if identifier.is_empty() {
            return Err(VaultError::InvalidArgument(
                "identifier must not be empty".to_string(),
            ));
        }

        let mut claims = metadata.cloned().unwrap_or_default();
        if claims.contains_key(FRESHNESS_FIELD) {
            return Err(VaultError::InvalidArgument(format!(
                "metadata field `{}` is reserved",
                FRESHNESS_FIELD
            )));
        }
        claims.insert(
            FRESHNESS_FIELD.to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );

        let (signing_key, public_pem) = signature::generate_keypair()?;
        let signed_claims = signature::sign(&claims, &signing_key)?;
        drop(signing_key);

        let replaced = self
            .entries
            .insert(identifier.to_string(), VerificationKey::new(public_pem))
            .is_some();

        tracing::info!(identifier = %identifier, replaced, "Token issued");

        Ok(compose_token(&signed_claims, identifier))
    }

    /// Validate a token, returning its metadata or `None`.
    ///
    /// `None` covers every failure (no delimiter, unknown identifier, bad
    /// signature, missing freshness marker) so callers learn nothing about
    /// why a token was refused.
    pub fn validate(&self, token: &str) -> Option<Metadata> {
        let Some((signed_claims, identifier)) = split_token(token) else {
            tracing::debug!("Token rejected: no delimiter");
            return None;
        };

        let Some(key) = self.entries.get(identifier) else {
            tracing::debug!(identifier = %identifier, "Token rejected: unknown identifier");
            return None;
        };

        let mut claims = match signature::verify(signed_claims, key.as_bytes()) {
            Ok(claims) => claims,
            Err(_) => {
                tracing::debug!(identifier = %identifier, "Token rejected: verification failed");
                return None;
            }
        };

        if claims.shift_remove(FRESHNESS_FIELD).is_none() {
            tracing::debug!(identifier = %identifier, "Token rejected: freshness marker missing");
            return None;
        }

        Some(claims)
    }

    /// Forget `identifier`, invalidating all of its tokens.
    /// Returns whether it was present.
    pub fn remove(&mut self, identifier: &str) -> bool {
        let removed = self.entries.remove(identifier).is_some();
        if removed {
            tracing::info!(identifier = %identifier, "Identifier removed");
        }
        removed
    }

    /// Identifiers in sorted order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::signature;
    use crate::vault::models::metadata_from_value;
    use serde_json::json;
    use std::thread;

    fn meta(value: Value) -> Metadata {
        metadata_from_value(value).unwrap()
    }

    #[test]
    fn test_issue_then_validate_returns_metadata() {
        let mut vault = TokenVault::new();
        let metadata = meta(json!({"role": "admin"}));

        let token = vault.issue("a@x.com", Some(&metadata)).unwrap();

        assert_eq!(vault.validate(&token), Some(metadata));
        assert!(token.ends_with("==a@x.com"));
    }

    #[test]
    fn test_issue_without_metadata_validates_to_empty() {
        let mut vault = TokenVault::new();
        let token = vault.issue("a@x.com", None).unwrap();

        assert_eq!(vault.validate(&token), Some(Metadata::new()));
    }

    #[test]
    fn test_nested_metadata_roundtrips_exactly() {
        let mut vault = TokenVault::new();
        let metadata = meta(json!({
            "name": "Alon",
            "age": 41,
            "ratio": 0.25,
            "active": true,
            "manager": null,
            "groups": ["ops", {"team": "core"}],
            "limits": {"daily": 100, "burst": [1, 2, 3]}
        }));

        let token = vault.issue("user@gmail.com", Some(&metadata)).unwrap();
        assert_eq!(vault.validate(&token), Some(metadata));
    }

    #[test]
    fn test_registered_claim_names_roundtrip_with_any_value() {
        let mut vault = TokenVault::new();

        for value in [
            json!({"sub": {}}),
            json!({"sub": [1]}),
            json!({"sub": {"id": 7}, "iss": [1], "exp": "x", "aud": 3, "nbf": null}),
        ] {
            let metadata = meta(value);
            let token = vault.issue("a@x.com", Some(&metadata)).unwrap();
            assert_eq!(vault.validate(&token), Some(metadata));
        }
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let mut vault = TokenVault::new();
        let err = vault.issue("", None).unwrap_err();

        assert!(matches!(err, VaultError::InvalidArgument(_)));
        assert!(vault.is_empty());
    }

    #[test]
    fn test_reserved_field_rejected() {
        let mut vault = TokenVault::new();
        let metadata = meta(json!({ FRESHNESS_FIELD: "mine" }));

        let err = vault.issue("a@x.com", Some(&metadata)).unwrap_err();
        assert!(matches!(err, VaultError::InvalidArgument(_)));
        assert!(!vault.contains("a@x.com"));
    }

    #[test]
    fn test_caller_metadata_not_mutated() {
        let mut vault = TokenVault::new();
        let metadata = meta(json!({"k": "v"}));

        vault.issue("a@x.com", Some(&metadata)).unwrap();

        assert_eq!(metadata, meta(json!({"k": "v"})));
    }

    #[test]
    fn test_remove_invalidates_token() {
        let mut vault = TokenVault::new();
        let token = vault
            .issue("a@x.com", Some(&meta(json!({"role": "admin"}))))
            .unwrap();

        assert!(vault.remove("a@x.com"));
        assert_eq!(vault.validate(&token), None);
        assert!(!vault.remove("a@x.com"), "second removal finds nothing");
    }

    #[test]
    fn test_reissue_supersedes_previous_token() {
        let mut vault = TokenVault::new();
        let first = vault.issue("a@x.com", None).unwrap();
        let second = vault.issue("a@x.com", None).unwrap();

        assert_ne!(first, second);
        assert_eq!(vault.validate(&first), None);
        assert_eq!(vault.validate(&second), Some(Metadata::new()));
        assert_eq!(vault.len(), 1);
    }

    #[test]
    fn test_identifiers_are_independent() {
        let mut vault = TokenVault::new();
        let one = vault.issue("one", Some(&meta(json!({"n": 1})))).unwrap();
        let two = vault.issue("two", Some(&meta(json!({"n": 2})))).unwrap();

        vault.issue("one", None).unwrap();
        assert_eq!(vault.validate(&two), Some(meta(json!({"n": 2}))));

        vault.remove("one");
        assert_eq!(vault.validate(&one), None);
        assert_eq!(vault.validate(&two), Some(meta(json!({"n": 2}))));
    }

    #[test]
    fn test_garbage_tokens_are_invalid() {
        let mut vault = TokenVault::new();
        vault.issue("a@x.com", None).unwrap();

        for token in ["garbage", "", "==", "==a@x.com", "x.y.z==a@x.com", "x.y.z==nobody"] {
            assert_eq!(vault.validate(token), None, "token {:?}", token);
        }
    }

    #[test]
    fn test_token_moved_to_other_identifier_is_invalid() {
        let mut vault = TokenVault::new();
        let token = vault.issue("alice", None).unwrap();
        vault.issue("mallory", None).unwrap();

        let forged = token.replacen("==alice", "==mallory", 1);
        assert_eq!(vault.validate(&forged), None);
    }

    #[test]
    fn test_identifier_containing_delimiter() {
        let mut vault = TokenVault::new();
        let token = vault.issue("base64==id", Some(&meta(json!({"ok": true})))).unwrap();

        assert_eq!(vault.validate(&token), Some(meta(json!({"ok": true}))));
    }

    #[test]
    fn test_claims_without_freshness_marker_are_invalid() {
        // Forge a correctly signed token whose claims lack the marker.
        let mut vault = TokenVault::new();
        let (signing_key, public_pem) = signature::generate_keypair().unwrap();
        let signed = signature::sign(&meta(json!({"role": "admin"})), &signing_key).unwrap();
        vault
            .entries
            .insert("a@x.com".to_string(), VerificationKey::new(public_pem));

        assert_eq!(vault.validate(&compose_token(&signed, "a@x.com")), None);
    }

    #[test]
    fn test_identifiers_sorted() {
        let mut vault = TokenVault::new();
        for id in ["carol", "alice", "bob"] {
            vault.issue(id, None).unwrap();
        }

        let ids: Vec<&str> = vault.identifiers().collect();
        assert_eq!(ids, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_shared_vault_validates_from_many_threads() {
        let mut vault = TokenVault::new();
        let token = vault.issue("a@x.com", Some(&meta(json!({"role": "admin"})))).unwrap();
        let shared = vault.into_shared();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                let token = token.clone();
                thread::spawn(move || {
                    let guard = shared.read().unwrap();
                    guard.validate(&token)
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(meta(json!({"role": "admin"}))));
        }

        assert!(shared.write().unwrap().remove("a@x.com"));
        assert_eq!(shared.read().unwrap().validate(&token), None);
    }
}
