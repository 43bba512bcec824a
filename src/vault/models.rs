// TokenVault: Token and metadata models
//
// Metadata is a JSON object (`serde_json` with `preserve_order`), so string,
// number, bool, null, list and nested map values all survive signing and
// verification unchanged and in order.

use std::fmt;

use serde_json::{Map, Value};

use super::VaultError;

/// Caller metadata carried inside a token.
pub type Metadata = Map<String, Value>;

/// Separates the signed claims from the identifier in a token.
/// The claims are base64url without padding, so `=` never appears in them.
pub const TOKEN_DELIMITER: &str = "==";

/// Reserved claim holding the per-issuance freshness marker.
pub const FRESHNESS_FIELD: &str = "__tokenvault_fresh__";

/// Convert an arbitrary JSON value into metadata.
/// `null` means "no metadata"; anything other than an object is rejected.
pub fn metadata_from_value(value: Value) -> Result<Metadata, VaultError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Metadata::new()),
        other => Err(VaultError::InvalidArgument(format!(
            "metadata must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Assemble `<signed-claims><delimiter><identifier>`.
pub(crate) fn compose_token(signed_claims: &str, identifier: &str) -> String {
    format!("{}{}{}", signed_claims, TOKEN_DELIMITER, identifier)
}

/// Split a token at the first delimiter into `(signed_claims, identifier)`.
pub(crate) fn split_token(token: &str) -> Option<(&str, &str)> {
    token.split_once(TOKEN_DELIMITER)
}

/// Public verification material for one identifier (SPKI PEM bytes).
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct VerificationKey(Vec<u8>);

impl VerificationKey {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerificationKey({} bytes)", self.0.len())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_uses_first_delimiter() {
        let token = compose_token("aaa.bbb.ccc", "weird==id==x");
        assert_eq!(split_token(&token), Some(("aaa.bbb.ccc", "weird==id==x")));
    }

    #[test]
    fn test_split_without_delimiter() {
        assert_eq!(split_token("garbage"), None);
        assert_eq!(split_token(""), None);
    }

    #[test]
    fn test_identifier_starting_with_equals() {
        let token = compose_token("h.p.s", "=lead");
        assert_eq!(split_token(&token), Some(("h.p.s", "=lead")));
    }

    #[test]
    fn test_metadata_from_object_preserves_order() {
        let meta = metadata_from_value(json!({"z": 1, "a": [true, null], "m": {"k": "v"}})).unwrap();
        let keys: Vec<&str> = meta.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_metadata_null_is_empty() {
        assert!(metadata_from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_non_object_metadata_rejected() {
        for value in [json!([1, 2]), json!("admin"), json!(7), json!(false)] {
            let err = metadata_from_value(value).unwrap_err();
            assert!(matches!(err, VaultError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_verification_key_debug_hides_bytes() {
        let key = VerificationKey::new(b"-----BEGIN PUBLIC KEY-----".to_vec());
        assert_eq!(format!("{:?}", key), "VerificationKey(26 bytes)");
    }
}
