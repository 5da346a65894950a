// ABOUTME: Deterministic request signing and webhook signature verification
// ABOUTME: Sorted key=value concatenation with shared secret, SHA-256, constant-time compare
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Gateway request signatures.
//!
//! The signature is computed over every field except the signature itself:
//! fields sorted by name, concatenated as `key=value` pairs joined by `&`,
//! with the shared secret appended, hashed with SHA-256 and rendered as
//! lowercase hex. Verification recomputes the signature over the received
//! fields and compares with constant-time equality.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use subtle::ConstantTimeEq;

/// Field name the signature travels under; always excluded from signing
pub const SIGNATURE_FIELD: &str = "signature";

/// Compute the signature over the given fields.
///
/// The `signature` field is skipped if present, so signing an
/// already-signed payload is stable.
#[must_use]
pub fn sign(fields: &BTreeMap<String, String>, secret: &str) -> String {
    // BTreeMap iterates in key order, which is the sort the scheme requires.
    let mut payload = fields
        .iter()
        .filter(|(key, _)| key.as_str() != SIGNATURE_FIELD)
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    payload.push_str(secret);

    let digest = Sha256::digest(payload.as_bytes());
    hex::encode(digest)
}

/// Verify a provided signature against the received fields.
///
/// Comparison is constant-time so the check leaks nothing about how much of
/// a forged signature matched.
#[must_use]
pub fn verify(fields: &BTreeMap<String, String>, provided: &str, secret: &str) -> bool {
    let expected = sign(fields, secret);
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// Flatten a JSON object into signable fields.
///
/// Strings are taken verbatim, numbers and booleans use their JSON text,
/// nulls are skipped, and nested values use their compact JSON encoding.
/// Non-object payloads produce an empty map and will never verify.
#[must_use]
pub fn fields_from_json(payload: &Value) -> BTreeMap<String, String> {
    let Value::Object(object) = payload else {
        return BTreeMap::new();
    };

    object
        .iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
            };
            Some((key.clone(), rendered))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_fields() -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        fields.insert("amount".into(), "24000".into());
        fields.insert("currency".into(), "KZT".into());
        fields.insert("merchant_id".into(), "m-100".into());
        fields.insert("order_id".into(), "ord-1".into());
        fields
    }

    #[test]
    fn signature_is_deterministic_and_order_independent() {
        let secret = "s3cret";
        let first = sign(&sample_fields(), secret);

        // Insertion in a different order lands in the same sorted payload.
        let mut reordered = BTreeMap::new();
        reordered.insert("order_id".to_owned(), "ord-1".to_owned());
        reordered.insert("amount".to_owned(), "24000".to_owned());
        reordered.insert("merchant_id".to_owned(), "m-100".to_owned());
        reordered.insert("currency".to_owned(), "KZT".to_owned());

        assert_eq!(first, sign(&reordered, secret));
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn round_trip_verifies_and_tampering_breaks_it() {
        let secret = "s3cret";
        let mut fields = sample_fields();
        let signature = sign(&fields, secret);
        assert!(verify(&fields, &signature, secret));

        // Flipping any single field value without resigning must fail.
        fields.insert("amount".into(), "24001".into());
        assert!(!verify(&fields, &signature, secret));

        // The wrong secret must fail too.
        assert!(!verify(&sample_fields(), &signature, "other"));
    }

    #[test]
    fn signature_field_itself_is_excluded_from_signing() {
        let secret = "s3cret";
        let mut fields = sample_fields();
        let signature = sign(&fields, secret);
        fields.insert(SIGNATURE_FIELD.into(), signature.clone());
        // Signing the signed payload yields the same signature.
        assert_eq!(sign(&fields, secret), signature);
        assert!(verify(&fields, &signature, secret));
    }

    #[test]
    fn json_flattening_renders_scalars_and_skips_nulls() {
        let payload = json!({
            "payment_id": "pay-9",
            "amount": 24000,
            "test_mode": false,
            "transaction_id": null,
        });
        let fields = fields_from_json(&payload);
        assert_eq!(fields.get("payment_id").map(String::as_str), Some("pay-9"));
        assert_eq!(fields.get("amount").map(String::as_str), Some("24000"));
        assert_eq!(fields.get("test_mode").map(String::as_str), Some("false"));
        assert!(!fields.contains_key("transaction_id"));
    }
}
