//! Declarative key topology descriptors
//!
//! A [`KeySpec`] is the recursive, externally-tagged descriptor a scenario
//! supplies to describe the topology it wants: which algorithm each leaf
//! uses, whether the leaf keeps its private half, and how leaves nest into
//! lists and threshold groups. The tag strings match the descriptor format
//! used by scenario files and RPC params blocks.

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Recursive topology descriptor.
///
/// `PublicKey` variants produce leaves without a private half; `PrivateKey`
/// variants keep it. `from_key` derives the public encoding from an
/// existing private encoding instead of generating fresh material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum KeySpec {
    /// Ed25519 leaf, public encoding only.
    Ed25519PublicKey {
        #[serde(
            rename = "fromKey",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        from_key: Option<String>,
    },
    /// Ed25519 leaf carrying its private encoding.
    Ed25519PrivateKey,
    /// ECDSA secp256k1 leaf, public encoding only.
    EcdsaSecp256k1PublicKey {
        #[serde(
            rename = "fromKey",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        from_key: Option<String>,
    },
    /// ECDSA secp256k1 leaf carrying its private encoding.
    EcdsaSecp256k1PrivateKey,
    /// EVM address derived from a secp256k1 private key. Public-only: the
    /// address is the leaf's outward identity.
    EvmAddress {
        #[serde(
            rename = "fromKey",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        from_key: Option<String>,
    },
    /// Ordered list of child descriptors.
    KeyList { keys: Vec<KeySpec> },
    /// K-of-N group over child descriptors.
    ThresholdKey { threshold: usize, keys: Vec<KeySpec> },
}

impl KeySpec {
    /// Parse a descriptor from its JSON form.
    ///
    /// Unrecognized type tags and structural errors surface as
    /// [`SpecError::Malformed`].
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        serde_json::from_str(json).map_err(|e| SpecError::malformed(e.to_string()))
    }

    /// Validate the whole descriptor tree.
    ///
    /// Runs to completion before any key material is generated, so invariant
    /// violations never reach the network.
    pub fn validate(&self) -> Result<(), SpecError> {
        match self {
            KeySpec::Ed25519PublicKey { .. }
            | KeySpec::Ed25519PrivateKey
            | KeySpec::EcdsaSecp256k1PublicKey { .. }
            | KeySpec::EcdsaSecp256k1PrivateKey
            | KeySpec::EvmAddress { .. } => Ok(()),
            KeySpec::KeyList { keys } => {
                if keys.is_empty() {
                    return Err(SpecError::EmptyKeyList);
                }
                keys.iter().try_for_each(KeySpec::validate)
            }
            KeySpec::ThresholdKey { threshold, keys } => {
                if keys.is_empty() {
                    return Err(SpecError::EmptyKeyList);
                }
                if *threshold < 1 || *threshold > keys.len() {
                    return Err(SpecError::ThresholdOutOfRange {
                        threshold: *threshold,
                        children: keys.len(),
                    });
                }
                keys.iter().try_for_each(KeySpec::validate)
            }
        }
    }

    /// Number of leaves whose spec type keeps a private encoding.
    pub fn private_leaf_count(&self) -> usize {
        match self {
            KeySpec::Ed25519PrivateKey | KeySpec::EcdsaSecp256k1PrivateKey => 1,
            KeySpec::Ed25519PublicKey { .. }
            | KeySpec::EcdsaSecp256k1PublicKey { .. }
            | KeySpec::EvmAddress { .. } => 0,
            KeySpec::KeyList { keys } | KeySpec::ThresholdKey { keys, .. } => {
                keys.iter().map(KeySpec::private_leaf_count).sum()
            }
        }
    }
}
