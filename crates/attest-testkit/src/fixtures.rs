//! Canned topology descriptors
//!
//! Shapes used repeatedly across the suite, so tests agree on what "the
//! nested list" or "the mixed list" means.

use attest_keys::KeySpec;

/// Flat list of four private Ed25519 keys.
pub fn four_key_sub_list() -> KeySpec {
    KeySpec::KeyList {
        keys: vec![KeySpec::Ed25519PrivateKey; 4],
    }
}

/// Two-level nesting: two identical 4-key sub-lists under one root list.
pub fn nested_key_list() -> KeySpec {
    KeySpec::KeyList {
        keys: vec![four_key_sub_list(), four_key_sub_list()],
    }
}

/// 2-of-3 threshold mixing both algorithms.
pub fn two_of_three_threshold() -> KeySpec {
    KeySpec::ThresholdKey {
        threshold: 2,
        keys: vec![
            KeySpec::Ed25519PrivateKey,
            KeySpec::EcdsaSecp256k1PrivateKey,
            KeySpec::Ed25519PublicKey { from_key: None },
        ],
    }
}

/// Mixed three-leaf list where only the last leaf carries a private key.
pub fn mixed_three_leaf_list() -> KeySpec {
    KeySpec::KeyList {
        keys: vec![
            KeySpec::Ed25519PublicKey { from_key: None },
            KeySpec::EcdsaSecp256k1PublicKey { from_key: None },
            KeySpec::EcdsaSecp256k1PrivateKey,
        ],
    }
}

/// Depth-3 topology: threshold over a list over leaves, mixing algorithms
/// and an EVM address leaf.
pub fn depth_three_mixed() -> KeySpec {
    KeySpec::ThresholdKey {
        threshold: 1,
        keys: vec![
            KeySpec::KeyList {
                keys: vec![
                    KeySpec::Ed25519PrivateKey,
                    KeySpec::ThresholdKey {
                        threshold: 1,
                        keys: vec![
                            KeySpec::EcdsaSecp256k1PrivateKey,
                            KeySpec::EvmAddress { from_key: None },
                        ],
                    },
                ],
            },
            KeySpec::Ed25519PublicKey { from_key: None },
        ],
    }
}
