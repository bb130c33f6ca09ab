//! Key topology model
//!
//! A key topology is an explicit sum type: a simple leaf key, an ordered
//! list (signature required from every child when used as a full
//! authorizer), or a K-of-N threshold group. Nodes are immutable once built
//! and acyclic by construction: trees are assembled bottom-up from a
//! declarative spec and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Signature algorithm of a simple key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    /// Ed25519 (EdDSA over Curve25519)
    Ed25519,
    /// ECDSA over secp256k1
    EcdsaSecp256k1,
}

/// One node of a key authorization topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyNode {
    /// A leaf key. `private_encoding` is present only when the spec asked
    /// for a private-key-bearing leaf.
    Simple {
        algorithm: KeyAlgorithm,
        public_encoding: String,
        private_encoding: Option<String>,
    },
    /// An ordered list of child keys. Authorization semantics are
    /// unordered, but the sequence order is significant for signer
    /// flattening and is preserved.
    List { children: Vec<KeyNode> },
    /// A K-of-N group: at least `threshold` of `children` must sign.
    ///
    /// Invariant: `1 <= threshold <= children.len()` and
    /// `children.len() >= 1`, enforced at spec validation.
    Threshold {
        threshold: usize,
        children: Vec<KeyNode>,
    },
}

impl KeyNode {
    /// Number of simple leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            KeyNode::Simple { .. } => 1,
            KeyNode::List { children } | KeyNode::Threshold { children, .. } => {
                children.iter().map(KeyNode::leaf_count).sum()
            }
        }
    }
}

/// Output of topology generation, created once per scenario step and
/// discarded at scenario end. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTopology {
    /// The generated tree.
    pub root: KeyNode,
    /// Composite public encoding of the root, as composed by the external
    /// key codec. For a simple root this is the leaf's public encoding.
    pub key: String,
    /// Pre-order, depth-first flattening of every private encoding present
    /// in the tree, the signer set for operations authorized by this key.
    pub private_keys: Vec<String>,
}
