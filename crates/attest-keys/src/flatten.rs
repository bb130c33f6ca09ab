//! Signer set flattening
//!
//! An operation authorized by a key topology needs signatures from the
//! private halves present in the tree. Flattening is the pre-order,
//! depth-first, left-to-right walk that collects them; public-only leaves
//! contribute nothing, which is legal: whichever key on that branch carries
//! a private half supplies the proof. Identical trees always flatten to
//! identical sequences.

use crate::node::KeyNode;

/// Ordered private encodings required to sign for `root`.
pub fn flatten_signers(root: &KeyNode) -> Vec<String> {
    let mut signers = Vec::new();
    collect(root, &mut signers);
    signers
}

fn collect(node: &KeyNode, out: &mut Vec<String>) {
    match node {
        KeyNode::Simple {
            private_encoding, ..
        } => {
            if let Some(private) = private_encoding {
                out.push(private.clone());
            }
        }
        KeyNode::List { children } | KeyNode::Threshold { children, .. } => {
            for child in children {
                collect(child, out);
            }
        }
    }
}
