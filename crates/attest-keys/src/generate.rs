//! Topology generation
//!
//! Recursive descent from a [`KeySpec`] to a [`GeneratedTopology`]: the
//! whole descriptor is validated first, then leaves invoke the external
//! [`Keygen`] primitive and interior nodes compose their children's public
//! encodings through the [`KeyCodec`], depth-first and in declaration order.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::effects::{KeyCodec, Keygen};
use crate::error::GenerateError;
use crate::flatten::flatten_signers;
use crate::node::{GeneratedTopology, KeyAlgorithm, KeyNode};
use crate::spec::KeySpec;

/// Builds key topologies against a keygen primitive and a composite codec.
pub struct TopologyBuilder<'a, G: Keygen + ?Sized, C: KeyCodec + ?Sized> {
    keygen: &'a G,
    codec: &'a C,
}

impl<'a, G: Keygen + ?Sized, C: KeyCodec + ?Sized> TopologyBuilder<'a, G, C> {
    /// Create a builder borrowing the two external primitives.
    pub fn new(keygen: &'a G, codec: &'a C) -> Self {
        Self { keygen, codec }
    }

    /// Generate a topology from a descriptor.
    ///
    /// Structural validation completes before any `Keygen` call; a
    /// [`GenerateError::Spec`] therefore never follows external I/O.
    pub async fn generate(&self, spec: &KeySpec) -> Result<GeneratedTopology, GenerateError> {
        spec.validate()?;
        tracing::debug!(private_leaves = spec.private_leaf_count(), "generating key topology");

        let root = self.build(spec).await?;
        let key = self.composite_encoding(&root);
        let private_keys = flatten_signers(&root);

        Ok(GeneratedTopology {
            root,
            key,
            private_keys,
        })
    }

    fn build<'s>(&'s self, spec: &'s KeySpec) -> BoxFuture<'s, Result<KeyNode, GenerateError>> {
        async move {
            match spec {
                KeySpec::Ed25519PublicKey { from_key } => {
                    self.simple(KeyAlgorithm::Ed25519, from_key.as_deref(), false)
                        .await
                }
                KeySpec::Ed25519PrivateKey => {
                    self.simple(KeyAlgorithm::Ed25519, None, true).await
                }
                KeySpec::EcdsaSecp256k1PublicKey { from_key } => {
                    self.simple(KeyAlgorithm::EcdsaSecp256k1, from_key.as_deref(), false)
                        .await
                }
                KeySpec::EcdsaSecp256k1PrivateKey => {
                    self.simple(KeyAlgorithm::EcdsaSecp256k1, None, true).await
                }
                KeySpec::EvmAddress { from_key } => self.evm_address(from_key.as_deref()).await,
                KeySpec::KeyList { keys } => {
                    let children = self.build_children(keys).await?;
                    Ok(KeyNode::List { children })
                }
                KeySpec::ThresholdKey { threshold, keys } => {
                    let children = self.build_children(keys).await?;
                    Ok(KeyNode::Threshold {
                        threshold: *threshold,
                        children,
                    })
                }
            }
        }
        .boxed()
    }

    async fn build_children(&self, specs: &[KeySpec]) -> Result<Vec<KeyNode>, GenerateError> {
        let mut children = Vec::with_capacity(specs.len());
        for child in specs {
            children.push(self.build(child).await?);
        }
        Ok(children)
    }

    async fn simple(
        &self,
        algorithm: KeyAlgorithm,
        from_key: Option<&str>,
        keep_private: bool,
    ) -> Result<KeyNode, GenerateError> {
        let (public_encoding, private_encoding) = match from_key {
            Some(private) => {
                let public = self.keygen.derive_public(private, algorithm).await?;
                (public, Some(private.to_string()))
            }
            None => {
                let material = self.keygen.generate(algorithm).await?;
                (material.public_encoding, Some(material.private_encoding))
            }
        };

        Ok(KeyNode::Simple {
            algorithm,
            public_encoding,
            private_encoding: if keep_private { private_encoding } else { None },
        })
    }

    async fn evm_address(&self, from_key: Option<&str>) -> Result<KeyNode, GenerateError> {
        let address = match from_key {
            Some(private) => self.keygen.derive_evm_address(private).await?,
            None => {
                // No source key given: mint a fresh secp256k1 key and reduce
                // it to its address.
                let material = self.keygen.generate(KeyAlgorithm::EcdsaSecp256k1).await?;
                self.keygen
                    .derive_evm_address(&material.private_encoding)
                    .await?
            }
        };

        Ok(KeyNode::Simple {
            algorithm: KeyAlgorithm::EcdsaSecp256k1,
            public_encoding: address,
            private_encoding: None,
        })
    }

    /// Composite public encoding of a node: leaves contribute their own
    /// encoding, interior nodes compose their children's composites in
    /// declaration order.
    fn composite_encoding(&self, node: &KeyNode) -> String {
        match node {
            KeyNode::Simple {
                public_encoding, ..
            } => public_encoding.clone(),
            KeyNode::List { children } => {
                let parts: Vec<String> =
                    children.iter().map(|c| self.composite_encoding(c)).collect();
                self.codec.compose_list(&parts)
            }
            KeyNode::Threshold {
                threshold,
                children,
            } => {
                let parts: Vec<String> =
                    children.iter().map(|c| self.composite_encoding(c)).collect();
                self.codec.compose_threshold(*threshold, &parts)
            }
        }
    }
}
