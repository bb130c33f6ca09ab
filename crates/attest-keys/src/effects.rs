//! External primitive interfaces
//!
//! Key material creation and composite wire encoding are capabilities this
//! crate consumes but never implements. [`Keygen`] covers fresh generation
//! and derivation; [`KeyCodec`] covers composition of child public encodings
//! into the aggregate form the system under test expects. The codec defines
//! wire bytes; this crate only defines composition order.

use async_trait::async_trait;

use crate::error::KeygenError;
use crate::node::KeyAlgorithm;

/// A freshly generated key pair, both halves in their wire-hex envelopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub public_encoding: String,
    pub private_encoding: String,
}

/// Key-generation primitive.
#[async_trait]
pub trait Keygen: Send + Sync {
    /// Generate a fresh key pair for `algorithm`.
    async fn generate(&self, algorithm: KeyAlgorithm) -> Result<KeyMaterial, KeygenError>;

    /// Derive the public encoding from an existing private encoding.
    async fn derive_public(
        &self,
        private_encoding: &str,
        algorithm: KeyAlgorithm,
    ) -> Result<String, KeygenError>;

    /// Derive the EVM address for a secp256k1 private encoding.
    async fn derive_evm_address(&self, private_encoding: &str) -> Result<String, KeygenError>;
}

/// Composite key encoding primitive.
///
/// Infallible: the generator validates structure before composing, so both
/// operations always receive at least one child and an in-range threshold.
pub trait KeyCodec: Send + Sync {
    /// Compose child public encodings into a list aggregate.
    fn compose_list(&self, children: &[String]) -> String;

    /// Compose child public encodings into a threshold aggregate.
    fn compose_threshold(&self, threshold: usize, children: &[String]) -> String;
}
