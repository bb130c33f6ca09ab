//! Key authorization topologies
//!
//! This crate builds arbitrary-depth key authorization structures (single
//! keys composed into ordered lists and threshold groups, mixing Ed25519 and
//! ECDSA secp256k1), flattens them into the ordered signer set an operation
//! needs, and normalizes differently-enveloped encodings of the same key
//! material so they can be compared.
//!
//! The cryptographic primitives themselves are external capabilities,
//! consumed through the [`Keygen`] and [`KeyCodec`] traits; this crate owns
//! composition order and invariant enforcement only.

#![forbid(unsafe_code)]

pub mod effects;
pub mod error;
pub mod flatten;
pub mod generate;
pub mod node;
pub mod normalize;
pub mod spec;

pub use effects::{KeyCodec, KeyMaterial, Keygen};
pub use error::{GenerateError, KeygenError, SpecError};
pub use flatten::flatten_signers;
pub use generate::TopologyBuilder;
pub use node::{GeneratedTopology, KeyAlgorithm, KeyNode};
pub use normalize::{ensure_equivalent, equivalent, raw_suffix, EncodingMismatch};
pub use spec::KeySpec;
