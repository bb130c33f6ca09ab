//! Local key generation
//!
//! Implements the core's [`Keygen`] capability in-process: Ed25519 via
//! ed25519-dalek, ECDSA secp256k1 via k256, EVM addresses via Keccak-256
//! over the uncompressed public point. Encodings are hex with the constant
//! DER envelope prefixes the normalizer strips, so round-trip properties
//! hold end to end.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ed25519_dalek::SigningKey as Ed25519SigningKey;
use k256::ecdsa::SigningKey as EcdsaSigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha3::{Digest, Keccak256};
use tokio::sync::Mutex;

use attest_keys::{KeyAlgorithm, KeyMaterial, Keygen, KeygenError};

/// DER envelope prefix for an Ed25519 raw public key (hex).
pub const ED25519_PUBLIC_DER_PREFIX: &str = "302a300506032b6570032100";
/// DER envelope prefix for an Ed25519 private key (hex).
pub const ED25519_PRIVATE_DER_PREFIX: &str = "302e020100300506032b657004220420";
/// DER envelope prefix for a compressed secp256k1 public key (hex).
pub const ECDSA_PUBLIC_DER_PREFIX: &str = "302d300706052b8104000a032200";
/// DER envelope prefix for a secp256k1 private key (hex).
pub const ECDSA_PRIVATE_DER_PREFIX: &str = "3030020100300706052b8104000a04220420";

/// In-process [`Keygen`] backed by a ChaCha RNG.
pub struct LocalKeygen {
    rng: Mutex<ChaCha20Rng>,
}

impl LocalKeygen {
    /// Deterministic generator for reproducible fixtures.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::from_entropy()),
        }
    }
}

#[async_trait]
impl Keygen for LocalKeygen {
    async fn generate(&self, algorithm: KeyAlgorithm) -> Result<KeyMaterial, KeygenError> {
        let mut rng = self.rng.lock().await;
        match algorithm {
            KeyAlgorithm::Ed25519 => {
                let signing = Ed25519SigningKey::generate(&mut *rng);
                Ok(KeyMaterial {
                    public_encoding: encode_ed25519_public(&signing),
                    private_encoding: format!(
                        "{ED25519_PRIVATE_DER_PREFIX}{}",
                        hex::encode(signing.to_bytes())
                    ),
                })
            }
            KeyAlgorithm::EcdsaSecp256k1 => {
                let signing = EcdsaSigningKey::random(&mut *rng);
                Ok(KeyMaterial {
                    public_encoding: encode_ecdsa_public(&signing),
                    private_encoding: format!(
                        "{ECDSA_PRIVATE_DER_PREFIX}{}",
                        hex::encode(signing.to_bytes())
                    ),
                })
            }
        }
    }

    async fn derive_public(
        &self,
        private_encoding: &str,
        algorithm: KeyAlgorithm,
    ) -> Result<String, KeygenError> {
        match algorithm {
            KeyAlgorithm::Ed25519 => {
                let signing = decode_ed25519_private(private_encoding)?;
                Ok(encode_ed25519_public(&signing))
            }
            KeyAlgorithm::EcdsaSecp256k1 => {
                let signing = decode_ecdsa_private(private_encoding)?;
                Ok(encode_ecdsa_public(&signing))
            }
        }
    }

    async fn derive_evm_address(&self, private_encoding: &str) -> Result<String, KeygenError> {
        let signing = decode_ecdsa_private(private_encoding)?;
        let point = signing.verifying_key().to_encoded_point(false);
        // Keccak-256 of the uncompressed point without its 0x04 tag byte;
        // the address is the final 20 bytes.
        let digest = Keccak256::digest(&point.as_bytes()[1..]);
        Ok(hex::encode(&digest[digest.len() - 20..]))
    }
}

fn encode_ed25519_public(signing: &Ed25519SigningKey) -> String {
    format!(
        "{ED25519_PUBLIC_DER_PREFIX}{}",
        hex::encode(signing.verifying_key().to_bytes())
    )
}

fn encode_ecdsa_public(signing: &EcdsaSigningKey) -> String {
    let compressed = signing.verifying_key().to_encoded_point(true);
    format!(
        "{ECDSA_PUBLIC_DER_PREFIX}{}",
        hex::encode(compressed.as_bytes())
    )
}

fn strip_prefix<'a>(encoding: &'a str, prefix: &str) -> &'a str {
    encoding.strip_prefix(prefix).unwrap_or(encoding)
}

fn decode_raw_32(encoding: &str, prefix: &str) -> Result<[u8; 32], KeygenError> {
    let raw = hex::decode(strip_prefix(encoding, prefix))
        .map_err(|e| KeygenError::invalid_encoding(e.to_string()))?;
    raw.try_into()
        .map_err(|_| KeygenError::invalid_encoding("private key must be 32 bytes"))
}

fn decode_ed25519_private(encoding: &str) -> Result<Ed25519SigningKey, KeygenError> {
    let raw = decode_raw_32(encoding, ED25519_PRIVATE_DER_PREFIX)?;
    Ok(Ed25519SigningKey::from_bytes(&raw))
}

fn decode_ecdsa_private(encoding: &str) -> Result<EcdsaSigningKey, KeygenError> {
    let raw = decode_raw_32(encoding, ECDSA_PRIVATE_DER_PREFIX)?;
    EcdsaSigningKey::from_slice(&raw).map_err(|e| KeygenError::invalid_encoding(e.to_string()))
}

/// [`Keygen`] wrapper that counts calls to the underlying primitive.
///
/// Used to prove fail-fast properties: structurally invalid specs must be
/// rejected before any key material is requested.
pub struct InstrumentedKeygen<G> {
    inner: G,
    calls: AtomicUsize,
}

impl<G> InstrumentedKeygen<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Total calls across all three operations.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<G: Keygen> Keygen for InstrumentedKeygen<G> {
    async fn generate(&self, algorithm: KeyAlgorithm) -> Result<KeyMaterial, KeygenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.generate(algorithm).await
    }

    async fn derive_public(
        &self,
        private_encoding: &str,
        algorithm: KeyAlgorithm,
    ) -> Result<String, KeygenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.derive_public(private_encoding, algorithm).await
    }

    async fn derive_evm_address(&self, private_encoding: &str) -> Result<String, KeygenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.derive_evm_address(private_encoding).await
    }
}
