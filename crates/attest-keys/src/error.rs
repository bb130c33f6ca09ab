//! Error types for topology construction.

/// A structurally invalid topology spec.
///
/// Raised synchronously, before any external key-generation call, and never
/// retried: it indicates a broken fixture, not a system-under-test failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// `keyList` or `thresholdKey` with no children.
    #[error("key list must contain at least one key")]
    EmptyKeyList,

    /// Threshold outside `1..=children`.
    #[error("threshold {threshold} out of range for {children} keys")]
    ThresholdOutOfRange { threshold: usize, children: usize },

    /// The descriptor could not be understood (unrecognized type tag or
    /// malformed structure).
    #[error("malformed key spec: {reason}")]
    Malformed { reason: String },
}

impl SpecError {
    /// Create a malformed-spec error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// Failure of the external key-generation primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeygenError {
    /// A supplied private encoding could not be decoded.
    #[error("invalid key encoding: {reason}")]
    InvalidEncoding { reason: String },

    /// The primitive itself failed.
    #[error("key generation failed: {reason}")]
    Failed { reason: String },
}

impl KeygenError {
    /// Create an invalid-encoding error.
    pub fn invalid_encoding(reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            reason: reason.into(),
        }
    }

    /// Create a generation-failure error.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

/// Any failure of topology generation.
///
/// `Spec` variants are produced by up-front validation; `Keygen` variants
/// can only occur after the whole spec has validated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Keygen(#[from] KeygenError),
}
