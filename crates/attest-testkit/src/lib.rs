//! Test doubles for the attest verification core
//!
//! Local, in-process implementations of the external capabilities the core
//! consumes: key generation for both signature algorithms (deterministic or
//! OS-seeded), a composite key codec, and scripted consensus/mirror query
//! sources for exercising replication lag and transport faults.

#![forbid(unsafe_code)]

pub mod codec;
pub mod fixtures;
pub mod keygen;
pub mod sources;

pub use codec::WireKeyCodec;
pub use keygen::{InstrumentedKeygen, LocalKeygen};
pub use sources::{BrokenConsensus, FixedConsensus, ScriptedMirror, SourceFailure};

/// Install a fmt subscriber so tests emit verifier logs when `RUST_LOG` is
/// set. Safe to call from every test; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
