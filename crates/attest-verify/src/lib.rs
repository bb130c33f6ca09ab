//! Consistency verification
//!
//! Confirms that an observable fact about entity state holds on both read
//! paths of a replicated system: an authoritative, strongly-consistent
//! source checked once, and a lagging, eventually-consistent source polled
//! with bounded retry. Assertion mismatches and transport failures carry
//! separate retry budgets that are never merged, and an explicit deadline
//! can abort the poll loop cooperatively.

#![forbid(unsafe_code)]

pub mod query;
pub mod replicated;
pub mod verifier;

pub use query::{ConsensusQuery, MirrorQuery};
pub use replicated::verify_replicated;
pub use verifier::{
    ConsistencyVerifier, PollError, RetryConfig, TransportRetryConfig, VerifyError,
};
