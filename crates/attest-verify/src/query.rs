//! Read-path interfaces
//!
//! The two replicated read paths of the system under test, as async traits.
//! Snapshot shapes are the caller's business; this crate only needs to fetch
//! them and hand them to an assertion.

use async_trait::async_trait;

/// The authoritative, strongly-consistent read path.
///
/// Reflects the most recently accepted write at query time, so one fetch per
/// logical check suffices; it is never polled.
#[async_trait]
pub trait ConsensusQuery: Send + Sync {
    type Snapshot: Send;
    type Error: Send;

    /// Fetch the entity snapshot.
    async fn get_entity_info(&self, id: &str) -> Result<Self::Snapshot, Self::Error>;
}

/// The lagging, eventually-consistent read path.
///
/// May trail the consensus source by an unbounded but practically short
/// replication delay; fetched fresh on every poll attempt.
#[async_trait]
pub trait MirrorQuery: Send + Sync {
    type Snapshot: Send;
    type Error: Send;

    /// Fetch the entity snapshot as currently replicated.
    async fn get_entity_data(&self, id: &str) -> Result<Self::Snapshot, Self::Error>;
}
