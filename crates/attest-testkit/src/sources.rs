//! Scripted query sources
//!
//! Doubles for the two read paths. [`ScriptedMirror`] serves a fixed prefix
//! of responses and then a steady state, which is enough to model
//! replication lag ("wrong, wrong, right"), transport faults, and sources
//! that never converge. [`FixedConsensus`] answers every query with the
//! same snapshot, as an authoritative source would within one scenario.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use attest_verify::{ConsensusQuery, MirrorQuery};

/// Query-path failure raised by scripted sources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("query path unavailable: {reason}")]
pub struct SourceFailure {
    pub reason: String,
}

impl SourceFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Eventually-consistent source with a scripted response sequence.
pub struct ScriptedMirror<T> {
    script: Mutex<VecDeque<Result<T, SourceFailure>>>,
    steady: Result<T, SourceFailure>,
}

impl<T: Clone> ScriptedMirror<T> {
    /// Serve `script` responses in order, then `steady` forever.
    pub fn new(
        script: impl IntoIterator<Item = Result<T, SourceFailure>>,
        steady: Result<T, SourceFailure>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            steady,
        }
    }

    /// A mirror that lags: `stale` snapshots for `lag` polls, then `fresh`.
    pub fn lagging(stale: T, fresh: T, lag: usize) -> Self {
        Self::new(std::iter::repeat(Ok(stale)).take(lag), Ok(fresh))
    }

    /// A mirror that serves `snapshot` on every poll: already converged,
    /// or stuck on a stale value, depending on what the test asserts.
    pub fn converged(snapshot: T) -> Self {
        Self::new([], Ok(snapshot))
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> MirrorQuery for ScriptedMirror<T> {
    type Snapshot = T;
    type Error = SourceFailure;

    async fn get_entity_data(&self, _id: &str) -> Result<T, SourceFailure> {
        let mut script = self.script.lock().await;
        match script.pop_front() {
            Some(response) => response,
            None => self.steady.clone(),
        }
    }
}

/// Strongly-consistent source that always fails.
///
/// The consensus path is single-shot, so one failure here is terminal for
/// the whole check.
pub struct BrokenConsensus<T> {
    failure: SourceFailure,
    _snapshot: std::marker::PhantomData<fn() -> T>,
}

impl<T> BrokenConsensus<T> {
    pub fn new(failure: SourceFailure) -> Self {
        Self {
            failure,
            _snapshot: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<T: Send + Sync> ConsensusQuery for BrokenConsensus<T> {
    type Snapshot = T;
    type Error = SourceFailure;

    async fn get_entity_info(&self, _id: &str) -> Result<T, SourceFailure> {
        Err(self.failure.clone())
    }
}

/// Strongly-consistent source returning a fixed snapshot.
pub struct FixedConsensus<T> {
    snapshot: T,
}

impl<T: Clone> FixedConsensus<T> {
    pub fn new(snapshot: T) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> ConsensusQuery for FixedConsensus<T> {
    type Snapshot = T;
    type Error = SourceFailure;

    async fn get_entity_info(&self, _id: &str) -> Result<T, SourceFailure> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_prefix_then_steady_state() {
        let mirror = ScriptedMirror::new(
            [Ok(1), Err(SourceFailure::new("503")), Ok(2)],
            Ok(3),
        );
        assert_eq!(mirror.get_entity_data("0.0.7").await, Ok(1));
        assert_eq!(
            mirror.get_entity_data("0.0.7").await,
            Err(SourceFailure::new("503"))
        );
        assert_eq!(mirror.get_entity_data("0.0.7").await, Ok(2));
        assert_eq!(mirror.get_entity_data("0.0.7").await, Ok(3));
        assert_eq!(mirror.get_entity_data("0.0.7").await, Ok(3));
    }

    #[tokio::test]
    async fn lagging_mirror_converges_after_lag() {
        let mirror = ScriptedMirror::lagging("old", "new", 2);
        assert_eq!(mirror.get_entity_data("x").await, Ok("old"));
        assert_eq!(mirror.get_entity_data("x").await, Ok("old"));
        assert_eq!(mirror.get_entity_data("x").await, Ok("new"));
    }
}
