//! Replicated-state verification
//!
//! Composition of the two read paths with the poll loop: the consensus
//! snapshot is fetched exactly once (authoritative by definition), then the
//! mirror is polled with the caller's comparison until it agrees or a
//! budget runs out.

use tokio::time::Instant;

use crate::query::{ConsensusQuery, MirrorQuery};
use crate::verifier::{ConsistencyVerifier, PollError, VerifyError};

/// Verify that `check` holds between the consensus snapshot of `id` and its
/// eventually-consistent replica.
///
/// Query failures on either path are classified as transport errors; a
/// consensus failure is terminal immediately since that path is single-shot.
pub async fn verify_replicated<C, M, F, E>(
    verifier: &ConsistencyVerifier,
    consensus: &C,
    mirror: &M,
    id: &str,
    deadline: Option<Instant>,
    check: F,
) -> Result<(), VerifyError<E>>
where
    C: ConsensusQuery,
    M: MirrorQuery,
    C::Error: Into<E>,
    M::Error: Into<E>,
    F: Fn(&C::Snapshot, &M::Snapshot) -> Result<(), E>,
    E: std::fmt::Display,
{
    let info = consensus
        .get_entity_info(id)
        .await
        .map_err(|e| VerifyError::TransportExhausted {
            attempts: 1,
            last_error: e.into(),
        })?;

    verifier
        .verify_until(deadline, || {
            let info = &info;
            let check = &check;
            async move {
                match mirror.get_entity_data(id).await {
                    Ok(data) => check(info, &data).map_err(PollError::Mismatch),
                    Err(e) => Err(PollError::Transport(e.into())),
                }
            }
        })
        .await
}
