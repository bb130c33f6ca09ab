//! Bounded polling against an eventually-consistent source
//!
//! The verifier runs a caller-supplied assertion until it passes, the
//! mismatch budget runs out, the transport budget runs out, or the deadline
//! arrives. The two failure channels are deliberately separate: a flaky
//! network must not eat the attempts reserved for genuine replication lag,
//! and a real mismatch must not be hidden behind transport backoff.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// One poll attempt's failure, classified by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError<E> {
    /// The assertion ran and the observed state did not match.
    #[error("assertion failed: {0}")]
    Mismatch(E),

    /// A query client failed to respond; the observed state is unknown.
    #[error("transport failure: {0}")]
    Transport(E),
}

/// Terminal verification failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError<E> {
    /// The mismatch budget ran out. `last_error` is the exact error the
    /// assertion raised on the final attempt, never a synthesized timeout.
    #[error("consistency check exhausted after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: E },

    /// The transport budget ran out.
    #[error("transport retries exhausted after {attempts} attempts: {last_error}")]
    TransportExhausted { attempts: u32, last_error: E },

    /// The deadline arrived before the check settled.
    #[error("verification deadline exceeded")]
    DeadlineExceeded,
}

impl<E> VerifyError<E> {
    /// The underlying error from the final attempt, if any.
    pub fn last_error(&self) -> Option<&E> {
        match self {
            VerifyError::Exhausted { last_error, .. }
            | VerifyError::TransportExhausted { last_error, .. } => Some(last_error),
            VerifyError::DeadlineExceeded => None,
        }
    }
}

/// Poll budget for assertion mismatches: fixed, non-exponential delay, so
/// the total wall-clock bound is predictable (`max_attempts * delay`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum assertion executions (>= 1).
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        // Suite-wide budget: bounded attempts with sub-second delay keeps
        // the total wait inside the enclosing scenario deadline.
        Self {
            max_attempts: 10,
            delay: Duration::from_millis(500),
        }
    }
}

/// Retry budget for transport failures: bounded exponential backoff,
/// independent of the mismatch budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportRetryConfig {
    /// Maximum failed transport attempts (>= 1).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Cap on the backed-off delay.
    pub max_delay: Duration,
}

impl TransportRetryConfig {
    fn delay_for(&self, retry: u32) -> Duration {
        let multiplier = 2u32.saturating_pow(retry);
        self.base_delay
            .saturating_mul(multiplier)
            .min(self.max_delay)
    }
}

impl Default for TransportRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

/// Polls an assertion against an eventually-consistent source.
///
/// State machine: Idle -> Polling -> {Succeeded | Exhausted}; success
/// returns immediately with no trailing delay.
#[derive(Debug, Clone, Default)]
pub struct ConsistencyVerifier {
    retry: RetryConfig,
    transport: TransportRetryConfig,
}

impl ConsistencyVerifier {
    /// Verifier with the suite-wide default budgets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the mismatch poll budget.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the transport retry budget.
    pub fn with_transport_retry(mut self, transport: TransportRetryConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Run `assertion` until it passes or a budget runs out.
    pub async fn verify<F, Fut, E>(&self, assertion: F) -> Result<(), VerifyError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), PollError<E>>>,
        E: std::fmt::Display,
    {
        self.verify_until(None, assertion).await
    }

    /// Run `assertion` until it passes, a budget runs out, or `deadline`
    /// arrives.
    ///
    /// The deadline is cooperative: the loop refuses to start an attempt
    /// past the deadline or a sleep that would overrun it, rather than
    /// relying on an outer harness to kill the scenario.
    pub async fn verify_until<F, Fut, E>(
        &self,
        deadline: Option<Instant>,
        mut assertion: F,
    ) -> Result<(), VerifyError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), PollError<E>>>,
        E: std::fmt::Display,
    {
        let mut mismatches = 0u32;
        let mut transport_failures = 0u32;

        loop {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(VerifyError::DeadlineExceeded);
                }
            }

            match assertion().await {
                Ok(()) => {
                    tracing::debug!(
                        attempts = mismatches + 1,
                        "consistency check passed"
                    );
                    return Ok(());
                }
                Err(PollError::Mismatch(error)) => {
                    mismatches += 1;
                    if mismatches >= self.retry.max_attempts {
                        tracing::warn!(
                            attempts = mismatches,
                            %error,
                            "consistency check exhausted"
                        );
                        return Err(VerifyError::Exhausted {
                            attempts: mismatches,
                            last_error: error,
                        });
                    }
                    tracing::debug!(attempt = mismatches, %error, "state not yet replicated");
                    self.sleep_within(self.retry.delay, deadline).await?;
                }
                Err(PollError::Transport(error)) => {
                    transport_failures += 1;
                    if transport_failures >= self.transport.max_attempts {
                        tracing::warn!(
                            attempts = transport_failures,
                            %error,
                            "transport retries exhausted"
                        );
                        return Err(VerifyError::TransportExhausted {
                            attempts: transport_failures,
                            last_error: error,
                        });
                    }
                    let delay = self.transport.delay_for(transport_failures - 1);
                    tracing::debug!(attempt = transport_failures, %error, ?delay, "transport failure, backing off");
                    self.sleep_within(delay, deadline).await?;
                }
            }
        }
    }

    async fn sleep_within<E>(
        &self,
        delay: Duration,
        deadline: Option<Instant>,
    ) -> Result<(), VerifyError<E>> {
        if let Some(deadline) = deadline {
            if Instant::now() + delay > deadline {
                // The next attempt could not start in time anyway.
                return Err(VerifyError::DeadlineExceeded);
            }
        }
        tokio::time::sleep(delay).await;
        Ok(())
    }
}
