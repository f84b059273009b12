//! Per-call deadlines and cancellation.
//!
//! Every repository operation takes a [`CallContext`]. The repository
//! intersects the caller's remaining budget with its own configured timeout
//! on each call and stops waiting on the store as soon as either runs out or
//! the caller cancels.

use std::{future::Future, time::Duration};

use tokio::time::{Instant, timeout_at};
pub use tokio_util::sync::CancellationToken;

use crate::error::{StoreError, StoreResult};

/// Caller-supplied deadline and cancellation signal for one or more calls.
///
/// The default context has neither, so only the repository's own timeout
/// applies.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

impl CallContext {
    /// A context with no deadline and no cancellation.
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns this context with an absolute deadline.
    ///
    /// If a deadline is already set, the earlier of the two wins.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Returns this context with a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns this context bound to `token`; cancelling the token aborts
    /// calls made with it.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// The deadline for a call allowed to run for at most `budget`:
    /// the earlier of this context's deadline and `now + budget`.
    pub fn bounded_deadline(&self, budget: Duration) -> Instant {
        let own = Instant::now() + budget;
        match self.deadline {
            Some(deadline) => deadline.min(own),
            None => own,
        }
    }

    /// Runs `call` until it completes, the derived deadline passes, or the
    /// context is cancelled.
    ///
    /// An already-expired or already-cancelled context fails without polling
    /// `call`.
    pub async fn run<T, F>(&self, operation: &str, budget: Duration, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        let deadline = self.bounded_deadline(budget);
        let allowed = deadline.saturating_duration_since(Instant::now());

        if self.is_cancelled() {
            return Err(StoreError::Cancelled(operation.to_string()));
        }
        if allowed.is_zero() {
            return Err(StoreError::Timeout(operation.to_string(), allowed));
        }

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(StoreError::Cancelled(operation.to_string())),
            result = timeout_at(deadline, call) => match result {
                Ok(result) => result,
                Err(_) => Err(StoreError::Timeout(operation.to_string(), allowed)),
            },
        }
    }

    async fn cancelled(&self) {
        match &self.cancellation {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }
}
