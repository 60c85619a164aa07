//! Cycle context: deadline and cancellation for one scheduling cycle.
//!
//! The host bounds every cycle with a deadline and may abort it early (for
//! example when the requester is deleted mid-cycle). Plugins that wait on
//! anything external must honor both.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Deadline and cancellation signal shared by every phase of a cycle.
#[derive(Debug, Clone)]
pub struct CycleContext {
    deadline: Option<Instant>,
    cancel: watch::Receiver<bool>,
}

/// Host-side handle that aborts a cycle.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl CycleContext {
    /// A context with no deadline that is never cancelled.
    pub fn background() -> Self {
        let (_, rx) = watch::channel(false);
        Self {
            deadline: None,
            cancel: rx,
        }
    }

    /// A cancellable context, optionally bounded by `timeout` from now.
    ///
    /// A timeout too far out to represent as an instant leaves the cycle
    /// unbounded.
    pub fn new(timeout: Option<Duration>) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            deadline: timeout.and_then(|t| Instant::now().checked_add(t)),
            cancel: rx,
        };
        (ctx, CancelHandle { tx })
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Clamp `budget` so it never runs past the cycle deadline.
    pub fn bound(&self, budget: Duration) -> Duration {
        match self.remaining() {
            Some(left) => budget.min(left),
            None => budget,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Resolve once the cycle is cancelled. Never resolves if the host
    /// dropped its [`CancelHandle`] without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.cancel.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
