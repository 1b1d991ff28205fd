//! # Cancellation and Deadlines
//!
//! Root shutdown signal (a `watch` channel, as the node runtime uses for its
//! handlers) and the deadline-bound scope every slot's work runs in.
//!
//! Cancellation flows top-down: the runtime owns the [`ShutdownHandle`],
//! every component holds a cloned [`Shutdown`], and each slot iteration wraps
//! it in a [`SlotScope`] together with the slot deadline.

use crate::primitives::Slot;
use std::future::Future;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

/// Create a linked shutdown handle and signal.
pub fn shutdown_channel() -> (ShutdownHandle, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, Shutdown { rx })
}

/// Owner side of the root cancellation signal.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Signal every [`Shutdown`] derived from this handle.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Another receiver for the same signal.
    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Receiver side of the root cancellation signal.
///
/// Dropping the [`ShutdownHandle`] counts as cancellation.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// True once shutdown has been signalled.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolve once shutdown has been signalled.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Why scoped work stopped before it finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScopeExit {
    /// The slot deadline passed.
    #[error("slot deadline exceeded")]
    Deadline,

    /// The root context was cancelled.
    #[error("shutdown requested")]
    Shutdown,
}

/// Deadline-bound scope for all work belonging to one slot.
///
/// The deadline is soft: work observes it at its own suspension points and
/// aborts, it is never killed from outside.
#[derive(Debug, Clone)]
pub struct SlotScope {
    slot: Slot,
    deadline: Instant,
    shutdown: Shutdown,
}

impl SlotScope {
    pub fn new(slot: Slot, deadline: Instant, shutdown: Shutdown) -> Self {
        Self {
            slot,
            deadline,
            shutdown,
        }
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Fail fast if the scope is already over. Shutdown wins over deadline.
    pub fn check(&self) -> Result<(), ScopeExit> {
        if self.shutdown.is_cancelled() {
            return Err(ScopeExit::Shutdown);
        }
        if Instant::now() >= self.deadline {
            return Err(ScopeExit::Deadline);
        }
        Ok(())
    }

    /// Resolve when the deadline passes or shutdown is signalled.
    pub async fn expired(&mut self) -> ScopeExit {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => ScopeExit::Shutdown,
            _ = tokio::time::sleep_until(self.deadline) => ScopeExit::Deadline,
        }
    }

    /// Drive `fut` to completion unless the scope ends first.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, ScopeExit>
    where
        F: Future,
    {
        self.check()?;
        let mut scope = self.clone();
        tokio::select! {
            biased;
            exit = scope.expired() => Err(exit),
            output = fut => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_trigger_observed() {
        let (handle, mut shutdown) = shutdown_channel();
        assert!(!shutdown.is_cancelled());

        handle.trigger();
        assert!(shutdown.is_cancelled());
        tokio::time::timeout(Duration::from_secs(1), shutdown.cancelled())
            .await
            .expect("cancellation must resolve");
    }

    #[tokio::test]
    async fn test_dropped_handle_counts_as_cancellation() {
        let (handle, mut shutdown) = shutdown_channel();
        drop(handle);
        assert!(shutdown.is_cancelled());
        tokio::time::timeout(Duration::from_secs(1), shutdown.cancelled())
            .await
            .expect("cancellation must resolve");
    }

    #[tokio::test(start_paused = true)]
    async fn test_scope_deadline() {
        let (_handle, shutdown) = shutdown_channel();
        let deadline = Instant::now() + Duration::from_secs(12);
        let mut scope = SlotScope::new(1, deadline, shutdown);

        assert!(scope.check().is_ok());
        assert_eq!(scope.expired().await, ScopeExit::Deadline);
        assert_eq!(scope.check(), Err(ScopeExit::Deadline));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scope_run_aborts_slow_work() {
        let (_handle, shutdown) = shutdown_channel();
        let scope = SlotScope::new(1, Instant::now() + Duration::from_secs(1), shutdown);

        let slow = tokio::time::sleep(Duration::from_secs(5));
        assert_eq!(scope.run(slow).await, Err(ScopeExit::Deadline));

        let scope = SlotScope::new(
            2,
            Instant::now() + Duration::from_secs(1),
            scope.shutdown.clone(),
        );
        assert_eq!(scope.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scope_shutdown_wins() {
        let (handle, shutdown) = shutdown_channel();
        let scope = SlotScope::new(1, Instant::now() + Duration::from_secs(60), shutdown);

        let pending = std::future::pending::<()>();
        let run = scope.run(pending);
        handle.trigger();
        assert_eq!(run.await, Err(ScopeExit::Shutdown));
        assert_eq!(scope.check(), Err(ScopeExit::Shutdown));
    }
}
