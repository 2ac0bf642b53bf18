//! Owning context for state holders.
//!
//! A [`Scope`] stands in for the lifetime of a screen or session. Holders
//! receive a [`ScopeHandle`] at construction and check it before every commit
//! and observer notification. Closing the scope (explicitly or by dropping the
//! [`Scope`]) aborts in-flight guarded operations and ends observer streams.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

struct ScopeInner {
    closed: AtomicBool,
    active_operations: AtomicUsize,
    notify: Notify,
}

/// Owner of a lifetime. Dropping it closes the scope.
pub struct Scope {
    inner: Arc<ScopeInner>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                closed: AtomicBool::new(false),
                active_operations: AtomicUsize::new(0),
                notify: Notify::new(),
            }),
        }
    }

    /// Create a handle for sharing with holders and tasks.
    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn close(&self) {
        self.handle().close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Wait until in-flight guarded operations finish, up to `timeout`.
    ///
    /// Returns `true` when no operation is left running.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.handle().drain(timeout).await
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.close();
    }
}

/// Lightweight handle for checking and awaiting the end of a scope.
#[derive(Clone)]
pub struct ScopeHandle {
    inner: Arc<ScopeInner>,
}

impl ScopeHandle {
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// End the scope. Idempotent.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!(
                active_operations = self.active_operations(),
                "scope closed"
            );
            self.inner.notify.notify_waiters();
        }
    }

    /// Resolve once the scope is closed.
    pub async fn closed(&self) {
        // Register with Notify before checking the flag: a close() landing
        // between the check and the await would otherwise be missed.
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_closed() {
            return;
        }
        notified.await;
    }

    /// Number of guarded operations currently running in this scope.
    pub fn active_operations(&self) -> usize {
        self.inner.active_operations.load(Ordering::SeqCst)
    }

    pub async fn drain(&self, timeout: Duration) -> bool {
        let start = tokio::time::Instant::now();

        while start.elapsed() < timeout {
            if self.active_operations() == 0 {
                tracing::debug!("scope drained");
                return true;
            }
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }

        let remaining = self.active_operations();
        if remaining == 0 {
            return true;
        }
        tracing::warn!(remaining, "scope drain timed out");
        false
    }

    pub(crate) fn track_operation(&self) -> OperationTicket {
        self.inner.active_operations.fetch_add(1, Ordering::SeqCst);
        OperationTicket {
            scope: self.clone(),
        }
    }
}

/// Counts one running guarded operation until dropped.
pub(crate) struct OperationTicket {
    scope: ScopeHandle,
}

impl Drop for OperationTicket {
    fn drop(&mut self) {
        self.scope
            .inner
            .active_operations
            .fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_scope_is_open() {
        let scope = Scope::new();
        assert!(!scope.is_closed());
        assert!(!scope.handle().is_closed());
    }

    #[test]
    fn close_is_visible_through_handles() {
        let scope = Scope::new();
        let handle = scope.handle();
        scope.close();
        assert!(handle.is_closed());
        // second close is a no-op
        handle.close();
        assert!(scope.is_closed());
    }

    #[test]
    fn dropping_scope_closes_handles() {
        let scope = Scope::new();
        let handle = scope.handle();
        drop(scope);
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn closed_resolves_after_close() {
        let scope = Scope::new();
        let handle = scope.handle();
        let waiter = tokio::spawn(async move { handle.closed().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        scope.close();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("closed() did not resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn closed_resolves_immediately_when_already_closed() {
        let scope = Scope::new();
        scope.close();
        tokio::time::timeout(Duration::from_millis(100), scope.handle().closed())
            .await
            .expect("closed() should not wait");
    }

    #[tokio::test]
    async fn drain_completes_immediately_when_idle() {
        let scope = Scope::new();
        let start = std::time::Instant::now();
        assert!(scope.drain(Duration::from_secs(1)).await);
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn drain_times_out_with_running_operation() {
        let scope = Scope::new();
        let ticket = scope.handle().track_operation();
        assert_eq!(scope.handle().active_operations(), 1);

        let start = std::time::Instant::now();
        assert!(!scope.drain(Duration::from_millis(50)).await);
        assert!(start.elapsed() >= Duration::from_millis(45));

        drop(ticket);
        assert_eq!(scope.handle().active_operations(), 0);
    }
}
