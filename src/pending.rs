//! Pending-operation handles for readiness conditions.
//!
//! Every readiness condition resolves to a [`Pending`]: an explicit
//! handle for an operation that settles at most once. Handles are
//! cancellable; dropping one releases whatever observer registration
//! backs it, so an island removed from the document does not leave
//! dangling observers behind.
//!
//! A handle is one of:
//! - ready: already satisfied, settles synchronously
//! - never: unsatisfiable in this host (degraded capability)
//! - signal: settles when a host signal fires, with an optional
//!   observer guard released exactly once afterwards
//! - composed: an owned future chaining other handles (the `idle`
//!   condition is load-then-idle)

use std::future::Future;
use std::pin::Pin;

use tokio::sync::oneshot;

// ============================================================================
// ObserverGuard
// ============================================================================

/// Teardown callback for a host-side observer registration.
///
/// Runs exactly once: either explicitly via [`release`](Self::release)
/// after the observed signal fires, or on drop when the pending
/// operation is cancelled before firing.
pub struct ObserverGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ObserverGuard {
    /// Wrap a teardown callback.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Run the teardown now.
    pub fn release(mut self) {
        if let Some(f) = self.release.take() {
            f();
        }
    }
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        if let Some(f) = self.release.take() {
            f();
        }
    }
}

impl std::fmt::Debug for ObserverGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverGuard")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

// ============================================================================
// Pending
// ============================================================================

enum Inner {
    Ready,
    Never,
    Signal {
        rx: oneshot::Receiver<()>,
        guard: Option<ObserverGuard>,
    },
    Composed(Pin<Box<dyn Future<Output = ()> + Send>>),
}

/// A readiness operation that settles at most once.
pub struct Pending {
    inner: Inner,
}

impl Pending {
    /// An already-satisfied condition.
    pub fn ready() -> Self {
        Self { inner: Inner::Ready }
    }

    /// A condition this host can never satisfy.
    ///
    /// Awaiting it suspends forever; the owning island stays in the
    /// Hydrating state. Degraded behavior, not an error.
    pub fn never() -> Self {
        Self { inner: Inner::Never }
    }

    /// A condition settled by a host signal.
    pub fn from_signal(rx: oneshot::Receiver<()>) -> Self {
        Self {
            inner: Inner::Signal { rx, guard: None },
        }
    }

    /// A signal-settled condition with an observer to tear down once
    /// it fires (or once the handle is cancelled).
    pub fn from_signal_with_guard(rx: oneshot::Receiver<()>, guard: ObserverGuard) -> Self {
        Self {
            inner: Inner::Signal {
                rx,
                guard: Some(guard),
            },
        }
    }

    /// A condition composed from an owned future.
    pub fn from_future(fut: impl Future<Output = ()> + Send + 'static) -> Self {
        Self {
            inner: Inner::Composed(Box::pin(fut)),
        }
    }

    /// True if this handle settles synchronously.
    pub fn is_ready(&self) -> bool {
        matches!(self.inner, Inner::Ready)
    }

    /// Wait until the condition is satisfied.
    ///
    /// A signal whose sender was dropped without firing counts as
    /// settled: the host side went away, and the no-exception contract
    /// degrades toward reveal rather than hanging.
    pub async fn settled(self) {
        match self.inner {
            Inner::Ready => {}
            Inner::Never => std::future::pending::<()>().await,
            Inner::Signal { rx, guard } => {
                let _ = rx.await;
                if let Some(guard) = guard {
                    guard.release();
                }
            }
            Inner::Composed(fut) => fut.await,
        }
    }

    /// Cancel the operation, releasing any observer registration.
    pub fn cancel(self) {
        // Drop runs the guard teardown.
    }
}

impl std::fmt::Debug for Pending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.inner {
            Inner::Ready => "ready",
            Inner::Never => "never",
            Inner::Signal { .. } => "signal",
            Inner::Composed(_) => "composed",
        };
        f.debug_tuple("Pending").field(&kind).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_ready_settles_synchronously() {
        let p = Pending::ready();
        assert!(p.is_ready());
        p.settled().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_does_not_settle() {
        let p = Pending::never();
        let out = timeout(Duration::from_secs(60), p.settled()).await;
        assert!(out.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_settles_on_fire() {
        let (tx, rx) = oneshot::channel();
        let p = Pending::from_signal(rx);

        let waiter = tokio::spawn(p.settled());
        tx.send(()).unwrap();
        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("should settle once fired")
            .unwrap();
    }

    #[tokio::test]
    async fn test_guard_released_once_after_fire() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let (tx, rx) = oneshot::channel();
        let p =
            Pending::from_signal_with_guard(rx, ObserverGuard::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        tx.send(()).unwrap();
        p.settled().await;
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_releases_guard() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let (_tx, rx) = oneshot::channel();
        let p =
            Pending::from_signal_with_guard(rx, ObserverGuard::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        p.cancel();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dropped_sender_counts_as_settled() {
        let (tx, rx) = oneshot::channel::<()>();
        drop(tx);
        Pending::from_signal(rx).settled().await;
    }
}
