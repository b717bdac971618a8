//! Fake host environment for tests.
//!
//! Every signal the real host would deliver (`load`, idle slots,
//! intersections, media transitions) is fired by hand from test code.
//! The fake also keeps observer accounting so tests can assert that
//! observation handles are released exactly once.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::oneshot;

use super::{Capabilities, HostEnv, IslandId, MediaSubscription};
use crate::pending::{ObserverGuard, Pending};

#[derive(Default)]
struct MediaState {
    matches: bool,
    waiters: Vec<oneshot::Sender<()>>,
}

#[derive(Default)]
struct State {
    loaded: bool,
    idle: bool,
    load_waiters: Vec<oneshot::Sender<()>>,
    idle_waiters: Vec<oneshot::Sender<()>>,
    visibility_waiters: FxHashMap<IslandId, Vec<oneshot::Sender<()>>>,
    media: FxHashMap<String, MediaState>,
    observers_active: usize,
    observers_released: usize,
}

/// Scriptable [`HostEnv`] implementation.
///
/// Clones share state, so a test can hand one clone to the runtime and
/// keep another to fire signals with.
#[derive(Clone)]
pub struct FakeHost {
    caps: Capabilities,
    state: Arc<Mutex<State>>,
}

impl FakeHost {
    /// Full-capability host; document not yet loaded.
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::full())
    }

    /// Host with a specific capability set.
    pub fn with_capabilities(caps: Capabilities) -> Self {
        Self {
            caps,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Mark the document fully loaded and wake load waiters.
    pub fn fire_load(&self) {
        let mut state = self.state.lock();
        state.loaded = true;
        for tx in state.load_waiters.drain(..) {
            let _ = tx.send(());
        }
    }

    /// Report the host as idle: wakes idle waiters and satisfies
    /// later idle requests too (idle periods recur, they cannot be
    /// "missed" the way a one-shot event could).
    pub fn fire_idle(&self) {
        let mut state = self.state.lock();
        state.idle = true;
        for tx in state.idle_waiters.drain(..) {
            let _ = tx.send(());
        }
    }

    /// Report the island as intersecting the viewport.
    pub fn fire_intersection(&self, island: IslandId) {
        let mut state = self.state.lock();
        if let Some(waiters) = state.visibility_waiters.get_mut(&island) {
            for tx in waiters.drain(..) {
                let _ = tx.send(());
            }
        }
    }

    /// Set a query's match state. A transition to matching wakes that
    /// query's waiters.
    pub fn set_media_matches(&self, query: &str, matches: bool) {
        let mut state = self.state.lock();
        let entry = state.media.entry(query.to_string()).or_default();
        let was = entry.matches;
        entry.matches = matches;
        if matches && !was {
            for tx in entry.waiters.drain(..) {
                let _ = tx.send(());
            }
        }
    }

    /// Observers currently registered and not yet released.
    pub fn active_observers(&self) -> usize {
        self.state.lock().observers_active
    }

    /// Observers released so far.
    pub fn released_observers(&self) -> usize {
        self.state.lock().observers_released
    }

    fn observer_guard(&self) -> ObserverGuard {
        let mut state = self.state.lock();
        state.observers_active += 1;
        drop(state);

        let shared = Arc::clone(&self.state);
        ObserverGuard::new(move || {
            let mut state = shared.lock();
            state.observers_active -= 1;
            state.observers_released += 1;
        })
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnv for FakeHost {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn document_loaded(&self) -> Pending {
        let mut state = self.state.lock();
        if state.loaded {
            return Pending::ready();
        }
        let (tx, rx) = oneshot::channel();
        state.load_waiters.push(tx);
        Pending::from_signal(rx)
    }

    fn request_idle(&self) -> Pending {
        let mut state = self.state.lock();
        if state.idle {
            return Pending::ready();
        }
        let (tx, rx) = oneshot::channel();
        state.idle_waiters.push(tx);
        Pending::from_signal(rx)
    }

    fn observe_visibility(&self, island: IslandId) -> Pending {
        let (tx, rx) = oneshot::channel();
        self.state
            .lock()
            .visibility_waiters
            .entry(island)
            .or_default()
            .push(tx);
        Pending::from_signal_with_guard(rx, self.observer_guard())
    }

    fn watch_media(&self, query: &str) -> MediaSubscription {
        let (tx, rx) = oneshot::channel();
        let mut state = self.state.lock();
        let matches_now = {
            let entry = state.media.entry(query.to_string()).or_default();
            entry.waiters.push(tx);
            entry.matches
        };
        drop(state);

        MediaSubscription {
            matches_now,
            changed: Pending::from_signal_with_guard(rx, self.observer_guard()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_load_already_fired_is_ready() {
        let host = FakeHost::new();
        host.fire_load();
        assert!(host.document_loaded().is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_intersection_targets_one_island() {
        let host = FakeHost::new();
        let a = host.observe_visibility(IslandId(1));
        let b = host.observe_visibility(IslandId(2));

        host.fire_intersection(IslandId(1));
        timeout(Duration::from_secs(1), a.settled())
            .await
            .expect("island 1 should settle");
        assert!(
            timeout(Duration::from_secs(1), b.settled()).await.is_err(),
            "island 2 must not settle"
        );
    }

    #[tokio::test]
    async fn test_observer_accounting() {
        let host = FakeHost::new();
        let p = host.observe_visibility(IslandId(7));
        assert_eq!(host.active_observers(), 1);

        host.fire_intersection(IslandId(7));
        p.settled().await;
        assert_eq!(host.active_observers(), 0);
        assert_eq!(host.released_observers(), 1);
    }

    #[tokio::test]
    async fn test_media_transition_wakes_waiters() {
        let host = FakeHost::new();
        let sub = host.watch_media("(max-width: 400px)");
        assert!(!sub.matches_now);

        host.set_media_matches("(max-width: 400px)", true);
        sub.changed.settled().await;
    }
}
