//! Host environment abstraction.
//!
//! Readiness conditions never touch a real rendering environment
//! directly. Everything capability-shaped goes through [`HostEnv`], an
//! injected provider: document-load state, idle scheduling, visibility
//! observation, media-query matching. Production embeddings implement
//! it against their actual host; tests inject [`fake::FakeHost`] and
//! fire the signals by hand.
//!
//! Optional capabilities are declared up front in [`Capabilities`];
//! callers must check before requesting the corresponding signal. The
//! element-registration capability is special: without it the whole
//! mechanism is inert (see `runtime`).

pub mod fake;

use std::fmt;
use std::sync::Arc;

use crate::pending::Pending;

/// Shared handle to the injected host environment.
pub type SharedHost = Arc<dyn HostEnv>;

// ============================================================================
// IslandId
// ============================================================================

/// Identity of one island instance, used to target host-side
/// observers (visibility observation is per-island).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IslandId(pub u64);

impl fmt::Display for IslandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "island#{}", self.0)
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// What the host environment can do.
///
/// Absence of an optional capability is degraded behavior, never an
/// error; absence of `element_registration` disables hydration
/// entirely.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Can the host bind lifecycle hooks to island elements at all?
    /// Required; fatal when missing.
    pub element_registration: bool,
    /// Idle-slot scheduling (optional).
    pub idle_scheduling: bool,
    /// Viewport intersection observation (optional).
    pub visibility_observation: bool,
    /// Media-query matching (optional).
    pub media_matching: bool,
}

impl Capabilities {
    /// Everything supported.
    pub const fn full() -> Self {
        Self {
            element_registration: true,
            idle_scheduling: true,
            visibility_observation: true,
            media_matching: true,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::full()
    }
}

// ============================================================================
// HostEnv
// ============================================================================

/// A media-query watch registration.
pub struct MediaSubscription {
    /// Whether the query matches at registration time.
    pub matches_now: bool,
    /// Settles the first time the query transitions to matching.
    pub changed: Pending,
}

/// Injected capability provider.
///
/// Contract: none of these methods fail. A signal whose backing
/// capability was reported absent in [`capabilities`](Self::capabilities)
/// is simply never requested by the registry.
pub trait HostEnv: Send + Sync {
    /// Declared capability set. Stable for the life of the host.
    fn capabilities(&self) -> Capabilities;

    /// Settles once the document has fully finished loading all
    /// resources; ready immediately if it already has.
    fn document_loaded(&self) -> Pending;

    /// Settles at the next idle scheduling slot.
    ///
    /// Only requested when `capabilities().idle_scheduling` is true.
    fn request_idle(&self) -> Pending;

    /// Settles when the island's bounding box first intersects the
    /// viewport. The returned handle's guard must release the
    /// underlying observer.
    ///
    /// Only requested when `capabilities().visibility_observation`.
    fn observe_visibility(&self, island: IslandId) -> Pending;

    /// Watch a media query. Reports the current match state and a
    /// handle that settles on the first transition to matching.
    ///
    /// Only requested when `capabilities().media_matching` and the
    /// query string is non-empty.
    fn watch_media(&self, query: &str) -> MediaSubscription;
}
