//! Readiness registry: condition name → asynchronous readiness signal.
//!
//! A fixed map from condition name to a resolver function. Resolvers
//! never fail; a capability the host lacks degrades to immediate
//! settle (`idle`, `media`) or permanent pending (`visible`) per the
//! condition's policy. Names not present in the map are the caller's
//! problem ([`resolve`](ReadinessRegistry::resolve) returns `None` and
//! the island skips them).

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::host::{IslandId, SharedHost};
use crate::pending::Pending;

// ============================================================================
// Resolvers
// ============================================================================

/// Everything a resolver may consult.
pub struct ResolveCx<'a> {
    pub host: &'a SharedHost,
    /// The condition attribute's string value (may be empty).
    pub arg: &'a str,
    pub island: IslandId,
}

/// A condition resolver. Must not fail; degraded capability maps to a
/// ready or never-settling handle instead.
pub type Resolver = fn(&ResolveCx<'_>) -> Pending;

/// `idle`: the document has fully finished loading, then one idle
/// scheduling slot. Hosts without idle scheduling settle right after
/// the load signal. The argument is ignored.
fn resolve_idle(cx: &ResolveCx<'_>) -> Pending {
    let host = Arc::clone(cx.host);
    Pending::from_future(async move {
        host.document_loaded().settled().await;
        if host.capabilities().idle_scheduling {
            host.request_idle().settled().await;
        }
    })
}

/// `visible`: first viewport intersection of the island. Without
/// intersection observation this never settles (degraded, not an
/// error). The argument is ignored.
fn resolve_visible(cx: &ResolveCx<'_>) -> Pending {
    if !cx.host.capabilities().visibility_observation {
        return Pending::never();
    }
    cx.host.observe_visibility(cx.island)
}

/// `media`: settles when the query matches. Empty query or missing
/// matching capability is treated as already satisfied. A query that
/// already matches at registration settles immediately and releases
/// its subscription; otherwise the first transition to matching
/// settles it.
fn resolve_media(cx: &ResolveCx<'_>) -> Pending {
    if cx.arg.is_empty() || !cx.host.capabilities().media_matching {
        return Pending::ready();
    }
    let sub = cx.host.watch_media(cx.arg);
    if sub.matches_now {
        sub.changed.cancel();
        return Pending::ready();
    }
    sub.changed
}

// ============================================================================
// ReadinessRegistry
// ============================================================================

/// Fixed mapping from condition name to resolver. Stateless beyond
/// the map itself.
#[derive(Clone)]
pub struct ReadinessRegistry {
    map: FxHashMap<&'static str, Resolver>,
}

impl ReadinessRegistry {
    /// The standard condition set: `idle`, `visible`, `media`.
    pub fn standard() -> Self {
        let mut map: FxHashMap<&'static str, Resolver> = FxHashMap::default();
        map.insert("idle", resolve_idle);
        map.insert("visible", resolve_visible);
        map.insert("media", resolve_media);
        Self { map }
    }

    /// An empty registry (every condition becomes a silent skip).
    pub fn empty() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Add or replace a resolver.
    pub fn register(&mut self, name: &'static str, resolver: Resolver) {
        self.map.insert(name, resolver);
    }

    /// True if the condition name is known.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Resolve a condition into its pending operation, or `None` for
    /// an unknown name.
    pub fn resolve(&self, name: &str, cx: &ResolveCx<'_>) -> Option<Pending> {
        self.map.get(name).map(|resolver| resolver(cx))
    }
}

impl Default for ReadinessRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Tests
// ============================================================================
