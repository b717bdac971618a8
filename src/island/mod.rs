//! Deferred island: the three-state hydration machine.
//!
//! ```text
//! Unattached --attach--> Hydrating --all conditions settled--> Revealed
//! ```
//!
//! An island wraps one pre-rendered element whose placeholder children
//! are withheld from the live tree. Attaching scans the element's
//! condition attributes, resolves each through the readiness registry,
//! awaits all of them (logical AND over the set; the empty set is
//! vacuously satisfied) and then performs the one-time placeholder
//! splice. Revealed is terminal: a second attach finds no placeholders
//! and changes nothing.

pub mod condition;

use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::config::HydrateConfig;
use crate::dom::Element;
use crate::host::{IslandId, SharedHost};
use crate::pending::Pending;
use crate::registry::{ReadinessRegistry, ResolveCx};
use crate::{debug, log};

/// Island id allocator.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// IslandState
// ============================================================================

/// Hydration lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IslandState {
    /// Not yet inserted into a live document.
    Unattached,
    /// Attached; waiting for declared conditions to settle.
    Hydrating,
    /// Placeholders spliced into the live tree. Terminal.
    Revealed,
}

// ============================================================================
// Island
// ============================================================================

/// One deferred-hydration region.
pub struct Island {
    id: IslandId,
    state: IslandState,
    element: Element,
}

impl Island {
    /// Wrap a pre-rendered element.
    pub fn new(element: Element) -> Self {
        Self {
            id: IslandId(NEXT_ID.fetch_add(1, Ordering::Relaxed)),
            state: IslandState::Unattached,
            element,
        }
    }

    pub fn id(&self) -> IslandId {
        self.id
    }

    pub fn state(&self) -> IslandState {
        self.state
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Take the element back out (e.g. to render the document).
    pub fn into_element(self) -> Element {
        self.element
    }

    /// Attach the island: resolve declared conditions, await them all,
    /// then reveal.
    ///
    /// Suspends at each pending operation; a never-settling condition
    /// leaves the island in `Hydrating` permanently (no timeout, no
    /// retry). Conditions the registry does not know are skipped,
    /// silently unless strict diagnostics are configured.
    pub async fn hydrate(
        &mut self,
        host: &SharedHost,
        registry: &ReadinessRegistry,
        config: &HydrateConfig,
    ) {
        if self.state == IslandState::Revealed {
            return;
        }
        self.state = IslandState::Hydrating;

        let conditions = condition::scan_conditions(&self.element, &config.prefix);
        let mut pending: SmallVec<[Pending; 2]> = SmallVec::new();
        for (name, arg) in &conditions {
            let cx = ResolveCx {
                host,
                arg,
                island: self.id,
            };
            match registry.resolve(name, &cx) {
                Some(op) => pending.push(op),
                None if config.strict_conditions => {
                    log!("hydrate"; "{}: unknown condition `{}` skipped", self.id, name);
                }
                None => {}
            }
        }

        // Logical AND over the set; order does not matter since every
        // operation must settle before the splice.
        for op in pending {
            op.settled().await;
        }

        self.reveal();
    }

    /// One-time placeholder splice. Idempotent once revealed.
    pub fn reveal(&mut self) {
        let revealed = self.element.reveal_placeholders();
        self.state = IslandState::Revealed;
        if revealed > 0 {
            debug!("hydrate"; "{}: revealed {} placeholder(s)", self.id, revealed);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
