//! Runtime: boot gate and island attachment.
//!
//! Boot performs the one fatal capability check: a host that cannot
//! bind lifecycle hooks to elements at all gets a single logged line
//! and no runtime. Everything after that is per-island: scan a
//! pre-rendered document for islands, attach each, let its conditions
//! decide when it reveals.

use std::sync::Arc;

use crate::config::HydrateConfig;
use crate::dom::parse::{MarkupError, find_islands};
use crate::host::SharedHost;
use crate::island::Island;
use crate::registry::ReadinessRegistry;
use crate::{log, logger};

/// Deferred-hydration runtime for one host environment.
#[derive(Clone)]
pub struct Runtime {
    host: SharedHost,
    registry: ReadinessRegistry,
    config: HydrateConfig,
}

impl Runtime {
    /// Boot against a host environment.
    ///
    /// Returns `None` when the host lacks element registration: the
    /// whole mechanism is inert then. One logged line, no panic, no
    /// partial functionality.
    pub fn boot(host: SharedHost, config: HydrateConfig) -> Option<Self> {
        if !host.capabilities().element_registration {
            log!("hydrate"; "element registration unsupported in this host; islands stay inert");
            return None;
        }
        logger::set_verbose(config.verbose);
        Some(Self {
            host,
            registry: ReadinessRegistry::standard(),
            config,
        })
    }

    /// Replace the condition registry (tests, host-specific sets).
    pub fn with_registry(mut self, registry: ReadinessRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &HydrateConfig {
        &self.config
    }

    /// Find every island in a pre-rendered document, in document
    /// order.
    pub fn scan(&self, html: &str) -> Result<Vec<Island>, MarkupError> {
        let elements = find_islands(html, &self.config.prefix)?;
        Ok(elements.into_iter().map(Island::new).collect())
    }

    /// Attach one island and wait for it to reveal.
    ///
    /// Does not return until every declared condition has settled;
    /// an unsatisfiable condition suspends forever.
    pub async fn attach(&self, island: &mut Island) {
        island
            .hydrate(&self.host, &self.registry, &self.config)
            .await;
    }

    /// Attach an island as its own task, the way a document drives
    /// each inserted element independently. The island is handed back
    /// once revealed.
    pub fn spawn_attach(&self, mut island: Island) -> tokio::task::JoinHandle<Island> {
        let runtime = self.clone();
        tokio::spawn(async move {
            runtime.attach(&mut island).await;
            island
        })
    }

    /// Access the shared host handle.
    pub fn host(&self) -> &SharedHost {
        &self.host
    }
}

/// Convenience boot with default configuration.
pub fn boot(host: impl crate::host::HostEnv + 'static) -> Option<Runtime> {
    Runtime::boot(Arc::new(host), HydrateConfig::default())
}

// ============================================================================
// Tests
// ============================================================================
