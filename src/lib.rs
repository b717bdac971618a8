//! atoll - deferred-hydration runtime for island markup.
//!
//! A build pipeline (external to this crate) renders pages whose
//! interactive regions are emitted inert: an element carrying
//! `client:*` condition attributes, its withheld content wrapped in
//! `<template>` placeholders. atoll decides *when* that content joins
//! the live tree - it never fetches or transforms content.
//!
//! # Architecture
//!
//! ```text
//! document --scan--> Island --attach--> ReadinessRegistry --resolve--> Pending
//!                      |                                                  |
//!                      +-------- await all, then reveal <-----------------+
//! ```
//!
//! - [`dom`] - owned element model, island scan, HTML render
//! - [`host`] - injected capability provider ([`host::HostEnv`]) and
//!   the scriptable [`host::fake::FakeHost`]
//! - [`pending`] - cancellable pending-operation handles
//! - [`registry`] - condition name → readiness signal (`idle`,
//!   `visible`, `media`)
//! - [`island`] - the Unattached → Hydrating → Revealed state machine
//! - [`runtime`] - boot gate and attachment entry points
//! - [`config`] - the `[hydrate]` TOML section
//!
//! # Example
//!
//! ```ignore
//! let runtime = Runtime::boot(host, HydrateConfig::default())?;
//! for island in runtime.scan(&page_html)? {
//!     runtime.spawn_attach(island);
//! }
//! ```

pub mod config;
pub mod dom;
pub mod host;
pub mod island;
pub mod logger;
pub mod pending;
pub mod registry;
pub mod runtime;

pub use config::{ConfigError, HydrateConfig};
pub use dom::parse::MarkupError;
pub use dom::{Element, Node};
pub use host::{Capabilities, HostEnv, IslandId, MediaSubscription, SharedHost};
pub use island::{Island, IslandState};
pub use pending::{ObserverGuard, Pending};
pub use registry::{ReadinessRegistry, ResolveCx};
pub use runtime::Runtime;
