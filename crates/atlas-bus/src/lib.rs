//! Catalog mutation events for the Atlas cluster.
//!
//! Each service instance holds a private catalog; the cluster converges by
//! broadcasting mutation notifications over a message bus instead of
//! sharing storage. This crate provides:
//!
//! - The event taxonomy ([`CatalogEvent`], [`ChangeKind`], [`AckEvent`]):
//!   origin/destination service ids, the affected object's id and type
//!   tag, and the property diff for modifications
//! - The [`EventBus`] boundary with an in-process [`LocalBus`]
//!   implementation (broker transports live behind the trait)
//! - [`EventPublisher`]: a catalog listener that turns post-mutation
//!   notifications into outbound events
//! - [`RemoteEventProcessor`]: consumes inbound messages, discards
//!   self-originated ones, and evicts stale entries from the local
//!   derived-resource cache ([`ResourcePool`])
//!
//! Processing is idempotent and best-effort: a failed or missed eviction
//! degrades to temporarily stale derived data, never to an error surfaced
//! upward.

pub mod bus;
pub mod config;
pub mod error;
pub mod event;
pub mod processor;
pub mod publisher;

pub use bus::{EventBus, LocalBus};
pub use config::{BusConfig, ServiceConfig};
pub use error::BusError;
pub use event::{AckEvent, BusMessage, CatalogEvent, ChangeKind, EventId, ServiceId};
pub use processor::{RemoteEventProcessor, ResourcePool};
pub use publisher::EventPublisher;
