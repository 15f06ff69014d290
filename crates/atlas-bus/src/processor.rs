//! Inbound side: remote mutation events evict stale derived resources.
//!
//! The processor is a pure, idempotent function of each message. It never
//! mutates the catalog — each instance already holds, or lazily
//! re-fetches, the true state from its own backing configuration — and it
//! never surfaces errors: its job is best-effort cache hygiene.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use atlas_catalog::Catalog;
use atlas_types::{ObjectId, ObjectType, ResourceKind, StoreKind, Style};

use crate::bus::MessageStream;
use crate::event::{BusMessage, CatalogEvent, ChangeKind, ServiceId};

/// Eviction-only contract exposed by the derived-resource cache.
///
/// The pool caches expensive live objects (connections, parsed styles)
/// keyed by catalog object. The processor only ever evicts; population
/// and reads belong to the serving path. Evicting an absent key is a
/// no-op, which is what makes duplicate event delivery harmless.
pub trait ResourcePool: Send + Sync {
    /// Evict the live data source derived from a store.
    fn evict_store(&self, kind: StoreKind, id: &ObjectId);

    /// Evict the feature-type artifacts derived from a resource.
    fn evict_feature_type(&self, id: &ObjectId);

    /// Evict a parsed style. Keyed by the style instance, not the id.
    fn evict_style(&self, style: &Style);
}

/// Consumes inbound bus messages and dispatches per-type cache eviction.
pub struct RemoteEventProcessor {
    local: ServiceId,
    catalog: Arc<Catalog>,
    pool: Arc<dyn ResourcePool>,
}

impl RemoteEventProcessor {
    pub fn new(local: ServiceId, catalog: Arc<Catalog>, pool: Arc<dyn ResourcePool>) -> Self {
        Self {
            local,
            catalog,
            pool,
        }
    }

    /// Process one inbound message. Idempotent; never fails.
    pub fn process(&self, message: &BusMessage) {
        match message {
            BusMessage::Ack(ack) => {
                if ack.origin != self.local {
                    trace!(origin = %ack.origin, acked = %ack.acked, "received event ack");
                }
            }
            BusMessage::Event(event) => self.process_event(event),
        }
    }

    /// Drain a subscription until the bus closes. Intended to run on a
    /// dedicated consumer task, independent of request handling.
    pub async fn run(&self, mut stream: MessageStream) {
        loop {
            match stream.recv().await {
                Ok(message) => self.process(&message),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    // Missed evictions degrade to temporarily stale
                    // caches; the next event or natural expiry heals.
                    warn!(missed, "bus consumer lagged, mutation events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    fn process_event(&self, event: &CatalogEvent) {
        if event.is_from(&self.local) {
            trace!(%event, "ignoring event from self");
            return;
        }
        match &event.change {
            // Nothing is cached yet for an object this instance has never
            // served.
            ChangeKind::Added => {
                debug!(%event, "remote add event, nothing to do");
            }
            ChangeKind::Modified(_) | ChangeKind::Removed => self.evict(event),
        }
    }

    fn evict(&self, event: &CatalogEvent) {
        match event.object_type {
            ObjectType::Store(kind) => {
                debug!(%event, "evicting store from resource pool");
                self.pool.evict_store(kind, &event.object_id);
            }
            ObjectType::Resource(ResourceKind::FeatureType) => {
                debug!(%event, "evicting feature type from resource pool");
                self.pool.evict_feature_type(&event.object_id);
            }
            ObjectType::Style => {
                // Style eviction is keyed by instance: re-resolve the id
                // against the local catalog first.
                match self.catalog.style(&event.object_id) {
                    Some(style) => {
                        debug!(%event, "evicting style from resource pool");
                        self.pool.evict_style(style.base());
                    }
                    None => {
                        trace!(id = %event.object_id, "style not present locally, nothing to evict");
                    }
                }
            }
            ObjectType::Workspace
            | ObjectType::Namespace
            | ObjectType::Resource(_)
            | ObjectType::Layer
            | ObjectType::LayerGroup
            | ObjectType::Map => {
                trace!(ty = %event.object_type, "no derived cache for this object type");
            }
        }
    }
}
