//! Outbound side: catalog notifications become bus events.

use std::sync::Arc;

use tracing::warn;

use atlas_catalog::CatalogListener;
use atlas_types::{CatalogObject, PropertyDiff};

use crate::bus::EventBus;
use crate::event::{BusMessage, CatalogEvent, ChangeKind, ServiceId};

/// A [`CatalogListener`] that broadcasts post-mutation notifications as
/// [`CatalogEvent`]s stamped with this instance's service id.
///
/// Pre-commit notifications and default-pointer changes are catalog-level
/// state, not object mutations, and produce no bus traffic.
pub struct EventPublisher {
    origin: ServiceId,
    bus: Arc<dyn EventBus>,
}

impl EventPublisher {
    pub fn new(origin: ServiceId, bus: Arc<dyn EventBus>) -> Self {
        Self { origin, bus }
    }

    fn publish(&self, object: &CatalogObject, change: ChangeKind) {
        let event = CatalogEvent::broadcast(
            self.origin.clone(),
            object.id().clone(),
            object.object_type(),
            change,
        );
        if let Err(err) = self.bus.publish(BusMessage::Event(event)) {
            // Best-effort: a lost event degrades to stale remote caches,
            // never to a failed catalog mutation.
            warn!(%err, "failed to publish catalog event");
        }
    }
}

impl CatalogListener for EventPublisher {
    fn on_added(&self, object: &CatalogObject) {
        self.publish(object, ChangeKind::Added);
    }

    fn on_post_modify(&self, object: &CatalogObject, diff: &PropertyDiff) {
        self.publish(object, ChangeKind::Modified(diff.clone()));
    }

    fn on_removed(&self, object: &CatalogObject) {
        self.publish(object, ChangeKind::Removed);
    }
}
