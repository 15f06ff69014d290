//! The catalog mutation event taxonomy.
//!
//! Events carry enough information to replay the *effect* of a mutation
//! remotely (which caches went stale), not the mutation itself: an
//! instance never mutates its catalog from inbound events. Wire encoding
//! is the transport collaborator's concern; everything here is plain
//! serde-serializable data.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atlas_types::{ObjectId, ObjectType, PropertyDiff};

/// Identifier of one service instance in the cluster.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique event identifier, used to correlate acknowledgements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Generate a fresh, time-ordered event id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened to the object. Modifications carry the property diff.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Modified(PropertyDiff),
    Removed,
}

impl ChangeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified(_) => "modified",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog mutation broadcast over the bus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEvent {
    /// Unique id of this event.
    pub event_id: EventId,
    /// The instance that made the change.
    pub origin: ServiceId,
    /// Target instance, or broadcast if absent.
    pub destination: Option<ServiceId>,
    /// Id of the affected catalog object.
    pub object_id: ObjectId,
    /// Type tag of the affected object, including store/resource kinds.
    pub object_type: ObjectType,
    /// The mutation, with the property diff for modifications.
    pub change: ChangeKind,
}

impl CatalogEvent {
    /// Build a broadcast event with a fresh event id.
    pub fn broadcast(
        origin: ServiceId,
        object_id: ObjectId,
        object_type: ObjectType,
        change: ChangeKind,
    ) -> Self {
        Self {
            event_id: EventId::generate(),
            origin,
            destination: None,
            object_id,
            object_type,
            change,
        }
    }

    /// Whether this event originated at the given instance.
    pub fn is_from(&self, service: &ServiceId) -> bool {
        self.origin == *service
    }
}

impl fmt::Display for CatalogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} (from {})",
            self.object_type,
            self.object_id,
            self.change.label(),
            self.origin
        )
    }
}

/// Delivery confirmation for a previously sent event. Logged only; acks
/// never alter catalog or cache state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckEvent {
    /// The instance acknowledging delivery.
    pub origin: ServiceId,
    /// The event being acknowledged.
    pub acked: EventId,
}

/// Everything that flows over the bus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BusMessage {
    Event(CatalogEvent),
    Ack(AckEvent),
}
