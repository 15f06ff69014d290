//! Change-tracking wrapper for retrieved catalog objects.
//!
//! Every object handed out by the facade is wrapped in a [`Tracked`].
//! Property writes are captured as an ordered change log instead of being
//! applied, so the canonical object stored in the repository is unaffected
//! until `save` commits the wrapper. The recorded log doubles as the
//! property diff carried by modify notifications.

use atlas_index::Keyed;
use atlas_types::{
    ObjectId, PropertyAccess, PropertyChange, PropertyDiff, PropertyValue, TypeError,
};

/// A catalog object plus its pending, uncommitted property changes.
///
/// Reads see pending values (read-through to the base snapshot for
/// untouched properties); repeated writes to one property coalesce,
/// keeping the earliest old value and the latest new value. Two wrappers
/// compare equal when they wrap the same canonical object (same id),
/// regardless of pending changes.
#[derive(Clone, Debug)]
pub struct Tracked<T> {
    base: T,
    changes: Vec<PropertyChange>,
}

impl<T: PropertyAccess + Keyed> Tracked<T> {
    /// Wrap a snapshot of a canonical object.
    pub fn new(base: T) -> Self {
        Self {
            base,
            changes: Vec::new(),
        }
    }

    /// The wrapped object's id.
    pub fn id(&self) -> &ObjectId {
        self.base.id()
    }

    /// The base snapshot, without pending changes applied.
    pub fn base(&self) -> &T {
        &self.base
    }

    /// Read a property: the pending value if one was written, otherwise
    /// read-through to the base snapshot.
    pub fn get(&self, property: &str) -> Result<PropertyValue, TypeError> {
        match self.changes.iter().find(|c| c.property == property) {
            Some(change) => Ok(change.new.clone()),
            None => self.base.get_property(property),
        }
    }

    /// Record a property write without touching the base snapshot.
    ///
    /// The value is validated against the property's shape immediately;
    /// unknown or immutable properties fail here, not at commit time.
    pub fn set(&mut self, property: &str, value: PropertyValue) -> Result<(), TypeError> {
        // Probe on a scratch copy so a shape mismatch leaves no trace.
        let mut probe = self.base.clone();
        probe.set_property(property, value.clone())?;

        match self.changes.iter_mut().find(|c| c.property == property) {
            Some(existing) => {
                // Earliest old value, latest new value.
                existing.new = value;
            }
            None => {
                let old = self.base.get_property(property)?;
                self.changes.push(PropertyChange {
                    property: property.to_string(),
                    old,
                    new: value,
                });
            }
        }
        Ok(())
    }

    /// Returns `true` if any writes are pending.
    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    /// The pending changes as a diff, in record order.
    pub fn diff(&self) -> PropertyDiff {
        self.changes.iter().cloned().collect()
    }

    /// Apply all recorded changes to the base snapshot in log order and
    /// return the resulting canonical value together with the diff.
    pub fn commit(self) -> Result<(T, PropertyDiff), TypeError> {
        let diff: PropertyDiff = self.changes.iter().cloned().collect();
        let mut value = self.base;
        for change in &self.changes {
            value.set_property(&change.property, change.new.clone())?;
        }
        Ok((value, diff))
    }

    /// Drop all pending changes and return the untouched base snapshot.
    pub fn discard(self) -> T {
        self.base
    }
}

impl<T: PropertyAccess + Keyed> PartialEq for Tracked<T> {
    /// Wrappers over the same canonical object compare equal.
    fn eq(&self, other: &Self) -> bool {
        self.base.id() == other.base.id()
    }
}
