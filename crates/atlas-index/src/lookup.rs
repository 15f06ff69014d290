//! The generic triple-index lookup underlying every typed repository.
//!
//! Three indices are kept for each object type: id to object, qualified
//! name to id, and id to qualified name (needed to find the old name on
//! update and remove). All three live behind one `RwLock`, so a single
//! logical change (add/update/remove) is applied in one critical section
//! and readers never see the id index and name index disagree. Locks for
//! different object types are independent: mutating stores never blocks
//! workspace readers.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use atlas_types::{
    Layer, LayerGroup, Map, Namespace, ObjectId, QualifiedName, Resource, Store, Style, Workspace,
};

use crate::error::{IndexError, IndexResult};

/// An object storable in a [`CatalogLookup`].
pub trait Keyed: Clone {
    /// Type label used in error messages.
    const TYPE_LABEL: &'static str;

    /// The object's id.
    fn id(&self) -> &ObjectId;
}

macro_rules! impl_keyed {
    ($ty:ty, $label:literal) => {
        impl Keyed for $ty {
            const TYPE_LABEL: &'static str = $label;

            fn id(&self) -> &ObjectId {
                &self.id
            }
        }
    };
}

impl_keyed!(Workspace, "workspace");
impl_keyed!(Namespace, "namespace");
impl_keyed!(Store, "store");
impl_keyed!(Resource, "resource");
impl_keyed!(Layer, "layer");
impl_keyed!(LayerGroup, "layergroup");
impl_keyed!(Style, "style");
impl_keyed!(Map, "map");

#[derive(Clone)]
struct Indices<T> {
    by_id: BTreeMap<ObjectId, T>,
    by_name: BTreeMap<QualifiedName, ObjectId>,
    id_to_name: HashMap<ObjectId, QualifiedName>,
}

impl<T> Indices<T> {
    fn new() -> Self {
        Self {
            by_id: BTreeMap::new(),
            by_name: BTreeMap::new(),
            id_to_name: HashMap::new(),
        }
    }
}

/// Concurrent id/name index over one catalog object type.
///
/// Objects are cloned on read; the lookup exclusively owns the canonical
/// instances. `find` scans are materialized eagerly: at the tens of
/// thousands of objects this system targets, a plain loop over the name
/// index outperforms lazy iterator plumbing and keeps lock hold times
/// predictable.
pub struct CatalogLookup<T> {
    inner: RwLock<Indices<T>>,
}

impl<T: Keyed> CatalogLookup<T> {
    /// Create an empty lookup.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Indices::new()),
        }
    }

    /// Index a canonical object under the given qualified name.
    ///
    /// Fails if the object is detached (no id), the id is already
    /// present, or the name is taken: ids and qualified names are both
    /// unique within a type, and enforcing that here keeps the three
    /// indices from ever disagreeing.
    pub fn insert(&self, value: T, name: QualifiedName) -> IndexResult<()> {
        if !value.id().is_assigned() {
            return Err(IndexError::UnassignedId { ty: T::TYPE_LABEL });
        }
        let mut indices = self.inner.write().expect("lock poisoned");
        let id = value.id().clone();
        if indices.by_id.contains_key(&id) {
            return Err(IndexError::DuplicateId {
                ty: T::TYPE_LABEL,
                id,
            });
        }
        if indices.by_name.contains_key(&name) {
            return Err(IndexError::DuplicateName {
                ty: T::TYPE_LABEL,
                name,
            });
        }
        indices.by_name.insert(name.clone(), id.clone());
        indices.id_to_name.insert(id.clone(), name);
        indices.by_id.insert(id, value);
        Ok(())
    }

    /// Replace the stored object for an existing id, moving its name
    /// entry if the qualified name changed.
    ///
    /// Returns the old and new qualified names so callers can propagate
    /// renames to dependent indices.
    pub fn update(
        &self,
        value: T,
        new_name: QualifiedName,
    ) -> IndexResult<(QualifiedName, QualifiedName)> {
        let mut indices = self.inner.write().expect("lock poisoned");
        let id = value.id().clone();
        if !indices.by_id.contains_key(&id) {
            return Err(IndexError::NotFound {
                ty: T::TYPE_LABEL,
                id,
            });
        }
        let old_name = indices
            .id_to_name
            .get(&id)
            .cloned()
            .expect("id indexed without a name entry");
        if old_name != new_name {
            if let Some(holder) = indices.by_name.get(&new_name) {
                if holder != &id {
                    return Err(IndexError::DuplicateName {
                        ty: T::TYPE_LABEL,
                        name: new_name,
                    });
                }
            }
            indices.by_name.remove(&old_name);
            indices.by_name.insert(new_name.clone(), id.clone());
            indices.id_to_name.insert(id.clone(), new_name.clone());
        }
        indices.by_id.insert(id, value);
        Ok((old_name, new_name))
    }

    /// Remove an object by id, clearing all three indices.
    ///
    /// Returns the removed object, or `None` if the id was absent.
    pub fn remove(&self, id: &ObjectId) -> Option<T> {
        let mut indices = self.inner.write().expect("lock poisoned");
        let removed = indices.by_id.remove(id)?;
        if let Some(name) = indices.id_to_name.remove(id) {
            indices.by_name.remove(&name);
        }
        Some(removed)
    }

    /// Remove an object by qualified name, clearing all three indices.
    ///
    /// The layer repository removes by name: a layer's identity in the
    /// name index is derived from its resource.
    pub fn remove_by_name(&self, name: &QualifiedName) -> Option<T> {
        let mut indices = self.inner.write().expect("lock poisoned");
        let id = indices.by_name.remove(name)?;
        indices.id_to_name.remove(&id);
        indices.by_id.remove(&id)
    }

    /// Move a name entry without touching the stored object.
    ///
    /// Returns `false` if no entry existed under `old`. Used to keep a
    /// layer's name entry synchronized when its resource is renamed.
    pub fn rename(&self, old: &QualifiedName, new: QualifiedName) -> bool {
        let mut indices = self.inner.write().expect("lock poisoned");
        match indices.by_name.remove(old) {
            Some(id) => {
                indices.by_name.insert(new.clone(), id.clone());
                indices.id_to_name.insert(id, new);
                true
            }
            None => false,
        }
    }

    /// Look up an object by id.
    pub fn get(&self, id: &ObjectId) -> Option<T> {
        let indices = self.inner.read().expect("lock poisoned");
        indices.by_id.get(id).cloned()
    }

    /// Look up an object by qualified name.
    pub fn get_by_name(&self, name: &QualifiedName) -> Option<T> {
        let indices = self.inner.read().expect("lock poisoned");
        let id = indices.by_name.get(name)?;
        indices.by_id.get(id).cloned()
    }

    /// The qualified name currently indexed for an id.
    pub fn name_of(&self, id: &ObjectId) -> Option<QualifiedName> {
        let indices = self.inner.read().expect("lock poisoned");
        indices.id_to_name.get(id).cloned()
    }

    /// All objects matching a predicate, in name order, materialized
    /// eagerly.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        let indices = self.inner.read().expect("lock poisoned");
        let mut result = Vec::new();
        for id in indices.by_name.values() {
            if let Some(value) = indices.by_id.get(id) {
                if predicate(value) {
                    result.push(value.clone());
                }
            }
        }
        result
    }

    /// First object matching a predicate, in name order.
    pub fn find_first(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        let indices = self.inner.read().expect("lock poisoned");
        for id in indices.by_name.values() {
            if let Some(value) = indices.by_id.get(id) {
                if predicate(value) {
                    return Some(value.clone());
                }
            }
        }
        None
    }

    /// All stored objects, in id order.
    pub fn all(&self) -> Vec<T> {
        let indices = self.inner.read().expect("lock poisoned");
        indices.by_id.values().cloned().collect()
    }

    /// Bulk-replace the other lookup's indices with a copy of this one's.
    ///
    /// Used to snapshot one catalog's state into another without
    /// re-running add/resolve logic per object.
    pub fn sync_to(&self, other: &CatalogLookup<T>) {
        let source = self.inner.read().expect("lock poisoned");
        let mut target = other.inner.write().expect("lock poisoned");
        *target = source.clone();
    }

    /// Drop all entries.
    pub fn clear(&self) {
        let mut indices = self.inner.write().expect("lock poisoned");
        *indices = Indices::new();
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").by_id.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Keyed> Default for CatalogLookup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for CatalogLookup<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let indices = self.inner.read().expect("lock poisoned");
        f.debug_struct("CatalogLookup")
            .field("objects", &indices.by_id.len())
            .finish()
    }
}
