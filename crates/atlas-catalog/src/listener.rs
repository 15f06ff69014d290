//! Mutation notifications fired by the catalog facade.
//!
//! Saves are bracketed by a pre-commit and a post-commit notification
//! carrying the same property diff; default-pointer changes get the same
//! pre/post bracket, so external listeners observe a consistent pair
//! regardless of which kind of mutation occurred.

use atlas_types::{CatalogObject, ObjectId, PropertyDiff};

/// A change to one of the catalog's default pointers, carrying old and
/// new values (by id; `None` clears the pointer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefaultChange {
    Workspace {
        old: Option<ObjectId>,
        new: Option<ObjectId>,
    },
    Namespace {
        old: Option<ObjectId>,
        new: Option<ObjectId>,
    },
    DataStore {
        workspace: ObjectId,
        old: Option<ObjectId>,
        new: Option<ObjectId>,
    },
}

/// Observer of catalog mutations.
///
/// All methods default to no-ops so listeners implement only what they
/// need. Listeners run synchronously on the mutating thread; they must
/// not call back into mutating catalog operations.
pub trait CatalogListener: Send + Sync {
    /// An object was added and indexed.
    fn on_added(&self, _object: &CatalogObject) {}

    /// A save is about to commit; `object` is the pre-commit state.
    fn on_pre_modify(&self, _object: &CatalogObject, _diff: &PropertyDiff) {}

    /// A save committed; `object` is the post-commit state.
    fn on_post_modify(&self, _object: &CatalogObject, _diff: &PropertyDiff) {}

    /// An object was removed from all indices.
    fn on_removed(&self, _object: &CatalogObject) {}

    /// A default pointer is about to change.
    fn on_pre_default_change(&self, _change: &DefaultChange) {}

    /// A default pointer changed.
    fn on_post_default_change(&self, _change: &DefaultChange) {}
}
