use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::ObjectId;
use crate::object::ObjectType;

/// A reference from one catalog object to another.
///
/// References are held by `(type, id)` rather than by owning the target.
/// A [`Ref::Placeholder`] stands in for a target that is not yet present
/// in the catalog (legal transiently, e.g. during ordered bulk load where
/// a store may be added before its workspace); resolution flips it to
/// [`Ref::Resolved`] once the target exists.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ref {
    /// The target has been confirmed present in the catalog.
    Resolved { ty: ObjectType, id: ObjectId },
    /// The target is known only by type and id, pending resolution.
    Placeholder { ty: ObjectType, id: ObjectId },
}

impl Ref {
    /// A placeholder reference to a target known only by type and id.
    pub fn placeholder(ty: ObjectType, id: ObjectId) -> Self {
        Self::Placeholder { ty, id }
    }

    /// A reference to a target known to be present.
    pub fn resolved(ty: ObjectType, id: ObjectId) -> Self {
        Self::Resolved { ty, id }
    }

    /// Id of the referenced object.
    pub fn id(&self) -> &ObjectId {
        match self {
            Self::Resolved { id, .. } | Self::Placeholder { id, .. } => id,
        }
    }

    /// Type of the referenced object.
    pub fn ty(&self) -> ObjectType {
        match self {
            Self::Resolved { ty, .. } | Self::Placeholder { ty, .. } => *ty,
        }
    }

    /// Returns `true` if the target has not yet been resolved.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    /// The resolved form of this reference, preserving type and id.
    pub fn into_resolved(self) -> Self {
        match self {
            Self::Placeholder { ty, id } | Self::Resolved { ty, id } => Self::Resolved { ty, id },
        }
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { ty, id } => write!(f, "{ty}:{id}"),
            Self::Placeholder { ty, id } => write!(f, "{ty}:{id} (unresolved)"),
        }
    }
}
