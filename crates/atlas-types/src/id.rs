use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::object::ObjectType;

/// Opaque identifier for a catalog object.
///
/// Ids are globally unique within an object type and immutable once
/// assigned. A freshly constructed object is *detached*: it carries an
/// unassigned (empty) id until the catalog facade assigns one on `add`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The unassigned id carried by detached objects.
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    /// Returns `true` once an id has been assigned.
    pub fn is_assigned(&self) -> bool {
        !self.0.is_empty()
    }

    /// Generate a fresh id for an object of the given type.
    ///
    /// The type prefix keeps ids human-attributable in logs; uniqueness
    /// comes from the UUID part.
    pub fn generate(ty: ObjectType) -> Self {
        Self(format!("{}-{}", ty.prefix(), Uuid::now_v7()))
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::StoreKind;

    #[test]
    fn generated_ids_are_unique() {
        let a = ObjectId::generate(ObjectType::Workspace);
        let b = ObjectId::generate(ObjectType::Workspace);
        assert_ne!(a, b);
    }

    #[test]
    fn generated_ids_carry_type_prefix() {
        let id = ObjectId::generate(ObjectType::Store(StoreKind::Data));
        assert!(id.as_str().starts_with("datastore-"));
        assert!(id.is_assigned());
    }

    #[test]
    fn unassigned_is_empty() {
        let id = ObjectId::unassigned();
        assert!(!id.is_assigned());
        assert_eq!(id.as_str(), "");
    }

    #[test]
    fn serde_is_transparent() {
        let id = ObjectId::new("workspace-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"workspace-42\"");
    }
}
