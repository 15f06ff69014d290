use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

/// Secondary lookup key for catalog objects: a `(scope, local-name)` pair.
///
/// The scope, when present, is the *id* of the owning workspace or
/// namespace rather than its display name, so a qualified name stays valid
/// when the owner is renamed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Id of the owning scope object, or `None` for global names.
    pub scope: Option<ObjectId>,
    /// Name local to the scope.
    pub local: String,
}

impl QualifiedName {
    /// A name with no owning scope (workspaces, namespaces, maps, global
    /// styles and layer groups).
    pub fn global(local: impl Into<String>) -> Self {
        Self {
            scope: None,
            local: local.into(),
        }
    }

    /// A name scoped to an owning object's id.
    pub fn scoped(scope: ObjectId, local: impl Into<String>) -> Self {
        Self {
            scope: Some(scope),
            local: local.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{scope}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_and_scoped_names_differ() {
        let global = QualifiedName::global("roads");
        let scoped = QualifiedName::scoped(ObjectId::new("ws-1"), "roads");
        assert_ne!(global, scoped);
    }

    #[test]
    fn display_includes_scope() {
        let name = QualifiedName::scoped(ObjectId::new("ws-1"), "roads");
        assert_eq!(name.to_string(), "ws-1:roads");
        assert_eq!(QualifiedName::global("roads").to_string(), "roads");
    }

    #[test]
    fn ordering_is_scope_then_local() {
        let a = QualifiedName::global("a");
        let b = QualifiedName::scoped(ObjectId::new("ws"), "a");
        assert!(a < b, "global names sort before scoped ones");
    }
}
