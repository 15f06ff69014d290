//! Concrete catalog object kinds.
//!
//! Every object carries an opaque [`ObjectId`] (unassigned until the facade
//! adds it) and holds its relationships as [`Ref`] values. Qualified names
//! are scoped by the *id* of the owning workspace or namespace, so renames
//! of the owner never invalidate dependent name-index entries.

use serde::{Deserialize, Serialize};

use crate::id::ObjectId;
use crate::name::QualifiedName;
use crate::object::{ObjectType, ResourceKind, StoreKind};
use crate::reference::Ref;

/// Grouping scope for stores and (optionally) styles and layer groups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: ObjectId,
    pub name: String,
}

impl Workspace {
    /// Create a detached workspace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::unassigned(),
            name: name.into(),
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::global(self.name.clone())
    }

    pub fn object_type(&self) -> ObjectType {
        ObjectType::Workspace
    }
}

/// XML-namespace counterpart of a workspace; scopes resource names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: ObjectId,
    /// Short prefix, unique across namespaces.
    pub prefix: String,
    /// Namespace URI.
    pub uri: String,
}

impl Namespace {
    /// Create a detached namespace.
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: ObjectId::unassigned(),
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::global(self.prefix.clone())
    }

    pub fn object_type(&self) -> ObjectType {
        ObjectType::Namespace
    }
}

/// Connection to a source of data, owned by a workspace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: ObjectId,
    pub kind: StoreKind,
    pub name: String,
    /// Owning workspace.
    pub workspace: Ref,
    pub enabled: bool,
}

impl Store {
    /// Create a detached store under the given workspace reference.
    pub fn new(kind: StoreKind, name: impl Into<String>, workspace: Ref) -> Self {
        Self {
            id: ObjectId::unassigned(),
            kind,
            name: name.into(),
            workspace,
            enabled: true,
        }
    }

    /// Scoped by the workspace *id*: stable under workspace rename.
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::scoped(self.workspace.id().clone(), self.name.clone())
    }

    pub fn object_type(&self) -> ObjectType {
        ObjectType::Store(self.kind)
    }
}

/// Published data item within a store (feature type, coverage, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ObjectId,
    pub kind: ResourceKind,
    pub name: String,
    pub title: Option<String>,
    /// Owning namespace; scopes the resource's qualified name.
    pub namespace: Ref,
    /// Owning store.
    pub store: Ref,
    pub enabled: bool,
}

impl Resource {
    /// Create a detached resource under the given namespace and store.
    pub fn new(kind: ResourceKind, name: impl Into<String>, namespace: Ref, store: Ref) -> Self {
        Self {
            id: ObjectId::unassigned(),
            kind,
            name: name.into(),
            title: None,
            namespace,
            store,
            enabled: true,
        }
    }

    /// Scoped by the namespace *id*: stable under namespace rename.
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::scoped(self.namespace.id().clone(), self.name.clone())
    }

    pub fn object_type(&self) -> ObjectType {
        ObjectType::Resource(self.kind)
    }
}

/// Publishing configuration for a resource.
///
/// A layer owns no name: its identity in the name index is always its
/// resource's qualified name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: ObjectId,
    /// The resource this layer publishes.
    pub resource: Ref,
    /// Default rendering style.
    pub default_style: Option<Ref>,
    /// Additional available styles.
    pub styles: Vec<Ref>,
}

impl Layer {
    /// Create a detached layer publishing the given resource.
    pub fn new(resource: Ref) -> Self {
        Self {
            id: ObjectId::unassigned(),
            resource,
            default_style: None,
            styles: Vec::new(),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        ObjectType::Layer
    }
}

/// Ordered composition of layers and nested layer groups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerGroup {
    pub id: ObjectId,
    pub name: String,
    /// Owning workspace, or `None` for a global group.
    pub workspace: Option<Ref>,
    /// Ordered members: layers or nested layer groups.
    pub members: Vec<Ref>,
    /// Styles applied per member.
    pub styles: Vec<Ref>,
}

impl LayerGroup {
    /// Create a detached, global layer group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::unassigned(),
            name: name.into(),
            workspace: None,
            members: Vec::new(),
            styles: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName {
            scope: self.workspace.as_ref().map(|ws| ws.id().clone()),
            local: self.name.clone(),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        ObjectType::LayerGroup
    }
}

/// Rendering style, optionally scoped to a workspace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub id: ObjectId,
    pub name: String,
    /// Owning workspace, or `None` for a global style.
    pub workspace: Option<Ref>,
    /// Backing stylesheet file name.
    pub filename: Option<String>,
}

impl Style {
    /// Create a detached, global style.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::unassigned(),
            name: name.into(),
            workspace: None,
            filename: None,
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName {
            scope: self.workspace.as_ref().map(|ws| ws.id().clone()),
            local: self.name.clone(),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        ObjectType::Style
    }
}

/// Stored map composition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub id: ObjectId,
    pub name: String,
    pub enabled: bool,
}

impl Map {
    /// Create a detached map.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::unassigned(),
            name: name.into(),
            enabled: true,
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::global(self.name.clone())
    }

    pub fn object_type(&self) -> ObjectType {
        ObjectType::Map
    }
}
