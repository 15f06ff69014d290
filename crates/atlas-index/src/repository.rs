//! One strongly-typed repository per catalog object kind.
//!
//! Each repository wraps a [`CatalogLookup`] and adds the kind-specific
//! indexed state: default pointers for workspaces, namespaces, and data
//! stores, sub-kind filters for stores and resources, and the
//! resource-to-layer rename coupling. Repositories are composed
//! explicitly by the catalog facade; nothing here dispatches on runtime
//! type information.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::trace;

use atlas_types::{
    Layer, LayerGroup, Map, Namespace, ObjectId, QualifiedName, Resource, ResourceKind, Store,
    StoreKind, Style, Workspace,
};

use crate::error::IndexResult;
use crate::lookup::CatalogLookup;

fn store_kind_matches(store: &Store, kind: Option<StoreKind>) -> bool {
    kind.map_or(true, |k| store.kind == k)
}

fn resource_kind_matches(resource: &Resource, kind: Option<ResourceKind>) -> bool {
    kind.map_or(true, |k| resource.kind == k)
}

/// Workspaces, plus the catalog-wide default-workspace pointer.
pub struct WorkspaceRepository {
    lookup: CatalogLookup<Workspace>,
    default_workspace: RwLock<Option<ObjectId>>,
}

impl WorkspaceRepository {
    pub fn new() -> Self {
        Self {
            lookup: CatalogLookup::new(),
            default_workspace: RwLock::new(None),
        }
    }

    pub fn add(&self, workspace: Workspace) -> IndexResult<()> {
        let name = workspace.qualified_name();
        self.lookup.insert(workspace, name)
    }

    pub fn update(&self, workspace: Workspace) -> IndexResult<()> {
        let name = workspace.qualified_name();
        self.lookup.update(workspace, name)?;
        Ok(())
    }

    /// Remove a workspace; clears the default pointer if it named it.
    pub fn remove(&self, id: &ObjectId) -> Option<Workspace> {
        let removed = self.lookup.remove(id);
        if removed.is_some() {
            let mut default = self.default_workspace.write().expect("lock poisoned");
            if default.as_ref() == Some(id) {
                *default = None;
            }
        }
        removed
    }

    pub fn get(&self, id: &ObjectId) -> Option<Workspace> {
        self.lookup.get(id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<Workspace> {
        self.lookup.get_by_name(&QualifiedName::global(name))
    }

    pub fn all(&self) -> Vec<Workspace> {
        self.lookup.all()
    }

    pub fn find(&self, predicate: impl Fn(&Workspace) -> bool) -> Vec<Workspace> {
        self.lookup.find(predicate)
    }

    /// Point the default at the given workspace (resolved locally by id),
    /// or clear it.
    pub fn set_default(&self, workspace: Option<&Workspace>) {
        let resolved = workspace
            .and_then(|ws| self.lookup.get(&ws.id))
            .map(|ws| ws.id);
        *self.default_workspace.write().expect("lock poisoned") = resolved;
    }

    pub fn default(&self) -> Option<Workspace> {
        let id = self
            .default_workspace
            .read()
            .expect("lock poisoned")
            .clone()?;
        self.lookup.get(&id)
    }

    pub fn sync_to(&self, other: &WorkspaceRepository) {
        self.lookup.sync_to(&other.lookup);
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

impl Default for WorkspaceRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Namespaces, plus the catalog-wide default-namespace pointer.
pub struct NamespaceRepository {
    lookup: CatalogLookup<Namespace>,
    default_namespace: RwLock<Option<ObjectId>>,
}

impl NamespaceRepository {
    pub fn new() -> Self {
        Self {
            lookup: CatalogLookup::new(),
            default_namespace: RwLock::new(None),
        }
    }

    pub fn add(&self, namespace: Namespace) -> IndexResult<()> {
        let name = namespace.qualified_name();
        self.lookup.insert(namespace, name)
    }

    pub fn update(&self, namespace: Namespace) -> IndexResult<()> {
        let name = namespace.qualified_name();
        self.lookup.update(namespace, name)?;
        Ok(())
    }

    /// Remove a namespace; clears the default pointer if it named it.
    pub fn remove(&self, id: &ObjectId) -> Option<Namespace> {
        let removed = self.lookup.remove(id);
        if removed.is_some() {
            let mut default = self.default_namespace.write().expect("lock poisoned");
            if default.as_ref() == Some(id) {
                *default = None;
            }
        }
        removed
    }

    pub fn get(&self, id: &ObjectId) -> Option<Namespace> {
        self.lookup.get(id)
    }

    pub fn get_by_prefix(&self, prefix: &str) -> Option<Namespace> {
        self.lookup.get_by_name(&QualifiedName::global(prefix))
    }

    pub fn find_by_uri(&self, uri: &str) -> Option<Namespace> {
        self.lookup.find_first(|ns| ns.uri == uri)
    }

    pub fn find_all_by_uri(&self, uri: &str) -> Vec<Namespace> {
        self.lookup.find(|ns| ns.uri == uri)
    }

    pub fn all(&self) -> Vec<Namespace> {
        self.lookup.all()
    }

    pub fn find(&self, predicate: impl Fn(&Namespace) -> bool) -> Vec<Namespace> {
        self.lookup.find(predicate)
    }

    pub fn set_default(&self, namespace: Option<&Namespace>) {
        let resolved = namespace
            .and_then(|ns| self.lookup.get(&ns.id))
            .map(|ns| ns.id);
        *self.default_namespace.write().expect("lock poisoned") = resolved;
    }

    pub fn default(&self) -> Option<Namespace> {
        let id = self
            .default_namespace
            .read()
            .expect("lock poisoned")
            .clone()?;
        self.lookup.get(&id)
    }

    pub fn sync_to(&self, other: &NamespaceRepository) {
        self.lookup.sync_to(&other.lookup);
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }
}

impl Default for NamespaceRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Stores of every sub-kind, plus the per-workspace default data store.
pub struct StoreRepository {
    lookup: CatalogLookup<Store>,
    /// Default data store per workspace id.
    default_stores: RwLock<HashMap<ObjectId, ObjectId>>,
}

impl StoreRepository {
    pub fn new() -> Self {
        Self {
            lookup: CatalogLookup::new(),
            default_stores: RwLock::new(HashMap::new()),
        }
    }

    pub fn add(&self, store: Store) -> IndexResult<()> {
        let name = store.qualified_name();
        self.lookup.insert(store, name)
    }

    pub fn update(&self, store: Store) -> IndexResult<()> {
        let name = store.qualified_name();
        self.lookup.update(store, name)?;
        Ok(())
    }

    /// Remove a store; any default-data-store entry naming it is cleared.
    pub fn remove(&self, id: &ObjectId) -> Option<Store> {
        let removed = self.lookup.remove(id);
        if removed.is_some() {
            self.default_stores
                .write()
                .expect("lock poisoned")
                .retain(|_, store_id| store_id != id);
        }
        removed
    }

    pub fn get(&self, id: &ObjectId, kind: Option<StoreKind>) -> Option<Store> {
        self.lookup.get(id).filter(|s| store_kind_matches(s, kind))
    }

    pub fn get_by_name(
        &self,
        workspace: &ObjectId,
        name: &str,
        kind: Option<StoreKind>,
    ) -> Option<Store> {
        self.lookup
            .get_by_name(&QualifiedName::scoped(workspace.clone(), name))
            .filter(|s| store_kind_matches(s, kind))
    }

    /// First store with the given local name in any workspace.
    pub fn find_one_by_name(&self, name: &str, kind: Option<StoreKind>) -> Option<Store> {
        self.lookup
            .find_first(|s| s.name == name && store_kind_matches(s, kind))
    }

    pub fn find_all_by_workspace(
        &self,
        workspace: &ObjectId,
        kind: Option<StoreKind>,
    ) -> Vec<Store> {
        self.lookup
            .find(|s| s.workspace.id() == workspace && store_kind_matches(s, kind))
    }

    pub fn find_all_by_kind(&self, kind: Option<StoreKind>) -> Vec<Store> {
        self.lookup.find(|s| store_kind_matches(s, kind))
    }

    pub fn all(&self) -> Vec<Store> {
        self.lookup.all()
    }

    pub fn find(&self, predicate: impl Fn(&Store) -> bool) -> Vec<Store> {
        self.lookup.find(predicate)
    }

    /// Set (or clear, with `None`) the default data store of a workspace.
    ///
    /// The store is resolved against this repository first; a store that
    /// is not indexed here, or is not a data store, clears the entry.
    pub fn set_default_data_store(&self, workspace: &ObjectId, store: Option<&Store>) {
        let resolved = store
            .and_then(|s| self.lookup.get(&s.id))
            .filter(|s| s.kind == StoreKind::Data)
            .map(|s| s.id);
        let mut defaults = self.default_stores.write().expect("lock poisoned");
        match resolved {
            Some(store_id) => {
                defaults.insert(workspace.clone(), store_id);
            }
            None => {
                defaults.remove(workspace);
            }
        }
    }

    pub fn default_data_store(&self, workspace: &ObjectId) -> Option<Store> {
        let store_id = self
            .default_stores
            .read()
            .expect("lock poisoned")
            .get(workspace)
            .cloned()?;
        self.lookup.get(&store_id)
    }

    /// Every `(workspace id, default data store)` pair.
    pub fn default_data_stores(&self) -> Vec<(ObjectId, Store)> {
        let defaults = self.default_stores.read().expect("lock poisoned");
        defaults
            .iter()
            .filter_map(|(ws, store_id)| Some((ws.clone(), self.lookup.get(store_id)?)))
            .collect()
    }

    /// Wholesale replacement of the default map, used by catalog sync.
    pub fn set_default_data_stores(&self, entries: Vec<(ObjectId, Store)>) {
        let mut next = HashMap::new();
        for (ws, store) in entries {
            if let Some(local) = self.lookup.get(&store.id) {
                if local.kind == StoreKind::Data {
                    next.insert(ws, local.id);
                }
            }
        }
        *self.default_stores.write().expect("lock poisoned") = next;
    }

    pub fn sync_to(&self, other: &StoreRepository) {
        self.lookup.sync_to(&other.lookup);
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }
}

impl Default for StoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Layers, whose name-index entries are always derived from the backing
/// resource's qualified name.
pub struct LayerRepository {
    lookup: CatalogLookup<Layer>,
}

impl LayerRepository {
    pub fn new() -> Self {
        Self {
            lookup: CatalogLookup::new(),
        }
    }

    /// Index a layer under its resource's qualified name (computed by the
    /// caller, which has catalog access).
    pub fn add(&self, layer: Layer, name: QualifiedName) -> IndexResult<()> {
        self.lookup.insert(layer, name)
    }

    pub fn update(&self, layer: Layer, name: QualifiedName) -> IndexResult<()> {
        self.lookup.update(layer, name)?;
        Ok(())
    }

    /// Remove keyed by name: the layer's identity in the name index is
    /// derived from its resource, so the name, not the id, is
    /// authoritative here.
    pub fn remove_by_name(&self, name: &QualifiedName) -> Option<Layer> {
        self.lookup.remove_by_name(name)
    }

    /// Remove by id, for callers whose backing resource is already gone.
    pub fn remove(&self, id: &ObjectId) -> Option<Layer> {
        self.lookup.remove(id)
    }

    /// Move this layer's name entry after its resource was renamed.
    pub fn rename(&self, old: &QualifiedName, new: QualifiedName) -> bool {
        self.lookup.rename(old, new)
    }

    pub fn get(&self, id: &ObjectId) -> Option<Layer> {
        self.lookup.get(id)
    }

    pub fn get_by_name(&self, name: &QualifiedName) -> Option<Layer> {
        self.lookup.get_by_name(name)
    }

    /// The name this layer is currently indexed under.
    pub fn name_of(&self, id: &ObjectId) -> Option<QualifiedName> {
        self.lookup.name_of(id)
    }

    /// The layer publishing the resource with the given qualified name.
    ///
    /// A resource has at most one layer (they share a name), so this is a
    /// direct name-index lookup rather than a scan.
    pub fn find_by_resource_name(&self, name: &QualifiedName) -> Option<Layer> {
        self.lookup.get_by_name(name)
    }

    /// Layers using the style as default or additional style.
    pub fn find_all_by_style(&self, style: &ObjectId) -> Vec<Layer> {
        self.lookup.find(|layer| {
            layer
                .default_style
                .as_ref()
                .is_some_and(|s| s.id() == style)
                || layer.styles.iter().any(|s| s.id() == style)
        })
    }

    pub fn all(&self) -> Vec<Layer> {
        self.lookup.all()
    }

    pub fn find(&self, predicate: impl Fn(&Layer) -> bool) -> Vec<Layer> {
        self.lookup.find(predicate)
    }

    pub fn sync_to(&self, other: &LayerRepository) {
        self.lookup.sync_to(&other.lookup);
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }
}

impl Default for LayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Resources, coupled to the layer repository so a resource rename moves
/// the dependent layer's name entry in the same operation.
pub struct ResourceRepository {
    lookup: CatalogLookup<Resource>,
    layers: Arc<LayerRepository>,
}

impl ResourceRepository {
    pub fn new(layers: Arc<LayerRepository>) -> Self {
        Self {
            lookup: CatalogLookup::new(),
            layers,
        }
    }

    pub fn add(&self, resource: Resource) -> IndexResult<()> {
        let name = resource.qualified_name();
        self.lookup.insert(resource, name)
    }

    /// Update a resource; if its qualified name changed, the dependent
    /// layer's name entry is renamed with it. Decoupling the two would
    /// let a stale layer entry survive a resource rename.
    pub fn update(&self, resource: Resource) -> IndexResult<()> {
        let new_name = resource.qualified_name();
        let (old, new) = self.lookup.update(resource, new_name)?;
        if old != new && self.layers.rename(&old, new.clone()) {
            trace!(%old, %new, "moved dependent layer name entry");
        }
        Ok(())
    }

    pub fn remove(&self, id: &ObjectId) -> Option<Resource> {
        self.lookup.remove(id)
    }

    pub fn get(&self, id: &ObjectId, kind: Option<ResourceKind>) -> Option<Resource> {
        self.lookup
            .get(id)
            .filter(|r| resource_kind_matches(r, kind))
    }

    pub fn get_by_name(
        &self,
        namespace: &ObjectId,
        name: &str,
        kind: Option<ResourceKind>,
    ) -> Option<Resource> {
        self.lookup
            .get_by_name(&QualifiedName::scoped(namespace.clone(), name))
            .filter(|r| resource_kind_matches(r, kind))
    }

    /// First resource with the given local name in any namespace.
    pub fn find_one_by_name(&self, name: &str, kind: Option<ResourceKind>) -> Option<Resource> {
        self.lookup
            .find_first(|r| r.name == name && resource_kind_matches(r, kind))
    }

    pub fn find_all_by_namespace(
        &self,
        namespace: &ObjectId,
        kind: Option<ResourceKind>,
    ) -> Vec<Resource> {
        self.lookup
            .find(|r| r.namespace.id() == namespace && resource_kind_matches(r, kind))
    }

    pub fn find_all_by_store(&self, store: &ObjectId, kind: Option<ResourceKind>) -> Vec<Resource> {
        self.lookup
            .find(|r| r.store.id() == store && resource_kind_matches(r, kind))
    }

    pub fn find_by_store_and_name(
        &self,
        store: &ObjectId,
        name: &str,
        kind: Option<ResourceKind>,
    ) -> Option<Resource> {
        self.lookup.find_first(|r| {
            r.name == name && r.store.id() == store && resource_kind_matches(r, kind)
        })
    }

    pub fn find_all_by_kind(&self, kind: Option<ResourceKind>) -> Vec<Resource> {
        self.lookup.find(|r| resource_kind_matches(r, kind))
    }

    pub fn all(&self) -> Vec<Resource> {
        self.lookup.all()
    }

    pub fn find(&self, predicate: impl Fn(&Resource) -> bool) -> Vec<Resource> {
        self.lookup.find(predicate)
    }

    pub fn sync_to(&self, other: &ResourceRepository) {
        self.lookup.sync_to(&other.lookup);
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }
}

/// Layer groups, optionally scoped to a workspace.
pub struct LayerGroupRepository {
    lookup: CatalogLookup<LayerGroup>,
}

impl LayerGroupRepository {
    pub fn new() -> Self {
        Self {
            lookup: CatalogLookup::new(),
        }
    }

    pub fn add(&self, group: LayerGroup) -> IndexResult<()> {
        let name = group.qualified_name();
        self.lookup.insert(group, name)
    }

    pub fn update(&self, group: LayerGroup) -> IndexResult<()> {
        let name = group.qualified_name();
        self.lookup.update(group, name)?;
        Ok(())
    }

    pub fn remove(&self, id: &ObjectId) -> Option<LayerGroup> {
        self.lookup.remove(id)
    }

    pub fn get(&self, id: &ObjectId) -> Option<LayerGroup> {
        self.lookup.get(id)
    }

    /// Look up by name within a workspace scope (`None` = global groups).
    pub fn get_by_name(&self, workspace: Option<&ObjectId>, name: &str) -> Option<LayerGroup> {
        self.lookup.get_by_name(&QualifiedName {
            scope: workspace.cloned(),
            local: name.to_string(),
        })
    }

    /// First group with the given name in any scope.
    pub fn find_one_by_name(&self, name: &str) -> Option<LayerGroup> {
        self.lookup.find_first(|lg| lg.name == name)
    }

    pub fn find_all_global(&self) -> Vec<LayerGroup> {
        self.lookup.find(|lg| lg.workspace.is_none())
    }

    pub fn find_all_by_workspace(&self, workspace: &ObjectId) -> Vec<LayerGroup> {
        self.lookup
            .find(|lg| lg.workspace.as_ref().is_some_and(|ws| ws.id() == workspace))
    }

    pub fn all(&self) -> Vec<LayerGroup> {
        self.lookup.all()
    }

    pub fn find(&self, predicate: impl Fn(&LayerGroup) -> bool) -> Vec<LayerGroup> {
        self.lookup.find(predicate)
    }

    pub fn sync_to(&self, other: &LayerGroupRepository) {
        self.lookup.sync_to(&other.lookup);
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }
}

impl Default for LayerGroupRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Styles, optionally scoped to a workspace.
pub struct StyleRepository {
    lookup: CatalogLookup<Style>,
}

impl StyleRepository {
    pub fn new() -> Self {
        Self {
            lookup: CatalogLookup::new(),
        }
    }

    pub fn add(&self, style: Style) -> IndexResult<()> {
        let name = style.qualified_name();
        self.lookup.insert(style, name)
    }

    pub fn update(&self, style: Style) -> IndexResult<()> {
        let name = style.qualified_name();
        self.lookup.update(style, name)?;
        Ok(())
    }

    pub fn remove(&self, id: &ObjectId) -> Option<Style> {
        self.lookup.remove(id)
    }

    pub fn get(&self, id: &ObjectId) -> Option<Style> {
        self.lookup.get(id)
    }

    /// Look up by name within a workspace scope (`None` = global styles).
    pub fn get_by_name(&self, workspace: Option<&ObjectId>, name: &str) -> Option<Style> {
        self.lookup.get_by_name(&QualifiedName {
            scope: workspace.cloned(),
            local: name.to_string(),
        })
    }

    /// First style with the given name in any scope.
    pub fn find_one_by_name(&self, name: &str) -> Option<Style> {
        self.lookup.find_first(|s| s.name == name)
    }

    pub fn find_all_global(&self) -> Vec<Style> {
        self.lookup.find(|s| s.workspace.is_none())
    }

    pub fn find_all_by_workspace(&self, workspace: &ObjectId) -> Vec<Style> {
        self.lookup
            .find(|s| s.workspace.as_ref().is_some_and(|ws| ws.id() == workspace))
    }

    pub fn all(&self) -> Vec<Style> {
        self.lookup.all()
    }

    pub fn find(&self, predicate: impl Fn(&Style) -> bool) -> Vec<Style> {
        self.lookup.find(predicate)
    }

    pub fn sync_to(&self, other: &StyleRepository) {
        self.lookup.sync_to(&other.lookup);
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }
}

impl Default for StyleRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Stored map compositions.
pub struct MapRepository {
    lookup: CatalogLookup<Map>,
}

impl MapRepository {
    pub fn new() -> Self {
        Self {
            lookup: CatalogLookup::new(),
        }
    }

    pub fn add(&self, map: Map) -> IndexResult<()> {
        let name = map.qualified_name();
        self.lookup.insert(map, name)
    }

    pub fn update(&self, map: Map) -> IndexResult<()> {
        let name = map.qualified_name();
        self.lookup.update(map, name)?;
        Ok(())
    }

    pub fn remove(&self, id: &ObjectId) -> Option<Map> {
        self.lookup.remove(id)
    }

    pub fn get(&self, id: &ObjectId) -> Option<Map> {
        self.lookup.get(id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<Map> {
        self.lookup.get_by_name(&QualifiedName::global(name))
    }

    pub fn all(&self) -> Vec<Map> {
        self.lookup.all()
    }

    pub fn find(&self, predicate: impl Fn(&Map) -> bool) -> Vec<Map> {
        self.lookup.find(predicate)
    }

    pub fn sync_to(&self, other: &MapRepository) {
        self.lookup.sync_to(&other.lookup);
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }
}

impl Default for MapRepository {
    fn default() -> Self {
        Self::new()
    }
}
