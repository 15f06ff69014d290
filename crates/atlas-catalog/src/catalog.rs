//! The catalog facade: single coordination point over the per-type
//! repositories.
//!
//! Every lookup hands out [`Tracked`] wrappers; every mutation resolves
//! references, maintains the indices, and fires listener notifications.
//! The facade owns its repositories exclusively; decorator facades wrap a
//! `Catalog` rather than duplicating state.

use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::debug;

use atlas_index::{
    IndexError, LayerGroupRepository, LayerRepository, MapRepository, NamespaceRepository,
    ResourceRepository, StoreRepository, StyleRepository, WorkspaceRepository,
};
use atlas_types::{
    get_object_property, CatalogObject, Layer, LayerGroup, Map, Namespace, ObjectId, ObjectType,
    ObjectTypeGroup, PropertyValue, Resource, ResourceKind, Store, StoreKind, Style, Workspace,
};

use crate::error::{CatalogError, CatalogResult};
use crate::listener::{CatalogListener, DefaultChange};
use crate::resolver;
use crate::sort::{can_sort, CloseableIter, SortOrder, SortSpec};
use crate::tracked::Tracked;

/// Workspace scoping for name lookups, replacing sentinel objects: match
/// any workspace, only the global (no-workspace) scope, or one workspace
/// by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkspaceScope {
    Any,
    Global,
    Id(ObjectId),
}

impl From<&Workspace> for WorkspaceScope {
    fn from(ws: &Workspace) -> Self {
        Self::Id(ws.id.clone())
    }
}

/// Object-kind selection for cross-type listing.
///
/// `Published` combines layers and layer groups, the two kinds a map
/// request can address by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeSelector {
    Workspace,
    Namespace,
    Store(Option<StoreKind>),
    Resource(Option<ResourceKind>),
    Layer,
    LayerGroup,
    Published,
    Style,
    Map,
}

impl fmt::Display for TypeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Workspace => "workspaces",
            Self::Namespace => "namespaces",
            Self::Store(_) => "stores",
            Self::Resource(_) => "resources",
            Self::Layer => "layers",
            Self::LayerGroup => "layer groups",
            Self::Published => "published objects",
            Self::Style => "styles",
            Self::Map => "maps",
        };
        f.write_str(s)
    }
}

/// Import boundary for the generic catalog replication path.
///
/// [`Catalog`] implements this by re-adding through its normal `add`
/// pipeline; alternative backends can implement it to receive a full
/// catalog dump in dependency order.
pub trait CatalogSink {
    fn import_workspace(&self, workspace: Workspace) -> CatalogResult<()>;
    fn import_namespace(&self, namespace: Namespace) -> CatalogResult<()>;
    fn import_store(&self, store: Store) -> CatalogResult<()>;
    fn import_resource(&self, resource: Resource) -> CatalogResult<()>;
    fn import_style(&self, style: Style) -> CatalogResult<()>;
    fn import_layer(&self, layer: Layer) -> CatalogResult<()>;
    fn import_layer_group(&self, group: LayerGroup) -> CatalogResult<()>;
    fn import_map(&self, map: Map) -> CatalogResult<()>;
    fn import_default_workspace(&self, workspace: Option<&Workspace>);
    fn import_default_namespace(&self, namespace: Option<&Namespace>);
    fn import_default_data_store(&self, workspace: &Workspace, store: &Store)
        -> CatalogResult<()>;
}

/// The catalog facade.
pub struct Catalog {
    workspaces: WorkspaceRepository,
    namespaces: NamespaceRepository,
    stores: StoreRepository,
    resources: ResourceRepository,
    layers: Arc<LayerRepository>,
    layer_groups: LayerGroupRepository,
    styles: StyleRepository,
    maps: MapRepository,
    listeners: RwLock<Vec<Arc<dyn CatalogListener>>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        let layers = Arc::new(LayerRepository::new());
        Self {
            workspaces: WorkspaceRepository::new(),
            namespaces: NamespaceRepository::new(),
            stores: StoreRepository::new(),
            resources: ResourceRepository::new(Arc::clone(&layers)),
            layers,
            layer_groups: LayerGroupRepository::new(),
            styles: StyleRepository::new(),
            maps: MapRepository::new(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register a mutation listener.
    pub fn add_listener(&self, listener: Arc<dyn CatalogListener>) {
        self.listeners
            .write()
            .expect("lock poisoned")
            .push(listener);
    }

    fn notify(&self, f: impl Fn(&dyn CatalogListener)) {
        for listener in self.listeners.read().expect("lock poisoned").iter() {
            f(listener.as_ref());
        }
    }

    /// Whether an object of the given type and id is present.
    pub fn contains(&self, ty: ObjectType, id: &ObjectId) -> bool {
        match ty.group() {
            ObjectTypeGroup::Workspace => self.workspaces.get(id).is_some(),
            ObjectTypeGroup::Namespace => self.namespaces.get(id).is_some(),
            ObjectTypeGroup::Store => self.stores.get(id, None).is_some(),
            ObjectTypeGroup::Resource => self.resources.get(id, None).is_some(),
            ObjectTypeGroup::Layer => self.layers.get(id).is_some(),
            ObjectTypeGroup::LayerGroup => self.layer_groups.get(id).is_some(),
            ObjectTypeGroup::Style => self.styles.get(id).is_some(),
            ObjectTypeGroup::Map => self.maps.get(id).is_some(),
        }
    }

    fn object_by_group(&self, group: ObjectTypeGroup, id: &ObjectId) -> Option<CatalogObject> {
        match group {
            ObjectTypeGroup::Workspace => self.workspaces.get(id).map(CatalogObject::Workspace),
            ObjectTypeGroup::Namespace => self.namespaces.get(id).map(CatalogObject::Namespace),
            ObjectTypeGroup::Store => self.stores.get(id, None).map(CatalogObject::Store),
            ObjectTypeGroup::Resource => self.resources.get(id, None).map(CatalogObject::Resource),
            ObjectTypeGroup::Layer => self.layers.get(id).map(CatalogObject::Layer),
            ObjectTypeGroup::LayerGroup => {
                self.layer_groups.get(id).map(CatalogObject::LayerGroup)
            }
            ObjectTypeGroup::Style => self.styles.get(id).map(CatalogObject::Style),
            ObjectTypeGroup::Map => self.maps.get(id).map(CatalogObject::Map),
        }
    }

    //
    // Workspaces
    //

    /// Add a workspace, assigning an id if detached. Returns a tracking
    /// wrapper over the stored object.
    pub fn add_workspace(&self, mut workspace: Workspace) -> CatalogResult<Tracked<Workspace>> {
        if !workspace.id.is_assigned() {
            workspace.id = ObjectId::generate(ObjectType::Workspace);
        }
        self.workspaces.add(workspace.clone())?;
        debug!(id = %workspace.id, name = %workspace.name, "workspace added");
        self.notify(|l| l.on_added(&CatalogObject::Workspace(workspace.clone())));
        Ok(Tracked::new(workspace))
    }

    pub fn workspace(&self, id: &ObjectId) -> Option<Tracked<Workspace>> {
        self.workspaces.get(id).map(Tracked::new)
    }

    pub fn workspace_by_name(&self, name: &str) -> Option<Tracked<Workspace>> {
        self.workspaces.get_by_name(name).map(Tracked::new)
    }

    pub fn workspaces(&self) -> Vec<Tracked<Workspace>> {
        self.workspaces.all().into_iter().map(Tracked::new).collect()
    }

    /// Commit a workspace's pending changes, firing the pre/post modify
    /// bracket around the index update.
    pub fn save_workspace(&self, tracked: Tracked<Workspace>) -> CatalogResult<Workspace> {
        let before = CatalogObject::Workspace(tracked.base().clone());
        let pre_diff = tracked.diff();
        self.notify(|l| l.on_pre_modify(&before, &pre_diff));

        let (value, diff) = tracked.commit()?;
        self.workspaces.update(value.clone())?;

        let after = CatalogObject::Workspace(value.clone());
        self.notify(|l| l.on_post_modify(&after, &diff));
        Ok(value)
    }

    /// Remove a workspace. Dependent objects are not cascade-deleted;
    /// referential integrity across kinds is the caller's policy.
    pub fn remove_workspace(&self, workspace: &Workspace) -> Option<Workspace> {
        let removed = self.workspaces.remove(&workspace.id)?;
        self.notify(|l| l.on_removed(&CatalogObject::Workspace(removed.clone())));
        Some(removed)
    }

    pub fn default_workspace(&self) -> Option<Tracked<Workspace>> {
        self.workspaces.default().map(Tracked::new)
    }

    /// Change the default workspace, bracketed by pre/post notifications
    /// carrying old and new ids.
    pub fn set_default_workspace(&self, workspace: Option<&Workspace>) {
        let old = self.workspaces.default().map(|ws| ws.id);
        let new = workspace.map(|ws| ws.id.clone());
        let change = DefaultChange::Workspace { old, new };
        self.notify(|l| l.on_pre_default_change(&change));
        self.workspaces.set_default(workspace);
        self.notify(|l| l.on_post_default_change(&change));
    }

    //
    // Namespaces
    //

    pub fn add_namespace(&self, mut namespace: Namespace) -> CatalogResult<Tracked<Namespace>> {
        if !namespace.id.is_assigned() {
            namespace.id = ObjectId::generate(ObjectType::Namespace);
        }
        self.namespaces.add(namespace.clone())?;
        debug!(id = %namespace.id, prefix = %namespace.prefix, "namespace added");
        self.notify(|l| l.on_added(&CatalogObject::Namespace(namespace.clone())));
        Ok(Tracked::new(namespace))
    }

    pub fn namespace(&self, id: &ObjectId) -> Option<Tracked<Namespace>> {
        self.namespaces.get(id).map(Tracked::new)
    }

    pub fn namespace_by_prefix(&self, prefix: &str) -> Option<Tracked<Namespace>> {
        self.namespaces.get_by_prefix(prefix).map(Tracked::new)
    }

    pub fn namespace_by_uri(&self, uri: &str) -> Option<Tracked<Namespace>> {
        self.namespaces.find_by_uri(uri).map(Tracked::new)
    }

    pub fn namespaces_by_uri(&self, uri: &str) -> Vec<Tracked<Namespace>> {
        self.namespaces
            .find_all_by_uri(uri)
            .into_iter()
            .map(Tracked::new)
            .collect()
    }

    pub fn namespaces(&self) -> Vec<Tracked<Namespace>> {
        self.namespaces.all().into_iter().map(Tracked::new).collect()
    }

    pub fn save_namespace(&self, tracked: Tracked<Namespace>) -> CatalogResult<Namespace> {
        let before = CatalogObject::Namespace(tracked.base().clone());
        let pre_diff = tracked.diff();
        self.notify(|l| l.on_pre_modify(&before, &pre_diff));

        let (value, diff) = tracked.commit()?;
        self.namespaces.update(value.clone())?;

        let after = CatalogObject::Namespace(value.clone());
        self.notify(|l| l.on_post_modify(&after, &diff));
        Ok(value)
    }

    pub fn remove_namespace(&self, namespace: &Namespace) -> Option<Namespace> {
        let removed = self.namespaces.remove(&namespace.id)?;
        self.notify(|l| l.on_removed(&CatalogObject::Namespace(removed.clone())));
        Some(removed)
    }

    pub fn default_namespace(&self) -> Option<Tracked<Namespace>> {
        self.namespaces.default().map(Tracked::new)
    }

    pub fn set_default_namespace(&self, namespace: Option<&Namespace>) {
        let old = self.namespaces.default().map(|ns| ns.id);
        let new = namespace.map(|ns| ns.id.clone());
        let change = DefaultChange::Namespace { old, new };
        self.notify(|l| l.on_pre_default_change(&change));
        self.namespaces.set_default(namespace);
        self.notify(|l| l.on_post_default_change(&change));
    }

    //
    // Stores
    //

    /// Add a store, resolving its workspace reference first. An
    /// unresolvable workspace is kept as a logged placeholder (ordered
    /// bulk load may add the workspace later).
    pub fn add_store(&self, mut store: Store) -> CatalogResult<Tracked<Store>> {
        resolver::resolve_store(self, &mut store);
        if !store.id.is_assigned() {
            store.id = ObjectId::generate(ObjectType::Store(store.kind));
        }
        self.stores.add(store.clone())?;
        debug!(id = %store.id, name = %store.name, kind = ?store.kind, "store added");
        self.notify(|l| l.on_added(&CatalogObject::Store(store.clone())));
        Ok(Tracked::new(store))
    }

    pub fn store(&self, id: &ObjectId, kind: Option<StoreKind>) -> Option<Tracked<Store>> {
        self.stores.get(id, kind).map(Tracked::new)
    }

    pub fn store_by_name(
        &self,
        scope: WorkspaceScope,
        name: &str,
        kind: Option<StoreKind>,
    ) -> Option<Tracked<Store>> {
        let found = match scope {
            WorkspaceScope::Any => self.stores.find_one_by_name(name, kind),
            // Stores are always workspace-scoped, so the global scope is
            // empty by construction.
            WorkspaceScope::Global => None,
            WorkspaceScope::Id(ws) => self.stores.get_by_name(&ws, name, kind),
        };
        found.map(Tracked::new)
    }

    /// Stores of a workspace; `None` means the default workspace.
    pub fn stores_by_workspace(
        &self,
        workspace: Option<&Workspace>,
        kind: Option<StoreKind>,
    ) -> Vec<Tracked<Store>> {
        let ws_id = match workspace {
            Some(ws) => Some(ws.id.clone()),
            None => self.workspaces.default().map(|ws| ws.id),
        };
        match ws_id {
            Some(id) => self
                .stores
                .find_all_by_workspace(&id, kind)
                .into_iter()
                .map(Tracked::new)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn stores(&self, kind: Option<StoreKind>) -> Vec<Tracked<Store>> {
        self.stores
            .find_all_by_kind(kind)
            .into_iter()
            .map(Tracked::new)
            .collect()
    }

    pub fn save_store(&self, tracked: Tracked<Store>) -> CatalogResult<Store> {
        let before = CatalogObject::Store(tracked.base().clone());
        let pre_diff = tracked.diff();
        self.notify(|l| l.on_pre_modify(&before, &pre_diff));

        let (value, diff) = tracked.commit()?;
        self.stores.update(value.clone())?;

        let after = CatalogObject::Store(value.clone());
        self.notify(|l| l.on_post_modify(&after, &diff));
        Ok(value)
    }

    pub fn remove_store(&self, store: &Store) -> Option<Store> {
        let removed = self.stores.remove(&store.id)?;
        self.notify(|l| l.on_removed(&CatalogObject::Store(removed.clone())));
        Some(removed)
    }

    pub fn default_data_store(&self, workspace: &Workspace) -> Option<Tracked<Store>> {
        self.stores
            .default_data_store(&workspace.id)
            .map(Tracked::new)
    }

    /// Change a workspace's default data store; the store must belong to
    /// that workspace.
    pub fn set_default_data_store(
        &self,
        workspace: &Workspace,
        store: Option<&Store>,
    ) -> CatalogResult<()> {
        if let Some(s) = store {
            if s.workspace.id() != &workspace.id {
                return Err(CatalogError::InvalidArgument(format!(
                    "store {:?} does not belong to workspace {:?}",
                    s.name, workspace.name
                )));
            }
        }
        let old = self.stores.default_data_store(&workspace.id).map(|s| s.id);
        let new = store.map(|s| s.id.clone());
        let change = DefaultChange::DataStore {
            workspace: workspace.id.clone(),
            old,
            new,
        };
        self.notify(|l| l.on_pre_default_change(&change));
        self.stores.set_default_data_store(&workspace.id, store);
        self.notify(|l| l.on_post_default_change(&change));
        Ok(())
    }

    //
    // Resources
    //

    pub fn add_resource(&self, mut resource: Resource) -> CatalogResult<Tracked<Resource>> {
        resolver::resolve_resource(self, &mut resource);
        if !resource.id.is_assigned() {
            resource.id = ObjectId::generate(ObjectType::Resource(resource.kind));
        }
        self.resources.add(resource.clone())?;
        debug!(id = %resource.id, name = %resource.name, kind = ?resource.kind, "resource added");
        self.notify(|l| l.on_added(&CatalogObject::Resource(resource.clone())));
        Ok(Tracked::new(resource))
    }

    pub fn resource(&self, id: &ObjectId, kind: Option<ResourceKind>) -> Option<Tracked<Resource>> {
        self.resources.get(id, kind).map(Tracked::new)
    }

    /// Resource lookup by name: scoped to a namespace, or first match in
    /// any namespace when `namespace` is `None`.
    pub fn resource_by_name(
        &self,
        namespace: Option<&Namespace>,
        name: &str,
        kind: Option<ResourceKind>,
    ) -> Option<Tracked<Resource>> {
        let found = match namespace {
            Some(ns) => self.resources.get_by_name(&ns.id, name, kind),
            None => self.resources.find_one_by_name(name, kind),
        };
        found.map(Tracked::new)
    }

    pub fn resources(&self, kind: Option<ResourceKind>) -> Vec<Tracked<Resource>> {
        self.resources
            .find_all_by_kind(kind)
            .into_iter()
            .map(Tracked::new)
            .collect()
    }

    pub fn resources_by_namespace(
        &self,
        namespace: &Namespace,
        kind: Option<ResourceKind>,
    ) -> Vec<Tracked<Resource>> {
        self.resources
            .find_all_by_namespace(&namespace.id, kind)
            .into_iter()
            .map(Tracked::new)
            .collect()
    }

    pub fn resources_by_store(
        &self,
        store: &Store,
        kind: Option<ResourceKind>,
    ) -> Vec<Tracked<Resource>> {
        self.resources
            .find_all_by_store(&store.id, kind)
            .into_iter()
            .map(Tracked::new)
            .collect()
    }

    pub fn resource_by_store_and_name(
        &self,
        store: &Store,
        name: &str,
        kind: Option<ResourceKind>,
    ) -> Option<Tracked<Resource>> {
        self.resources
            .find_by_store_and_name(&store.id, name, kind)
            .map(Tracked::new)
    }

    /// Commit a resource's pending changes. A qualified-name change moves
    /// the dependent layer's name entry in the same repository operation.
    pub fn save_resource(&self, tracked: Tracked<Resource>) -> CatalogResult<Resource> {
        let before = CatalogObject::Resource(tracked.base().clone());
        let pre_diff = tracked.diff();
        self.notify(|l| l.on_pre_modify(&before, &pre_diff));

        let (value, diff) = tracked.commit()?;
        self.resources.update(value.clone())?;

        let after = CatalogObject::Resource(value.clone());
        self.notify(|l| l.on_post_modify(&after, &diff));
        Ok(value)
    }

    pub fn remove_resource(&self, resource: &Resource) -> Option<Resource> {
        let removed = self.resources.remove(&resource.id)?;
        self.notify(|l| l.on_removed(&CatalogObject::Resource(removed.clone())));
        Some(removed)
    }

    //
    // Layers
    //

    /// Add a layer. Its backing resource must already be in the catalog:
    /// the layer's qualified name is the resource's, so there is nothing
    /// to index without it.
    pub fn add_layer(&self, mut layer: Layer) -> CatalogResult<Tracked<Layer>> {
        resolver::resolve_layer(self, &mut layer);
        let resource = self
            .resources
            .get(layer.resource.id(), None)
            .ok_or_else(|| {
                CatalogError::InvalidArgument(format!(
                    "layer resource {} is not in the catalog",
                    layer.resource.id()
                ))
            })?;
        if !layer.id.is_assigned() {
            layer.id = ObjectId::generate(ObjectType::Layer);
        }
        self.layers.add(layer.clone(), resource.qualified_name())?;
        debug!(id = %layer.id, resource = %resource.name, "layer added");
        self.notify(|l| l.on_added(&CatalogObject::Layer(layer.clone())));
        Ok(Tracked::new(layer))
    }

    pub fn layer(&self, id: &ObjectId) -> Option<Tracked<Layer>> {
        self.layers.get(id).map(Tracked::new)
    }

    /// Layer lookup by name. A layer's name is its resource's local name.
    pub fn layer_by_name(&self, name: &str) -> Option<Tracked<Layer>> {
        let resource = self.resources.find_one_by_name(name, None)?;
        self.layers
            .find_by_resource_name(&resource.qualified_name())
            .map(Tracked::new)
    }

    pub fn layers(&self) -> Vec<Tracked<Layer>> {
        self.layers.all().into_iter().map(Tracked::new).collect()
    }

    /// The layers publishing a resource: at most one, since layer and
    /// resource share a name.
    pub fn layers_by_resource(&self, resource: &Resource) -> Vec<Tracked<Layer>> {
        self.layers
            .find_by_resource_name(&resource.qualified_name())
            .into_iter()
            .map(Tracked::new)
            .collect()
    }

    pub fn layers_by_style(&self, style: &Style) -> Vec<Tracked<Layer>> {
        self.layers
            .find_all_by_style(&style.id)
            .into_iter()
            .map(Tracked::new)
            .collect()
    }

    pub fn save_layer(&self, tracked: Tracked<Layer>) -> CatalogResult<Layer> {
        let before = CatalogObject::Layer(tracked.base().clone());
        let pre_diff = tracked.diff();
        self.notify(|l| l.on_pre_modify(&before, &pre_diff));

        let (value, diff) = tracked.commit()?;
        let name = match self.resources.get(value.resource.id(), None) {
            Some(resource) => resource.qualified_name(),
            // Resource already gone: keep the name the layer is indexed
            // under rather than failing the save.
            None => self.layers.name_of(&value.id).ok_or(IndexError::NotFound {
                ty: "layer",
                id: value.id.clone(),
            })?,
        };
        self.layers.update(value.clone(), name)?;

        let after = CatalogObject::Layer(value.clone());
        self.notify(|l| l.on_post_modify(&after, &diff));
        Ok(value)
    }

    /// Remove a layer, keyed by its resource-derived name.
    pub fn remove_layer(&self, layer: &Layer) -> Option<Layer> {
        let name = self
            .resources
            .get(layer.resource.id(), None)
            .map(|r| r.qualified_name())
            .or_else(|| self.layers.name_of(&layer.id));
        let removed = match name {
            Some(name) => self.layers.remove_by_name(&name),
            None => self.layers.remove(&layer.id),
        }?;
        self.notify(|l| l.on_removed(&CatalogObject::Layer(removed.clone())));
        Some(removed)
    }

    //
    // Layer groups
    //

    pub fn add_layer_group(&self, mut group: LayerGroup) -> CatalogResult<Tracked<LayerGroup>> {
        resolver::resolve_layer_group(self, &mut group);
        if !group.id.is_assigned() {
            group.id = ObjectId::generate(ObjectType::LayerGroup);
        }
        self.layer_groups.add(group.clone())?;
        debug!(id = %group.id, name = %group.name, "layer group added");
        self.notify(|l| l.on_added(&CatalogObject::LayerGroup(group.clone())));
        Ok(Tracked::new(group))
    }

    pub fn layer_group(&self, id: &ObjectId) -> Option<Tracked<LayerGroup>> {
        self.layer_groups.get(id).map(Tracked::new)
    }

    pub fn layer_group_by_name(
        &self,
        scope: WorkspaceScope,
        name: &str,
    ) -> Option<Tracked<LayerGroup>> {
        let found = match scope {
            WorkspaceScope::Any => self.layer_groups.find_one_by_name(name),
            WorkspaceScope::Global => self.layer_groups.get_by_name(None, name),
            WorkspaceScope::Id(ws) => self.layer_groups.get_by_name(Some(&ws), name),
        };
        found.map(Tracked::new)
    }

    pub fn layer_groups(&self) -> Vec<Tracked<LayerGroup>> {
        self.layer_groups
            .all()
            .into_iter()
            .map(Tracked::new)
            .collect()
    }

    pub fn layer_groups_by_workspace(&self, scope: WorkspaceScope) -> Vec<Tracked<LayerGroup>> {
        let found = match scope {
            WorkspaceScope::Any => self.layer_groups.all(),
            WorkspaceScope::Global => self.layer_groups.find_all_global(),
            WorkspaceScope::Id(ws) => self.layer_groups.find_all_by_workspace(&ws),
        };
        found.into_iter().map(Tracked::new).collect()
    }

    pub fn save_layer_group(&self, tracked: Tracked<LayerGroup>) -> CatalogResult<LayerGroup> {
        let before = CatalogObject::LayerGroup(tracked.base().clone());
        let pre_diff = tracked.diff();
        self.notify(|l| l.on_pre_modify(&before, &pre_diff));

        let (value, diff) = tracked.commit()?;
        self.layer_groups.update(value.clone())?;

        let after = CatalogObject::LayerGroup(value.clone());
        self.notify(|l| l.on_post_modify(&after, &diff));
        Ok(value)
    }

    pub fn remove_layer_group(&self, group: &LayerGroup) -> Option<LayerGroup> {
        let removed = self.layer_groups.remove(&group.id)?;
        self.notify(|l| l.on_removed(&CatalogObject::LayerGroup(removed.clone())));
        Some(removed)
    }

    //
    // Styles
    //

    pub fn add_style(&self, mut style: Style) -> CatalogResult<Tracked<Style>> {
        resolver::resolve_style(self, &mut style);
        if !style.id.is_assigned() {
            style.id = ObjectId::generate(ObjectType::Style);
        }
        self.styles.add(style.clone())?;
        debug!(id = %style.id, name = %style.name, "style added");
        self.notify(|l| l.on_added(&CatalogObject::Style(style.clone())));
        Ok(Tracked::new(style))
    }

    pub fn style(&self, id: &ObjectId) -> Option<Tracked<Style>> {
        self.styles.get(id).map(Tracked::new)
    }

    /// Style lookup by name. With [`WorkspaceScope::Any`], global styles
    /// win over workspace-scoped ones of the same name.
    pub fn style_by_name(&self, scope: WorkspaceScope, name: &str) -> Option<Tracked<Style>> {
        let found = match scope {
            WorkspaceScope::Any => self
                .styles
                .get_by_name(None, name)
                .or_else(|| self.styles.find_one_by_name(name)),
            WorkspaceScope::Global => self.styles.get_by_name(None, name),
            WorkspaceScope::Id(ws) => self.styles.get_by_name(Some(&ws), name),
        };
        found.map(Tracked::new)
    }

    pub fn styles(&self) -> Vec<Tracked<Style>> {
        self.styles.all().into_iter().map(Tracked::new).collect()
    }

    pub fn styles_by_workspace(&self, scope: WorkspaceScope) -> Vec<Tracked<Style>> {
        let found = match scope {
            WorkspaceScope::Any => self.styles.all(),
            WorkspaceScope::Global => self.styles.find_all_global(),
            WorkspaceScope::Id(ws) => self.styles.find_all_by_workspace(&ws),
        };
        found.into_iter().map(Tracked::new).collect()
    }

    pub fn save_style(&self, tracked: Tracked<Style>) -> CatalogResult<Style> {
        let before = CatalogObject::Style(tracked.base().clone());
        let pre_diff = tracked.diff();
        self.notify(|l| l.on_pre_modify(&before, &pre_diff));

        let (value, diff) = tracked.commit()?;
        self.styles.update(value.clone())?;

        let after = CatalogObject::Style(value.clone());
        self.notify(|l| l.on_post_modify(&after, &diff));
        Ok(value)
    }

    pub fn remove_style(&self, style: &Style) -> Option<Style> {
        let removed = self.styles.remove(&style.id)?;
        self.notify(|l| l.on_removed(&CatalogObject::Style(removed.clone())));
        Some(removed)
    }

    //
    // Maps
    //

    pub fn add_map(&self, mut map: Map) -> CatalogResult<Tracked<Map>> {
        if !map.id.is_assigned() {
            map.id = ObjectId::generate(ObjectType::Map);
        }
        self.maps.add(map.clone())?;
        debug!(id = %map.id, name = %map.name, "map added");
        self.notify(|l| l.on_added(&CatalogObject::Map(map.clone())));
        Ok(Tracked::new(map))
    }

    pub fn map(&self, id: &ObjectId) -> Option<Tracked<Map>> {
        self.maps.get(id).map(Tracked::new)
    }

    pub fn map_by_name(&self, name: &str) -> Option<Tracked<Map>> {
        self.maps.get_by_name(name).map(Tracked::new)
    }

    pub fn maps(&self) -> Vec<Tracked<Map>> {
        self.maps.all().into_iter().map(Tracked::new).collect()
    }

    pub fn save_map(&self, tracked: Tracked<Map>) -> CatalogResult<Map> {
        let before = CatalogObject::Map(tracked.base().clone());
        let pre_diff = tracked.diff();
        self.notify(|l| l.on_pre_modify(&before, &pre_diff));

        let (value, diff) = tracked.commit()?;
        self.maps.update(value.clone())?;

        let after = CatalogObject::Map(value.clone());
        self.notify(|l| l.on_post_modify(&after, &diff));
        Ok(value)
    }

    pub fn remove_map(&self, map: &Map) -> Option<Map> {
        let removed = self.maps.remove(&map.id)?;
        self.notify(|l| l.on_removed(&CatalogObject::Map(removed.clone())));
        Some(removed)
    }

    //
    // Cross-type listing
    //

    fn collect(&self, selector: TypeSelector) -> Vec<CatalogObject> {
        match selector {
            TypeSelector::Workspace => self
                .workspaces
                .all()
                .into_iter()
                .map(CatalogObject::Workspace)
                .collect(),
            TypeSelector::Namespace => self
                .namespaces
                .all()
                .into_iter()
                .map(CatalogObject::Namespace)
                .collect(),
            TypeSelector::Store(kind) => self
                .stores
                .find_all_by_kind(kind)
                .into_iter()
                .map(CatalogObject::Store)
                .collect(),
            TypeSelector::Resource(kind) => self
                .resources
                .find_all_by_kind(kind)
                .into_iter()
                .map(CatalogObject::Resource)
                .collect(),
            TypeSelector::Layer => self
                .layers
                .all()
                .into_iter()
                .map(CatalogObject::Layer)
                .collect(),
            TypeSelector::LayerGroup => self
                .layer_groups
                .all()
                .into_iter()
                .map(CatalogObject::LayerGroup)
                .collect(),
            TypeSelector::Published => {
                let mut all: Vec<CatalogObject> = self
                    .layers
                    .all()
                    .into_iter()
                    .map(CatalogObject::Layer)
                    .collect();
                all.extend(
                    self.layer_groups
                        .all()
                        .into_iter()
                        .map(CatalogObject::LayerGroup),
                );
                all
            }
            TypeSelector::Style => self
                .styles
                .all()
                .into_iter()
                .map(CatalogObject::Style)
                .collect(),
            TypeSelector::Map => self.maps.all().into_iter().map(CatalogObject::Map).collect(),
        }
    }

    fn can_sort_selector(&self, selector: TypeSelector, path: &str) -> bool {
        match selector {
            TypeSelector::Workspace => can_sort(ObjectTypeGroup::Workspace, path),
            TypeSelector::Namespace => can_sort(ObjectTypeGroup::Namespace, path),
            TypeSelector::Store(_) => can_sort(ObjectTypeGroup::Store, path),
            TypeSelector::Resource(_) => can_sort(ObjectTypeGroup::Resource, path),
            TypeSelector::Layer => can_sort(ObjectTypeGroup::Layer, path),
            TypeSelector::LayerGroup => can_sort(ObjectTypeGroup::LayerGroup, path),
            TypeSelector::Published => {
                can_sort(ObjectTypeGroup::Layer, path) || can_sort(ObjectTypeGroup::LayerGroup, path)
            }
            TypeSelector::Style => can_sort(ObjectTypeGroup::Style, path),
            TypeSelector::Map => can_sort(ObjectTypeGroup::Map, path),
        }
    }

    /// Extract a sort key, walking dotted paths through reference hops
    /// via catalog lookups. Anything unresolvable keys as `Null`, which
    /// sorts first.
    fn sort_key(&self, object: &CatalogObject, path: &str) -> PropertyValue {
        let segments: Vec<&str> = path.split('.').collect();
        let mut current = object.clone();
        for (i, segment) in segments.iter().enumerate() {
            let value = match get_object_property(&current, segment) {
                Ok(v) => v,
                Err(_) => return PropertyValue::Null,
            };
            if i == segments.len() - 1 {
                return value;
            }
            match value {
                PropertyValue::Ref(r) => match self.object_by_group(r.ty().group(), r.id()) {
                    Some(next) => current = next,
                    None => return PropertyValue::Null,
                },
                _ => return PropertyValue::Null,
            }
        }
        PropertyValue::Null
    }

    /// List objects of a kind: validate sort keys, filter, apply a stable
    /// multi-key sort (rightmost key first, so the leftmost dominates;
    /// descending keys reverse their comparator; nulls first), then page
    /// with offset/count. The returned sequence must be released by the
    /// caller.
    pub fn list(
        &self,
        selector: TypeSelector,
        predicate: impl Fn(&CatalogObject) -> bool,
        offset: Option<usize>,
        count: Option<usize>,
        sorts: &[SortSpec],
    ) -> CatalogResult<CloseableIter<CatalogObject>> {
        for spec in sorts {
            if !self.can_sort_selector(selector, &spec.property) {
                return Err(CatalogError::InvalidArgument(format!(
                    "cannot sort {selector} by {:?}",
                    spec.property
                )));
            }
        }

        let mut items = self.collect(selector);
        items.retain(|o| predicate(o));

        for spec in sorts.iter().rev() {
            let mut keyed: Vec<(PropertyValue, CatalogObject)> = items
                .into_iter()
                .map(|o| (self.sort_key(&o, &spec.property), o))
                .collect();
            // Vec::sort_by is stable, so earlier (leftmost) passes are
            // preserved within equal keys of later ones.
            keyed.sort_by(|a, b| {
                let ord = a.0.cmp(&b.0);
                match spec.order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
            items = keyed.into_iter().map(|(_, o)| o).collect();
        }

        let skip = offset.unwrap_or(0);
        let items: Vec<CatalogObject> = match count {
            Some(limit) => items.into_iter().skip(skip).take(limit).collect(),
            None => items.into_iter().skip(skip).collect(),
        };
        Ok(CloseableIter::new(items))
    }

    /// Count objects of a kind matching a predicate.
    pub fn count(&self, selector: TypeSelector, predicate: impl Fn(&CatalogObject) -> bool) -> usize {
        self.collect(selector)
            .iter()
            .filter(|o| predicate(o))
            .count()
    }

    //
    // Bulk synchronization
    //

    /// Snapshot this catalog into another by wholesale index replacement,
    /// then re-propagate every default pointer. O(object kinds), not
    /// O(objects); the generic [`Catalog::replicate_into`] path produces
    /// equivalent content through the normal add pipeline.
    pub fn sync_to(&self, other: &Catalog) {
        self.workspaces.sync_to(&other.workspaces);
        other.workspaces.set_default(self.workspaces.default().as_ref());

        self.namespaces.sync_to(&other.namespaces);
        other.namespaces.set_default(self.namespaces.default().as_ref());

        self.stores.sync_to(&other.stores);
        other
            .stores
            .set_default_data_stores(self.stores.default_data_stores());

        self.resources.sync_to(&other.resources);
        self.layers.sync_to(&other.layers);
        self.layer_groups.sync_to(&other.layer_groups);
        self.styles.sync_to(&other.styles);
        self.maps.sync_to(&other.maps);
        debug!("catalog synchronized via index replacement");
    }

    /// Replicate this catalog into any sink by re-adding every object in
    /// dependency order, then re-establishing default pointers.
    pub fn replicate_into(&self, target: &dyn CatalogSink) -> CatalogResult<()> {
        for ws in self.workspaces.all() {
            target.import_workspace(ws)?;
        }
        for ns in self.namespaces.all() {
            target.import_namespace(ns)?;
        }
        for store in self.stores.all() {
            target.import_store(store)?;
        }
        for resource in self.resources.all() {
            target.import_resource(resource)?;
        }
        for style in self.styles.all() {
            target.import_style(style)?;
        }
        for layer in self.layers.all() {
            target.import_layer(layer)?;
        }
        for group in self.layer_groups.all() {
            target.import_layer_group(group)?;
        }
        for map in self.maps.all() {
            target.import_map(map)?;
        }

        target.import_default_workspace(self.workspaces.default().as_ref());
        target.import_default_namespace(self.namespaces.default().as_ref());
        for (ws_id, store) in self.stores.default_data_stores() {
            if let Some(ws) = self.workspaces.get(&ws_id) {
                target.import_default_data_store(&ws, &store)?;
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogSink for Catalog {
    fn import_workspace(&self, workspace: Workspace) -> CatalogResult<()> {
        self.add_workspace(workspace).map(|_| ())
    }

    fn import_namespace(&self, namespace: Namespace) -> CatalogResult<()> {
        self.add_namespace(namespace).map(|_| ())
    }

    fn import_store(&self, store: Store) -> CatalogResult<()> {
        self.add_store(store).map(|_| ())
    }

    fn import_resource(&self, resource: Resource) -> CatalogResult<()> {
        self.add_resource(resource).map(|_| ())
    }

    fn import_style(&self, style: Style) -> CatalogResult<()> {
        self.add_style(style).map(|_| ())
    }

    fn import_layer(&self, layer: Layer) -> CatalogResult<()> {
        self.add_layer(layer).map(|_| ())
    }

    fn import_layer_group(&self, group: LayerGroup) -> CatalogResult<()> {
        self.add_layer_group(group).map(|_| ())
    }

    fn import_map(&self, map: Map) -> CatalogResult<()> {
        self.add_map(map).map(|_| ())
    }

    fn import_default_workspace(&self, workspace: Option<&Workspace>) {
        self.set_default_workspace(workspace);
    }

    fn import_default_namespace(&self, namespace: Option<&Namespace>) {
        self.set_default_namespace(namespace);
    }

    fn import_default_data_store(
        &self,
        workspace: &Workspace,
        store: &Store,
    ) -> CatalogResult<()> {
        self.set_default_data_store(workspace, Some(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use atlas_types::Ref;

    fn add_workspace(catalog: &Catalog, name: &str) -> Workspace {
        catalog
            .add_workspace(Workspace::new(name))
            .unwrap()
            .base()
            .clone()
    }

    fn add_namespace(catalog: &Catalog, prefix: &str, uri: &str) -> Namespace {
        catalog
            .add_namespace(Namespace::new(prefix, uri))
            .unwrap()
            .base()
            .clone()
    }

    fn add_data_store(catalog: &Catalog, ws: &Workspace, name: &str) -> Store {
        let store = Store::new(
            StoreKind::Data,
            name,
            Ref::placeholder(ObjectType::Workspace, ws.id.clone()),
        );
        catalog.add_store(store).unwrap().base().clone()
    }

    fn add_feature_type(catalog: &Catalog, ns: &Namespace, store: &Store, name: &str) -> Resource {
        let resource = Resource::new(
            ResourceKind::FeatureType,
            name,
            Ref::placeholder(ObjectType::Namespace, ns.id.clone()),
            Ref::placeholder(ObjectType::Store(store.kind), store.id.clone()),
        );
        catalog.add_resource(resource).unwrap().base().clone()
    }

    fn add_layer_for(catalog: &Catalog, resource: &Resource) -> Layer {
        let layer = Layer::new(Ref::placeholder(
            ObjectType::Resource(resource.kind),
            resource.id.clone(),
        ));
        catalog.add_layer(layer).unwrap().base().clone()
    }

    fn add_style(catalog: &Catalog, name: &str) -> Style {
        catalog.add_style(Style::new(name)).unwrap().base().clone()
    }

    /// Records every notification it sees, in order.
    #[derive(Default)]
    struct RecordingListener {
        events: Mutex<Vec<String>>,
    }

    impl RecordingListener {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl CatalogListener for RecordingListener {
        fn on_added(&self, object: &CatalogObject) {
            self.events
                .lock()
                .unwrap()
                .push(format!("added:{}", object.id()));
        }

        fn on_pre_modify(&self, object: &CatalogObject, diff: &atlas_types::PropertyDiff) {
            self.events
                .lock()
                .unwrap()
                .push(format!("pre-modify:{}:{}", object.id(), diff.len()));
        }

        fn on_post_modify(&self, object: &CatalogObject, diff: &atlas_types::PropertyDiff) {
            self.events
                .lock()
                .unwrap()
                .push(format!("post-modify:{}:{}", object.id(), diff.len()));
        }

        fn on_removed(&self, object: &CatalogObject) {
            self.events
                .lock()
                .unwrap()
                .push(format!("removed:{}", object.id()));
        }

        fn on_pre_default_change(&self, change: &DefaultChange) {
            self.events
                .lock()
                .unwrap()
                .push(format!("pre-default:{change:?}"));
        }

        fn on_post_default_change(&self, change: &DefaultChange) {
            self.events
                .lock()
                .unwrap()
                .push(format!("post-default:{change:?}"));
        }
    }

    // -----------------------------------------------------------------------
    // Add / lookup
    // -----------------------------------------------------------------------

    #[test]
    fn add_assigns_id_and_indexes_immediately() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        assert!(ws.id.is_assigned());

        let by_id = catalog.workspace(&ws.id).unwrap();
        let by_name = catalog.workspace_by_name("topo").unwrap();
        assert_eq!(by_id, by_name);
        assert_eq!(by_id.base().name, "topo");
    }

    #[test]
    fn store_by_name_scenario() {
        let catalog = Catalog::new();
        let ws1 = add_workspace(&catalog, "ws1");
        let ds1 = add_data_store(&catalog, &ws1, "ds1");

        let found = catalog
            .store_by_name(WorkspaceScope::from(&ws1), "ds1", Some(StoreKind::Data))
            .unwrap();
        assert_eq!(found.id(), &ds1.id);

        // Removing ws1 must not silently delete ds1: no cascade here.
        catalog.remove_workspace(&ws1);
        assert!(catalog.store(&ds1.id, None).is_some());
    }

    #[test]
    fn store_workspace_reference_resolves_on_add() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let ds = add_data_store(&catalog, &ws, "roads");
        assert!(!ds.workspace.is_placeholder());

        // A store added before its workspace keeps the placeholder.
        let early = Store::new(
            StoreKind::Data,
            "early",
            Ref::placeholder(ObjectType::Workspace, ObjectId::new("ws-future")),
        );
        let early = catalog.add_store(early).unwrap();
        assert!(early.base().workspace.is_placeholder());
        // The name is still indexed under the referenced workspace id.
        assert!(catalog
            .store_by_name(
                WorkspaceScope::Id(ObjectId::new("ws-future")),
                "early",
                None
            )
            .is_some());
    }

    #[test]
    fn store_sub_kind_scoping() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let ds = add_data_store(&catalog, &ws, "roads");

        assert!(catalog.store(&ds.id, Some(StoreKind::Data)).is_some());
        assert!(catalog.store(&ds.id, Some(StoreKind::Coverage)).is_none());
        assert_eq!(catalog.stores(None).len(), 1);
        assert!(catalog.stores(Some(StoreKind::Wms)).is_empty());
    }

    #[test]
    fn layer_requires_its_resource() {
        let catalog = Catalog::new();
        let layer = Layer::new(Ref::placeholder(
            ObjectType::Resource(ResourceKind::FeatureType),
            ObjectId::new("ft-missing"),
        ));
        let err = catalog.add_layer(layer).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    // -----------------------------------------------------------------------
    // Change tracking through save
    // -----------------------------------------------------------------------

    #[test]
    fn uncommitted_changes_are_invisible_until_save() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "old");

        let mut tracked = catalog.workspace(&ws.id).unwrap();
        tracked
            .set("name", PropertyValue::Text("new".into()))
            .unwrap();

        // Still the old state in the catalog.
        assert_eq!(catalog.workspace(&ws.id).unwrap().base().name, "old");
        assert!(catalog.workspace_by_name("new").is_none());

        let saved = catalog.save_workspace(tracked).unwrap();
        assert_eq!(saved.name, "new");
        assert_eq!(catalog.workspace(&ws.id).unwrap().base().name, "new");
    }

    #[test]
    fn rename_via_save_moves_name_index() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "old");

        let mut tracked = catalog.workspace(&ws.id).unwrap();
        tracked
            .set("name", PropertyValue::Text("new".into()))
            .unwrap();
        catalog.save_workspace(tracked).unwrap();

        assert!(catalog.workspace_by_name("old").is_none());
        assert_eq!(catalog.workspace_by_name("new").unwrap().id(), &ws.id);
    }

    #[test]
    fn save_emits_exact_diff_in_pre_post_bracket() {
        let catalog = Catalog::new();
        let listener = Arc::new(RecordingListener::default());
        let ws = add_workspace(&catalog, "old");
        catalog.add_listener(listener.clone());

        let mut tracked = catalog.workspace(&ws.id).unwrap();
        tracked
            .set("name", PropertyValue::Text("mid".into()))
            .unwrap();
        tracked
            .set("name", PropertyValue::Text("new".into()))
            .unwrap();
        let diff = tracked.diff();
        assert_eq!(diff.len(), 1);
        let change = diff.iter().next().unwrap();
        assert_eq!(change.old, PropertyValue::Text("old".into()));
        assert_eq!(change.new, PropertyValue::Text("new".into()));

        catalog.save_workspace(tracked).unwrap();
        let events = listener.events();
        assert_eq!(
            events,
            vec![
                format!("pre-modify:{}:1", ws.id),
                format!("post-modify:{}:1", ws.id),
            ]
        );
    }

    #[test]
    fn resource_rename_keeps_layer_name_synchronized() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let ns = add_namespace(&catalog, "topo", "http://example.com/topo");
        let ds = add_data_store(&catalog, &ws, "postgis");
        let ft = add_feature_type(&catalog, &ns, &ds, "roads");
        let layer = add_layer_for(&catalog, &ft);

        assert_eq!(catalog.layer_by_name("roads").unwrap().id(), &layer.id);

        let mut tracked = catalog.resource(&ft.id, None).unwrap();
        tracked
            .set("name", PropertyValue::Text("streets".into()))
            .unwrap();
        catalog.save_resource(tracked).unwrap();

        // Old name unresolvable, new name finds the same layer.
        assert!(catalog.layer_by_name("roads").is_none());
        assert_eq!(catalog.layer_by_name("streets").unwrap().id(), &layer.id);
    }

    #[test]
    fn save_on_removed_object_fails_not_found() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "gone");
        let tracked = catalog.workspace(&ws.id).unwrap();
        catalog.remove_workspace(&ws);

        let err = catalog.save_workspace(tracked).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Index(IndexError::NotFound { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Remove
    // -----------------------------------------------------------------------

    #[test]
    fn remove_clears_both_indices() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        catalog.remove_workspace(&ws);
        assert!(catalog.workspace(&ws.id).is_none());
        assert!(catalog.workspace_by_name("topo").is_none());
    }

    #[test]
    fn remove_layer_is_keyed_by_resource_name() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let ns = add_namespace(&catalog, "topo", "http://example.com/topo");
        let ds = add_data_store(&catalog, &ws, "postgis");
        let ft = add_feature_type(&catalog, &ns, &ds, "roads");
        let layer = add_layer_for(&catalog, &ft);

        assert!(catalog.remove_layer(&layer).is_some());
        assert!(catalog.layer(&layer.id).is_none());
        // Second removal is a no-op.
        assert!(catalog.remove_layer(&layer).is_none());
    }

    // -----------------------------------------------------------------------
    // Default pointers
    // -----------------------------------------------------------------------

    #[test]
    fn removing_default_workspace_clears_only_that_pointer() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let ns = add_namespace(&catalog, "topo", "http://example.com/topo");
        catalog.set_default_workspace(Some(&ws));
        catalog.set_default_namespace(Some(&ns));

        catalog.remove_workspace(&ws);
        assert!(catalog.default_workspace().is_none());
        // The namespace default is untouched.
        assert_eq!(catalog.default_namespace().unwrap().id(), &ns.id);
    }

    #[test]
    fn removing_default_data_store_clears_pointer() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let ds = add_data_store(&catalog, &ws, "postgis");
        catalog.set_default_data_store(&ws, Some(&ds)).unwrap();
        assert_eq!(catalog.default_data_store(&ws).unwrap().id(), &ds.id);

        catalog.remove_store(&ds);
        assert!(catalog.default_data_store(&ws).is_none());
    }

    #[test]
    fn default_data_store_workspace_mismatch_is_rejected() {
        let catalog = Catalog::new();
        let ws1 = add_workspace(&catalog, "a");
        let ws2 = add_workspace(&catalog, "b");
        let ds = add_data_store(&catalog, &ws1, "postgis");

        let err = catalog.set_default_data_store(&ws2, Some(&ds)).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[test]
    fn default_changes_fire_pre_post_pair() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let listener = Arc::new(RecordingListener::default());
        catalog.add_listener(listener.clone());

        catalog.set_default_workspace(Some(&ws));
        let events = listener.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].starts_with("pre-default:"));
        assert!(events[1].starts_with("post-default:"));
        assert!(events[0].contains("Workspace"));
    }

    #[test]
    fn add_and_remove_notifications() {
        let catalog = Catalog::new();
        let listener = Arc::new(RecordingListener::default());
        catalog.add_listener(listener.clone());

        let ws = add_workspace(&catalog, "topo");
        catalog.remove_workspace(&ws);

        assert_eq!(
            listener.events(),
            vec![format!("added:{}", ws.id), format!("removed:{}", ws.id)]
        );
    }

    // -----------------------------------------------------------------------
    // Styles
    // -----------------------------------------------------------------------

    #[test]
    fn style_by_name_prefers_global() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let global = add_style(&catalog, "polygon");
        let mut scoped = Style::new("polygon");
        scoped.workspace = Some(Ref::placeholder(ObjectType::Workspace, ws.id.clone()));
        let scoped = catalog.add_style(scoped).unwrap().base().clone();

        let any = catalog
            .style_by_name(WorkspaceScope::Any, "polygon")
            .unwrap();
        assert_eq!(any.id(), &global.id);

        let in_ws = catalog
            .style_by_name(WorkspaceScope::from(&ws), "polygon")
            .unwrap();
        assert_eq!(in_ws.id(), &scoped.id);
    }

    // -----------------------------------------------------------------------
    // Listing, sorting, paging
    // -----------------------------------------------------------------------

    #[test]
    fn list_sorts_and_pages() {
        let catalog = Catalog::new();
        add_workspace(&catalog, "charlie");
        add_workspace(&catalog, "alpha");
        add_workspace(&catalog, "bravo");

        let names = |iter: CloseableIter<CatalogObject>| -> Vec<String> {
            iter.map(|o| match o {
                CatalogObject::Workspace(ws) => ws.name,
                _ => unreachable!(),
            })
            .collect()
        };

        let asc = catalog
            .list(
                TypeSelector::Workspace,
                |_| true,
                None,
                None,
                &[SortSpec::asc("name")],
            )
            .unwrap();
        assert_eq!(names(asc), vec!["alpha", "bravo", "charlie"]);

        let desc = catalog
            .list(
                TypeSelector::Workspace,
                |_| true,
                None,
                None,
                &[SortSpec::desc("name")],
            )
            .unwrap();
        assert_eq!(names(desc), vec!["charlie", "bravo", "alpha"]);

        let page = catalog
            .list(
                TypeSelector::Workspace,
                |_| true,
                Some(1),
                Some(1),
                &[SortSpec::asc("name")],
            )
            .unwrap();
        assert_eq!(names(page), vec!["bravo"]);
    }

    #[test]
    fn list_rejects_unsortable_property() {
        let catalog = Catalog::new();
        let err = catalog
            .list(
                TypeSelector::Workspace,
                |_| true,
                None,
                None,
                &[SortSpec::asc("bogus")],
            )
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[test]
    fn list_filters_before_paging() {
        let catalog = Catalog::new();
        add_workspace(&catalog, "keep-1");
        add_workspace(&catalog, "drop");
        add_workspace(&catalog, "keep-2");

        let kept = catalog
            .list(
                TypeSelector::Workspace,
                |o| matches!(o, CatalogObject::Workspace(ws) if ws.name.starts_with("keep")),
                None,
                None,
                &[SortSpec::asc("name")],
            )
            .unwrap();
        assert_eq!(kept.count(), 2);
    }

    #[test]
    fn multi_key_sort_is_stable_and_leftmost_dominates() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let ns = add_namespace(&catalog, "topo", "http://example.com/topo");
        let ds = add_data_store(&catalog, &ws, "postgis");

        for (name, enabled) in [("b", false), ("a", true), ("c", false), ("d", true)] {
            let mut r = Resource::new(
                ResourceKind::FeatureType,
                name,
                Ref::placeholder(ObjectType::Namespace, ns.id.clone()),
                Ref::placeholder(ObjectType::Store(StoreKind::Data), ds.id.clone()),
            );
            r.enabled = enabled;
            catalog.add_resource(r).unwrap();
        }

        // enabled ascending (false < true) dominates, then name.
        let sorted = catalog
            .list(
                TypeSelector::Resource(None),
                |_| true,
                None,
                None,
                &[SortSpec::asc("enabled"), SortSpec::asc("name")],
            )
            .unwrap();
        let names: Vec<String> = sorted
            .map(|o| match o {
                CatalogObject::Resource(r) => r.name,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn null_sorts_before_any_value() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let ns = add_namespace(&catalog, "topo", "http://example.com/topo");
        let ds = add_data_store(&catalog, &ws, "postgis");

        let titled = add_feature_type(&catalog, &ns, &ds, "titled");
        let mut tracked = catalog.resource(&titled.id, None).unwrap();
        tracked
            .set("title", PropertyValue::Text("A title".into()))
            .unwrap();
        catalog.save_resource(tracked).unwrap();
        add_feature_type(&catalog, &ns, &ds, "untitled");

        let sorted = catalog
            .list(
                TypeSelector::Resource(None),
                |_| true,
                None,
                None,
                &[SortSpec::asc("title")],
            )
            .unwrap();
        let first = sorted.into_iter().next().unwrap();
        match first {
            CatalogObject::Resource(r) => assert_eq!(r.name, "untitled"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn dotted_sort_walks_reference_hops() {
        let catalog = Catalog::new();
        let ws_b = add_workspace(&catalog, "beta");
        let ws_a = add_workspace(&catalog, "alpha");
        add_data_store(&catalog, &ws_b, "in-beta");
        add_data_store(&catalog, &ws_a, "in-alpha");

        let sorted = catalog
            .list(
                TypeSelector::Store(None),
                |_| true,
                None,
                None,
                &[SortSpec::asc("workspace.name")],
            )
            .unwrap();
        let names: Vec<String> = sorted
            .map(|o| match o {
                CatalogObject::Store(s) => s.name,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["in-alpha", "in-beta"]);
    }

    #[test]
    fn published_selector_combines_layers_and_groups() {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let ns = add_namespace(&catalog, "topo", "http://example.com/topo");
        let ds = add_data_store(&catalog, &ws, "postgis");
        let ft = add_feature_type(&catalog, &ns, &ds, "roads");
        add_layer_for(&catalog, &ft);
        catalog
            .add_layer_group(LayerGroup::new("basemap"))
            .unwrap();

        assert_eq!(catalog.count(TypeSelector::Published, |_| true), 2);
        assert_eq!(catalog.count(TypeSelector::Layer, |_| true), 1);
        assert_eq!(catalog.count(TypeSelector::LayerGroup, |_| true), 1);
    }

    #[test]
    fn closeable_sequence_stops_after_close() {
        let catalog = Catalog::new();
        add_workspace(&catalog, "a");
        add_workspace(&catalog, "b");

        let mut iter = catalog
            .list(TypeSelector::Workspace, |_| true, None, None, &[])
            .unwrap();
        assert!(iter.next().is_some());
        iter.close();
        assert!(iter.next().is_none());
    }

    // -----------------------------------------------------------------------
    // Synchronization
    // -----------------------------------------------------------------------

    fn build_source() -> Catalog {
        let catalog = Catalog::new();
        let ws = add_workspace(&catalog, "topo");
        let ns = add_namespace(&catalog, "topo", "http://example.com/topo");
        let ds = add_data_store(&catalog, &ws, "postgis");
        let ft = add_feature_type(&catalog, &ns, &ds, "roads");
        add_layer_for(&catalog, &ft);
        add_style(&catalog, "line");
        catalog.add_layer_group(LayerGroup::new("base")).unwrap();
        catalog.add_map(Map::new("world")).unwrap();
        catalog.set_default_workspace(Some(&ws));
        catalog.set_default_namespace(Some(&ns));
        catalog.set_default_data_store(&ws, Some(&ds)).unwrap();
        catalog
    }

    fn assert_catalogs_equivalent(source: &Catalog, target: &Catalog) {
        for selector in [
            TypeSelector::Workspace,
            TypeSelector::Namespace,
            TypeSelector::Store(None),
            TypeSelector::Resource(None),
            TypeSelector::Layer,
            TypeSelector::LayerGroup,
            TypeSelector::Style,
            TypeSelector::Map,
        ] {
            let mut source_ids: Vec<ObjectId> = source
                .list(selector, |_| true, None, None, &[])
                .unwrap()
                .map(|o| o.id().clone())
                .collect();
            let mut target_ids: Vec<ObjectId> = target
                .list(selector, |_| true, None, None, &[])
                .unwrap()
                .map(|o| o.id().clone())
                .collect();
            source_ids.sort();
            target_ids.sort();
            assert_eq!(source_ids, target_ids, "object sets differ for {selector}");
        }

        assert_eq!(
            source.default_workspace().map(|ws| ws.id().clone()),
            target.default_workspace().map(|ws| ws.id().clone())
        );
        assert_eq!(
            source.default_namespace().map(|ns| ns.id().clone()),
            target.default_namespace().map(|ns| ns.id().clone())
        );
        let ws = source.default_workspace().unwrap().base().clone();
        assert_eq!(
            source.default_data_store(&ws).map(|s| s.id().clone()),
            target.default_data_store(&ws).map(|s| s.id().clone())
        );

        // Name resolution agrees on both sides.
        assert_eq!(
            source.workspace_by_name("topo").unwrap().id(),
            target.workspace_by_name("topo").unwrap().id()
        );
        assert_eq!(
            source.layer_by_name("roads").unwrap().id(),
            target.layer_by_name("roads").unwrap().id()
        );
        assert_eq!(
            source
                .style_by_name(WorkspaceScope::Any, "line")
                .unwrap()
                .id(),
            target
                .style_by_name(WorkspaceScope::Any, "line")
                .unwrap()
                .id()
        );
    }

    #[test]
    fn sync_to_replaces_target_content() {
        let source = build_source();
        let target = Catalog::new();
        add_workspace(&target, "stale");

        source.sync_to(&target);
        assert!(target.workspace_by_name("stale").is_none());
        assert_catalogs_equivalent(&source, &target);
    }

    #[test]
    fn generic_replication_is_equivalent_to_sync() {
        let source = build_source();

        let optimized = Catalog::new();
        source.sync_to(&optimized);

        let generic = Catalog::new();
        source.replicate_into(&generic).unwrap();

        assert_catalogs_equivalent(&source, &optimized);
        assert_catalogs_equivalent(&source, &generic);
        assert_catalogs_equivalent(&optimized, &generic);
    }

    #[test]
    fn count_matches_list() {
        let catalog = Catalog::new();
        add_workspace(&catalog, "a");
        add_workspace(&catalog, "b");

        let listed = catalog
            .list(TypeSelector::Workspace, |_| true, None, None, &[])
            .unwrap()
            .count();
        assert_eq!(listed, catalog.count(TypeSelector::Workspace, |_| true));
    }
}
