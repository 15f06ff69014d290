use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::ObjectId;
use crate::model::{Layer, LayerGroup, Map, Namespace, Resource, Store, Style, Workspace};
use crate::name::QualifiedName;

/// Sub-kinds of [`Store`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StoreKind {
    /// Vector data store.
    Data,
    /// Raster coverage store.
    Coverage,
    /// Cascaded WMS store.
    Wms,
    /// Cascaded WMTS store.
    Wmts,
}

/// Sub-kinds of [`Resource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Vector feature type published from a data store.
    FeatureType,
    /// Raster coverage published from a coverage store.
    Coverage,
    /// Layer cascaded from a remote WMS.
    WmsLayer,
    /// Layer cascaded from a remote WMTS.
    WmtsLayer,
}

/// Type tag for catalog objects. Fixed at creation.
///
/// This is a closed set: every operation that dispatches on object type
/// does so with an exhaustive `match`, so a missing mapping is a compile
/// error rather than a runtime default-throw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectType {
    Workspace,
    Namespace,
    Store(StoreKind),
    Resource(ResourceKind),
    Layer,
    LayerGroup,
    Style,
    Map,
}

/// Object type with store/resource sub-kinds erased.
///
/// Used where only the family matters: reference targets in property
/// tables and repository selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectTypeGroup {
    Workspace,
    Namespace,
    Store,
    Resource,
    Layer,
    LayerGroup,
    Style,
    Map,
}

impl ObjectType {
    /// This type's family, with sub-kinds erased.
    pub fn group(&self) -> ObjectTypeGroup {
        match self {
            Self::Workspace => ObjectTypeGroup::Workspace,
            Self::Namespace => ObjectTypeGroup::Namespace,
            Self::Store(_) => ObjectTypeGroup::Store,
            Self::Resource(_) => ObjectTypeGroup::Resource,
            Self::Layer => ObjectTypeGroup::Layer,
            Self::LayerGroup => ObjectTypeGroup::LayerGroup,
            Self::Style => ObjectTypeGroup::Style,
            Self::Map => ObjectTypeGroup::Map,
        }
    }

    /// Prefix used when generating ids for objects of this type.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::Namespace => "namespace",
            Self::Store(StoreKind::Data) => "datastore",
            Self::Store(StoreKind::Coverage) => "coveragestore",
            Self::Store(StoreKind::Wms) => "wmsstore",
            Self::Store(StoreKind::Wmts) => "wmtsstore",
            Self::Resource(ResourceKind::FeatureType) => "featuretype",
            Self::Resource(ResourceKind::Coverage) => "coverage",
            Self::Resource(ResourceKind::WmsLayer) => "wmslayer",
            Self::Resource(ResourceKind::WmtsLayer) => "wmtslayer",
            Self::Layer => "layer",
            Self::LayerGroup => "layergroup",
            Self::Style => "style",
            Self::Map => "map",
        }
    }

    /// Returns `true` for any store sub-kind.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Returns `true` for any resource sub-kind.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(_))
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Type-erased union over the eight concrete catalog object kinds.
///
/// Used wherever the original design would dispatch on a runtime class:
/// cross-type listing, event payloads, and bulk import.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CatalogObject {
    Workspace(Workspace),
    Namespace(Namespace),
    Store(Store),
    Resource(Resource),
    Layer(Layer),
    LayerGroup(LayerGroup),
    Style(Style),
    Map(Map),
}

impl CatalogObject {
    /// The object's id.
    pub fn id(&self) -> &ObjectId {
        match self {
            Self::Workspace(o) => &o.id,
            Self::Namespace(o) => &o.id,
            Self::Store(o) => &o.id,
            Self::Resource(o) => &o.id,
            Self::Layer(o) => &o.id,
            Self::LayerGroup(o) => &o.id,
            Self::Style(o) => &o.id,
            Self::Map(o) => &o.id,
        }
    }

    /// The object's type tag, including store/resource sub-kinds.
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Workspace(_) => ObjectType::Workspace,
            Self::Namespace(_) => ObjectType::Namespace,
            Self::Store(o) => ObjectType::Store(o.kind),
            Self::Resource(o) => ObjectType::Resource(o.kind),
            Self::Layer(_) => ObjectType::Layer,
            Self::LayerGroup(_) => ObjectType::LayerGroup,
            Self::Style(_) => ObjectType::Style,
            Self::Map(_) => ObjectType::Map,
        }
    }

    /// The object's qualified name, when derivable from the object alone.
    ///
    /// Layers return `None`: a layer's name is its resource's name, which
    /// requires a catalog lookup to compute.
    pub fn qualified_name(&self) -> Option<QualifiedName> {
        match self {
            Self::Workspace(o) => Some(o.qualified_name()),
            Self::Namespace(o) => Some(o.qualified_name()),
            Self::Store(o) => Some(o.qualified_name()),
            Self::Resource(o) => Some(o.qualified_name()),
            Self::Layer(_) => None,
            Self::LayerGroup(o) => Some(o.qualified_name()),
            Self::Style(o) => Some(o.qualified_name()),
            Self::Map(o) => Some(o.qualified_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Ref;

    #[test]
    fn object_type_carries_sub_kind() {
        let ws = Workspace::new("topo");
        let store = Store::new(
            StoreKind::Coverage,
            "dem",
            Ref::placeholder(ObjectType::Workspace, ObjectId::new("ws-1")),
        );
        assert_eq!(
            CatalogObject::Workspace(ws).object_type(),
            ObjectType::Workspace
        );
        assert_eq!(
            CatalogObject::Store(store).object_type(),
            ObjectType::Store(StoreKind::Coverage)
        );
    }

    #[test]
    fn layer_has_no_self_derivable_name() {
        let layer = Layer::new(Ref::placeholder(
            ObjectType::Resource(ResourceKind::FeatureType),
            ObjectId::new("ft-1"),
        ));
        assert!(CatalogObject::Layer(layer).qualified_name().is_none());
    }

    #[test]
    fn display_uses_prefix() {
        assert_eq!(ObjectType::Store(StoreKind::Wmts).to_string(), "wmtsstore");
        assert_eq!(
            ObjectType::Resource(ResourceKind::FeatureType).to_string(),
            "featuretype"
        );
    }
}
