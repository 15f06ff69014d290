//! Accessor tables wiring [`PropertyAccess`] to each concrete kind.
//!
//! Tables are built once per type on first use. Property names follow the
//! field names; `id` is listed (it is a legal sort key) but immutable.

use std::sync::OnceLock;

use crate::error::TypeError;
use crate::model::{Layer, LayerGroup, Map, Namespace, Resource, Store, Style, Workspace};
use crate::object::ObjectTypeGroup;
use crate::property::{PropertyAccess, PropertyKind, PropertySpec, PropertyValue};

fn immutable_id<T>(_: &mut T, _: PropertyValue) -> Result<(), TypeError> {
    Err(TypeError::ImmutableProperty {
        property: "id".to_string(),
    })
}

impl PropertyAccess for Workspace {
    const TYPE_NAME: &'static str = "workspace";

    fn properties() -> &'static [PropertySpec<Self>] {
        static TABLE: OnceLock<Vec<PropertySpec<Workspace>>> = OnceLock::new();
        TABLE.get_or_init(|| {
            vec![
                PropertySpec {
                    name: "id",
                    kind: PropertyKind::Id,
                    get: |o| PropertyValue::Id(o.id.clone()),
                    set: immutable_id,
                },
                PropertySpec {
                    name: "name",
                    kind: PropertyKind::Text,
                    get: |o| PropertyValue::Text(o.name.clone()),
                    set: |o, v| {
                        o.name = v.into_text("name")?;
                        Ok(())
                    },
                },
            ]
        })
    }
}

impl PropertyAccess for Namespace {
    const TYPE_NAME: &'static str = "namespace";

    fn properties() -> &'static [PropertySpec<Self>] {
        static TABLE: OnceLock<Vec<PropertySpec<Namespace>>> = OnceLock::new();
        TABLE.get_or_init(|| {
            vec![
                PropertySpec {
                    name: "id",
                    kind: PropertyKind::Id,
                    get: |o| PropertyValue::Id(o.id.clone()),
                    set: immutable_id,
                },
                PropertySpec {
                    name: "prefix",
                    kind: PropertyKind::Text,
                    get: |o| PropertyValue::Text(o.prefix.clone()),
                    set: |o, v| {
                        o.prefix = v.into_text("prefix")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "uri",
                    kind: PropertyKind::Text,
                    get: |o| PropertyValue::Text(o.uri.clone()),
                    set: |o, v| {
                        o.uri = v.into_text("uri")?;
                        Ok(())
                    },
                },
            ]
        })
    }
}

impl PropertyAccess for Store {
    const TYPE_NAME: &'static str = "store";

    fn properties() -> &'static [PropertySpec<Self>] {
        static TABLE: OnceLock<Vec<PropertySpec<Store>>> = OnceLock::new();
        TABLE.get_or_init(|| {
            vec![
                PropertySpec {
                    name: "id",
                    kind: PropertyKind::Id,
                    get: |o| PropertyValue::Id(o.id.clone()),
                    set: immutable_id,
                },
                PropertySpec {
                    name: "name",
                    kind: PropertyKind::Text,
                    get: |o| PropertyValue::Text(o.name.clone()),
                    set: |o, v| {
                        o.name = v.into_text("name")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "enabled",
                    kind: PropertyKind::Bool,
                    get: |o| PropertyValue::Bool(o.enabled),
                    set: |o, v| {
                        o.enabled = v.into_bool("enabled")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "workspace",
                    kind: PropertyKind::Reference(ObjectTypeGroup::Workspace),
                    get: |o| PropertyValue::Ref(o.workspace.clone()),
                    set: |o, v| {
                        o.workspace = v.into_ref("workspace")?;
                        Ok(())
                    },
                },
            ]
        })
    }
}

impl PropertyAccess for Resource {
    const TYPE_NAME: &'static str = "resource";

    fn properties() -> &'static [PropertySpec<Self>] {
        static TABLE: OnceLock<Vec<PropertySpec<Resource>>> = OnceLock::new();
        TABLE.get_or_init(|| {
            vec![
                PropertySpec {
                    name: "id",
                    kind: PropertyKind::Id,
                    get: |o| PropertyValue::Id(o.id.clone()),
                    set: immutable_id,
                },
                PropertySpec {
                    name: "name",
                    kind: PropertyKind::Text,
                    get: |o| PropertyValue::Text(o.name.clone()),
                    set: |o, v| {
                        o.name = v.into_text("name")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "title",
                    kind: PropertyKind::OptionalText,
                    get: |o| PropertyValue::opt_text(o.title.as_deref()),
                    set: |o, v| {
                        o.title = v.into_opt_text("title")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "enabled",
                    kind: PropertyKind::Bool,
                    get: |o| PropertyValue::Bool(o.enabled),
                    set: |o, v| {
                        o.enabled = v.into_bool("enabled")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "namespace",
                    kind: PropertyKind::Reference(ObjectTypeGroup::Namespace),
                    get: |o| PropertyValue::Ref(o.namespace.clone()),
                    set: |o, v| {
                        o.namespace = v.into_ref("namespace")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "store",
                    kind: PropertyKind::Reference(ObjectTypeGroup::Store),
                    get: |o| PropertyValue::Ref(o.store.clone()),
                    set: |o, v| {
                        o.store = v.into_ref("store")?;
                        Ok(())
                    },
                },
            ]
        })
    }
}

impl PropertyAccess for Layer {
    const TYPE_NAME: &'static str = "layer";

    fn properties() -> &'static [PropertySpec<Self>] {
        static TABLE: OnceLock<Vec<PropertySpec<Layer>>> = OnceLock::new();
        TABLE.get_or_init(|| {
            vec![
                PropertySpec {
                    name: "id",
                    kind: PropertyKind::Id,
                    get: |o| PropertyValue::Id(o.id.clone()),
                    set: immutable_id,
                },
                PropertySpec {
                    name: "resource",
                    kind: PropertyKind::Reference(ObjectTypeGroup::Resource),
                    get: |o| PropertyValue::Ref(o.resource.clone()),
                    set: |o, v| {
                        o.resource = v.into_ref("resource")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "default_style",
                    kind: PropertyKind::OptionalReference(ObjectTypeGroup::Style),
                    get: |o| PropertyValue::opt_ref(o.default_style.as_ref()),
                    set: |o, v| {
                        o.default_style = v.into_opt_ref("default_style")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "styles",
                    kind: PropertyKind::ReferenceList,
                    get: |o| PropertyValue::RefList(o.styles.clone()),
                    set: |o, v| {
                        o.styles = v.into_ref_list("styles")?;
                        Ok(())
                    },
                },
            ]
        })
    }
}

impl PropertyAccess for LayerGroup {
    const TYPE_NAME: &'static str = "layergroup";

    fn properties() -> &'static [PropertySpec<Self>] {
        static TABLE: OnceLock<Vec<PropertySpec<LayerGroup>>> = OnceLock::new();
        TABLE.get_or_init(|| {
            vec![
                PropertySpec {
                    name: "id",
                    kind: PropertyKind::Id,
                    get: |o| PropertyValue::Id(o.id.clone()),
                    set: immutable_id,
                },
                PropertySpec {
                    name: "name",
                    kind: PropertyKind::Text,
                    get: |o| PropertyValue::Text(o.name.clone()),
                    set: |o, v| {
                        o.name = v.into_text("name")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "workspace",
                    kind: PropertyKind::OptionalReference(ObjectTypeGroup::Workspace),
                    get: |o| PropertyValue::opt_ref(o.workspace.as_ref()),
                    set: |o, v| {
                        o.workspace = v.into_opt_ref("workspace")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "members",
                    kind: PropertyKind::ReferenceList,
                    get: |o| PropertyValue::RefList(o.members.clone()),
                    set: |o, v| {
                        o.members = v.into_ref_list("members")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "styles",
                    kind: PropertyKind::ReferenceList,
                    get: |o| PropertyValue::RefList(o.styles.clone()),
                    set: |o, v| {
                        o.styles = v.into_ref_list("styles")?;
                        Ok(())
                    },
                },
            ]
        })
    }
}

impl PropertyAccess for Style {
    const TYPE_NAME: &'static str = "style";

    fn properties() -> &'static [PropertySpec<Self>] {
        static TABLE: OnceLock<Vec<PropertySpec<Style>>> = OnceLock::new();
        TABLE.get_or_init(|| {
            vec![
                PropertySpec {
                    name: "id",
                    kind: PropertyKind::Id,
                    get: |o| PropertyValue::Id(o.id.clone()),
                    set: immutable_id,
                },
                PropertySpec {
                    name: "name",
                    kind: PropertyKind::Text,
                    get: |o| PropertyValue::Text(o.name.clone()),
                    set: |o, v| {
                        o.name = v.into_text("name")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "workspace",
                    kind: PropertyKind::OptionalReference(ObjectTypeGroup::Workspace),
                    get: |o| PropertyValue::opt_ref(o.workspace.as_ref()),
                    set: |o, v| {
                        o.workspace = v.into_opt_ref("workspace")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "filename",
                    kind: PropertyKind::OptionalText,
                    get: |o| PropertyValue::opt_text(o.filename.as_deref()),
                    set: |o, v| {
                        o.filename = v.into_opt_text("filename")?;
                        Ok(())
                    },
                },
            ]
        })
    }
}

impl PropertyAccess for Map {
    const TYPE_NAME: &'static str = "map";

    fn properties() -> &'static [PropertySpec<Self>] {
        static TABLE: OnceLock<Vec<PropertySpec<Map>>> = OnceLock::new();
        TABLE.get_or_init(|| {
            vec![
                PropertySpec {
                    name: "id",
                    kind: PropertyKind::Id,
                    get: |o| PropertyValue::Id(o.id.clone()),
                    set: immutable_id,
                },
                PropertySpec {
                    name: "name",
                    kind: PropertyKind::Text,
                    get: |o| PropertyValue::Text(o.name.clone()),
                    set: |o, v| {
                        o.name = v.into_text("name")?;
                        Ok(())
                    },
                },
                PropertySpec {
                    name: "enabled",
                    kind: PropertyKind::Bool,
                    get: |o| PropertyValue::Bool(o.enabled),
                    set: |o, v| {
                        o.enabled = v.into_bool("enabled")?;
                        Ok(())
                    },
                },
            ]
        })
    }
}

/// Read a property off a type-erased object.
pub fn get_object_property(
    object: &crate::object::CatalogObject,
    property: &str,
) -> Result<PropertyValue, TypeError> {
    use crate::object::CatalogObject;
    match object {
        CatalogObject::Workspace(o) => o.get_property(property),
        CatalogObject::Namespace(o) => o.get_property(property),
        CatalogObject::Store(o) => o.get_property(property),
        CatalogObject::Resource(o) => o.get_property(property),
        CatalogObject::Layer(o) => o.get_property(property),
        CatalogObject::LayerGroup(o) => o.get_property(property),
        CatalogObject::Style(o) => o.get_property(property),
        CatalogObject::Map(o) => o.get_property(property),
    }
}
