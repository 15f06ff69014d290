//! Forward-reference resolution against a live catalog.
//!
//! Objects may be constructed holding placeholder references to targets
//! that are not yet in the catalog (ordered bulk import adds stores
//! before their workspaces, for example). On `add`, every outward
//! reference is run through [`resolve_ref`]: placeholders whose target
//! now exists are flipped to resolved; misses are logged at info level
//! and kept as placeholders, never treated as errors, since they may
//! legitimately resolve later.

use tracing::info;

use atlas_types::{Layer, LayerGroup, Ref, Resource, Store, Style};

use crate::catalog::Catalog;

/// Resolve a single reference against the catalog.
///
/// Already-resolved references pass through unchanged.
pub fn resolve_ref(catalog: &Catalog, reference: Ref) -> Ref {
    if !reference.is_placeholder() {
        return reference;
    }
    if catalog.contains(reference.ty(), reference.id()) {
        reference.into_resolved()
    } else {
        info!(%reference, "reference target not yet in catalog, keeping placeholder");
        reference
    }
}

pub(crate) fn resolve_store(catalog: &Catalog, store: &mut Store) {
    store.workspace = resolve_ref(catalog, store.workspace.clone());
}

pub(crate) fn resolve_resource(catalog: &Catalog, resource: &mut Resource) {
    resource.namespace = resolve_ref(catalog, resource.namespace.clone());
    resource.store = resolve_ref(catalog, resource.store.clone());
}

pub(crate) fn resolve_layer(catalog: &Catalog, layer: &mut Layer) {
    layer.resource = resolve_ref(catalog, layer.resource.clone());
    if let Some(style) = layer.default_style.take() {
        layer.default_style = Some(resolve_ref(catalog, style));
    }
    for style in &mut layer.styles {
        *style = resolve_ref(catalog, style.clone());
    }
}

pub(crate) fn resolve_layer_group(catalog: &Catalog, group: &mut LayerGroup) {
    if let Some(ws) = group.workspace.take() {
        group.workspace = Some(resolve_ref(catalog, ws));
    }
    for member in &mut group.members {
        *member = resolve_ref(catalog, member.clone());
    }
    for style in &mut group.styles {
        *style = resolve_ref(catalog, style.clone());
    }
}

pub(crate) fn resolve_style(catalog: &Catalog, style: &mut Style) {
    if let Some(ws) = style.workspace.take() {
        style.workspace = Some(resolve_ref(catalog, ws));
    }
}
