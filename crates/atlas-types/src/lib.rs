//! Foundation types for the Atlas catalog.
//!
//! This crate provides the catalog object model and the supporting types
//! used throughout the Atlas system. Every other Atlas crate depends on
//! `atlas-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Opaque, globally unique object identifier
//! - [`ObjectType`] — Closed set of catalog object kinds (with store and
//!   resource sub-kinds)
//! - [`CatalogObject`] — Type-erased union over the eight concrete kinds
//! - [`QualifiedName`] — `(scope, local-name)` secondary lookup key, scoped
//!   by stable id rather than display name
//! - [`Ref`] — A reference to another catalog object, either resolved or a
//!   placeholder pending resolution
//! - [`PropertyAccess`] — Per-type static accessor tables for generic
//!   property get/set, sorting, and diffing
//! - [`PropertyDiff`] — Ordered property-level change list emitted by saves

pub mod access;
pub mod error;
pub mod id;
pub mod model;
pub mod name;
pub mod object;
pub mod property;
pub mod reference;

pub use access::get_object_property;
pub use error::TypeError;
pub use id::ObjectId;
pub use model::{Layer, LayerGroup, Map, Namespace, Resource, Store, Style, Workspace};
pub use name::QualifiedName;
pub use object::{CatalogObject, ObjectType, ObjectTypeGroup, ResourceKind, StoreKind};
pub use property::{
    property_kind_of, PropertyAccess, PropertyChange, PropertyDiff, PropertyKind, PropertySpec,
    PropertyValue,
};
pub use reference::Ref;
