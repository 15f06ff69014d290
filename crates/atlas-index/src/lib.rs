//! Indexed repositories for the Atlas catalog.
//!
//! This crate owns the authoritative in-memory storage for catalog
//! objects. The core is [`CatalogLookup`], a concurrent triple index
//! (by id, by qualified name, and id-to-name reverse) guarded by a single
//! lock per object type, so readers never observe an id present with a
//! stale name or vice versa.
//!
//! On top of the generic lookup sit strongly-typed repositories, one per
//! concrete object kind, composed explicitly by the catalog facade:
//!
//! - [`WorkspaceRepository`] / [`NamespaceRepository`] — carry the
//!   default-workspace / default-namespace pointers
//! - [`StoreRepository`] — sub-kind filtered lookups and the per-workspace
//!   default data store map
//! - [`ResourceRepository`] — keeps the dependent layer's name-index entry
//!   in sync when a resource is renamed
//! - [`LayerRepository`] — name entries derived from the backing resource;
//!   removal is keyed by name first
//! - [`LayerGroupRepository`], [`StyleRepository`], [`MapRepository`]

pub mod error;
pub mod lookup;
pub mod repository;

pub use error::{IndexError, IndexResult};
pub use lookup::{CatalogLookup, Keyed};
pub use repository::{
    LayerGroupRepository, LayerRepository, MapRepository, NamespaceRepository,
    ResourceRepository, StoreRepository, StyleRepository, WorkspaceRepository,
};
