//! Catalog facade for the Atlas metadata catalog.
//!
//! [`Catalog`] is the single entry point over the per-type repositories of
//! `atlas-index`. It provides:
//!
//! - CRUD for every catalog object kind, with forward-reference resolution
//!   on add and id assignment for detached objects
//! - Change tracking: every lookup hands out a [`Tracked`] wrapper whose
//!   mutations stay invisible until `save_*` commits them, emitting a
//!   property-level diff
//! - Pre/post mutation notifications through [`CatalogListener`]
//! - Default workspace / namespace / data-store pointers with the same
//!   pre/post notification bracket as saves
//! - Cross-type listing with filtering, validated multi-key sorting, and
//!   offset/limit pagination ([`Catalog::list`])
//! - Bulk synchronization between catalogs: an optimized index-replacement
//!   path ([`Catalog::sync_to`]) and a generic re-add path
//!   ([`Catalog::replicate_into`]) that produce equivalent results

pub mod catalog;
pub mod error;
pub mod listener;
pub mod resolver;
pub mod sort;
pub mod tracked;

pub use catalog::{Catalog, CatalogSink, TypeSelector, WorkspaceScope};
pub use error::{CatalogError, CatalogResult};
pub use listener::{CatalogListener, DefaultChange};
pub use resolver::resolve_ref;
pub use sort::{CloseableIter, SortOrder, SortSpec};
pub use tracked::Tracked;
