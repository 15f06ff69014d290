use atlas_index::IndexError;
use atlas_types::TypeError;
use thiserror::Error;

/// Errors surfaced by catalog facade operations.
///
/// Storage-layer errors pass through unchanged; invalid arguments fail the
/// call synchronously.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Property(#[from] TypeError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
