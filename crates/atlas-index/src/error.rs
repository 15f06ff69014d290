use atlas_types::{ObjectId, QualifiedName};
use thiserror::Error;

/// Errors produced by repository index operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("{ty} with id {id} does not exist")]
    NotFound { ty: &'static str, id: ObjectId },

    #[error("{ty} with id {id} is already indexed")]
    DuplicateId { ty: &'static str, id: ObjectId },

    #[error("a {ty} named {name} already exists")]
    DuplicateName {
        ty: &'static str,
        name: QualifiedName,
    },

    #[error("cannot index a detached {ty}: no id assigned")]
    UnassignedId { ty: &'static str },
}

/// Result alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
