use thiserror::Error;

/// Errors produced by property access and type-level operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("{ty} has no property named {property:?}")]
    UnknownProperty { ty: &'static str, property: String },

    #[error("property {property:?} expects a {expected} value")]
    TypeMismatch {
        property: String,
        expected: &'static str,
    },

    #[error("property {property:?} is immutable")]
    ImmutableProperty { property: String },
}
