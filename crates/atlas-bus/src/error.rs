use thiserror::Error;

/// Errors produced by bus operations.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus is closed")]
    Closed,

    #[error("invalid service configuration: {0}")]
    Config(String),
}
