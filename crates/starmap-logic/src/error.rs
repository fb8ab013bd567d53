//! Error types for storage and generation.

use thiserror::Error;

/// Failures raised by a [`GalaxyStore`](crate::store::GalaxyStore).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A record already occupies `(parent, x, y)`; the whole batch was rejected.
    #[error("position ({x}, {y}) already occupied under parent {parent}")]
    Conflict { parent: u64, x: u32, y: u32 },
    #[error("parent record {0} does not exist")]
    MissingParent(u64),
    #[error("snapshot error: {0}")]
    Snapshot(String),
    /// A stored row holds a value no record type can represent.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("galaxy {0} not found")]
    GalaxyNotFound(u64),
    #[error("sector {0} not found")]
    SectorNotFound(u64),
    #[error("star system {0} not found")]
    SystemNotFound(u64),
    #[error("planet type catalog is empty")]
    EmptyCatalog,
    #[error("density multiplier must be a finite, non-negative number (got {0})")]
    InvalidDensityMultiplier(f64),
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),
    /// Only raised under [`PlacementPolicy::Strict`](crate::config::PlacementPolicy::Strict).
    #[error("placement budget exhausted: placed {placed} of {target}")]
    PlacementExhausted { placed: u32, target: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}
