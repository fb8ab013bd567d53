//! Starmap Server - SpacetimeDB Module
//!
//! Persistent galaxy map running as a SpacetimeDB module.
//! Generation runs here as reducers; clients read the public tables.

mod generation;
mod reducers;
mod store;
mod tables;

pub use generation::*;
pub use reducers::*;
pub use tables::*;
