//! Pure galaxy generation logic for Starmap.
//!
//! This crate contains the procedural generation engine, independent of any
//! database, engine, or runtime. Every operation works against the
//! [`store::GalaxyStore`] trait and an injected `rand::Rng`, making it
//! unit-testable and portable across SpacetimeDB (WASM) and native tools.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`bulk`] | Populate every empty sector of a galaxy, one commit per sector |
//! | [`catalog`] | Default planet-type catalog for seeding stores |
//! | [`config`] | Generation tuning and placement truncation policy |
//! | [`constants`] | Grid sizes, caps, star type and band ids (u8) |
//! | [`density`] | Radial + spiral-arm density field over the sector grid |
//! | [`error`] | Store and generation error types |
//! | [`galaxy`] | Galaxy creation with its full sector grid |
//! | [`model`] | Galaxy, sector, system, planet and planet-type records |
//! | [`placement`] | Collision-avoiding random placement |
//! | [`queries`] | Read views: listings, density map, statistics |
//! | [`sector`] | Star system population of one sector |
//! | [`store`] | Storage capability trait and in-memory store |
//! | [`system`] | Planet population of one star system |
//! | [`type_tables`] | Weighted star-type table and band preferences |

pub mod bulk;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod density;
pub mod error;
pub mod galaxy;
pub mod model;
pub mod placement;
pub mod queries;
pub mod sector;
pub mod store;
pub mod system;
pub mod type_tables;
