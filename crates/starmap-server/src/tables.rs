//! SpacetimeDB table definitions for the galaxy hierarchy.
//!
//! Each table mirrors a record from starmap-logic's `model`, stored in
//! SpacetimeDB for persistence and client sync.

use crate::generation::run_sector_generation_job;
use spacetimedb::{table, ScheduleAt};

// ============================================================================
// SPATIAL HIERARCHY
// ============================================================================

/// Galaxy - top-level container of a 10×10 sector grid
#[table(name = galaxy, public)]
#[derive(Clone)]
pub struct Galaxy {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[unique]
    pub number: u32,
    pub group_id: Option<String>,
}

/// Sector - one cell of a galaxy grid
#[table(name = sector, public)]
#[derive(Clone)]
pub struct Sector {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[index(btree)]
    pub galaxy_id: u64,
    pub x: u32,
    pub y: u32,
}

/// Star system - one star inside a 100×100 sector
#[table(name = star_system, public)]
#[derive(Clone)]
pub struct StarSystem {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[index(btree)]
    pub sector_id: u64,
    pub x: u32,
    pub y: u32,
    pub star_type: u8,      // star_types::*
    pub star_size: f64,
    pub star_color: String, // #RRGGBB
}

/// Planet - one body inside a 9×9 star system
#[table(name = planet, public)]
#[derive(Clone)]
pub struct Planet {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[index(btree)]
    pub system_id: u64,
    pub planet_type_id: u64, // FK → PlanetType
    pub x: u32,
    pub y: u32,
}

// ============================================================================
// REFERENCE DATA
// ============================================================================

/// Planet type catalog (seeded once, read-only to generation)
#[table(name = planet_type, public)]
#[derive(Clone)]
pub struct PlanetType {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    pub name: String,
    pub category: String,
    pub habitable: bool,
    pub mineral_yield: f32,
    pub energy_yield: f32,
    pub food_yield: f32,
    pub research_yield: f32,
    pub description: String,
}

// ============================================================================
// BULK GENERATION
// ============================================================================

/// Progress of the latest whole-galaxy generation run
#[table(name = galaxy_generation, public)]
#[derive(Clone)]
pub struct GalaxyGeneration {
    #[primary_key]
    pub galaxy_id: u64,
    pub density_multiplier: f64,
    pub sectors_queued: u32,
    pub sectors_done: u32,
    pub sectors_skipped: u32, // already populated, at queue time or when the job ran
    pub sectors_failed: u32,
    pub jobs_pending: u32,    // 0 once the run is finished
    pub systems_created: u64,
}

/// One pending sector population; each runs in its own transaction
#[table(name = sector_generation_job, scheduled(run_sector_generation_job))]
#[derive(Clone)]
pub struct SectorGenerationJob {
    #[primary_key]
    #[auto_inc]
    pub scheduled_id: u64,
    pub scheduled_at: ScheduleAt,
    pub galaxy_id: u64,
    #[index(btree)]
    pub sector_id: u64,
    pub density_multiplier: f64,
}
