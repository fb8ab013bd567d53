//! Lifecycle reducers: module init and client connections.

use crate::tables::*;
use spacetimedb::{reducer, ReducerContext, Table};
use starmap_logic::catalog::default_planet_types;

// ============================================================================
// LIFECYCLE
// ============================================================================

/// Seed the planet type catalog on a fresh database
#[reducer(init)]
pub fn init(ctx: &ReducerContext) {
    seed_planet_types(ctx);
}

/// Called when a client connects
#[reducer(client_connected)]
pub fn client_connected(ctx: &ReducerContext) {
    log::info!("Client connected: {:?}", ctx.sender);
}

/// Called when a client disconnects
#[reducer(client_disconnected)]
pub fn client_disconnected(ctx: &ReducerContext) {
    log::info!("Client disconnected: {:?}", ctx.sender);
}

// ============================================================================
// REFERENCE DATA
// ============================================================================

/// Insert the default planet types unless a catalog already exists.
fn seed_planet_types(ctx: &ReducerContext) {
    if ctx.db.planet_type().count() > 0 {
        log::info!("Planet type catalog already seeded");
        return;
    }

    let types = default_planet_types();
    let count = types.len();
    for t in types {
        ctx.db.planet_type().insert(PlanetType {
            id: 0,
            name: t.name,
            category: t.category,
            habitable: t.habitable,
            mineral_yield: t.mineral_yield,
            energy_yield: t.energy_yield,
            food_yield: t.food_yield,
            research_yield: t.research_yield,
            description: t.description,
        });
    }
    log::info!("Seeded {} planet types", count);
}
