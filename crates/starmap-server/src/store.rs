//! `GalaxyStore` over the SpacetimeDB tables of the current reducer.
//!
//! Every reducer runs in one transaction, so the check-then-populate
//! sequence in starmap-logic is atomic here. Batch inserts still verify
//! `(parent, x, y)` uniqueness and return an error, which rolls the
//! transaction back.

use crate::tables::*;
use spacetimedb::{ReducerContext, Table};
use starmap_logic::error::StoreError;
use starmap_logic::model as m;
use starmap_logic::store::{check_batch_unique, GalaxyStore};
use starmap_logic::type_tables::StarType;

pub struct DbStore<'a> {
    ctx: &'a ReducerContext,
}

impl<'a> DbStore<'a> {
    pub fn new(ctx: &'a ReducerContext) -> Self {
        Self { ctx }
    }
}

fn galaxy_row(g: Galaxy) -> m::Galaxy {
    m::Galaxy {
        id: g.id,
        number: g.number,
        group_id: g.group_id,
    }
}

fn sector_row(s: Sector) -> m::Sector {
    m::Sector {
        id: s.id,
        galaxy_id: s.galaxy_id,
        x: s.x,
        y: s.y,
    }
}

/// Rows with an unknown star type are corrupt; callers log and drop them.
fn system_row(s: StarSystem) -> Result<m::StarSystem, StoreError> {
    let star_type = StarType::try_from(s.star_type)?;
    Ok(m::StarSystem {
        id: s.id,
        sector_id: s.sector_id,
        x: s.x,
        y: s.y,
        star_type,
        star_size: s.star_size,
        star_color: s.star_color,
    })
}

fn readable_system(s: StarSystem) -> Option<m::StarSystem> {
    let id = s.id;
    system_row(s)
        .map_err(|e| log::error!("Star system {}: {}", id, e))
        .ok()
}

fn planet_row(p: Planet) -> m::Planet {
    m::Planet {
        id: p.id,
        system_id: p.system_id,
        planet_type_id: p.planet_type_id,
        x: p.x,
        y: p.y,
    }
}

fn planet_type_row(t: PlanetType) -> m::PlanetType {
    m::PlanetType {
        id: t.id,
        name: t.name,
        category: t.category,
        habitable: t.habitable,
        mineral_yield: t.mineral_yield,
        energy_yield: t.energy_yield,
        food_yield: t.food_yield,
        research_yield: t.research_yield,
        description: t.description,
    }
}

impl GalaxyStore for DbStore<'_> {
    fn galaxy(&self, id: u64) -> Option<m::Galaxy> {
        self.ctx.db.galaxy().id().find(id).map(galaxy_row)
    }

    fn galaxies(&self) -> Vec<m::Galaxy> {
        self.ctx.db.galaxy().iter().map(galaxy_row).collect()
    }

    fn insert_galaxy(&mut self, galaxy: m::NewGalaxy) -> Result<m::Galaxy, StoreError> {
        let row = self.ctx.db.galaxy().insert(Galaxy {
            id: 0,
            number: galaxy.number,
            group_id: galaxy.group_id,
        });
        Ok(galaxy_row(row))
    }

    fn sector(&self, id: u64) -> Option<m::Sector> {
        self.ctx.db.sector().id().find(id).map(sector_row)
    }

    fn sectors_in_galaxy(&self, galaxy_id: u64) -> Vec<m::Sector> {
        self.ctx
            .db
            .sector()
            .galaxy_id()
            .filter(galaxy_id)
            .map(sector_row)
            .collect()
    }

    fn insert_sectors(&mut self, sectors: Vec<m::NewSector>) -> Result<usize, StoreError> {
        let mut taken = Vec::new();
        let mut parents: Vec<u64> = sectors.iter().map(|s| s.galaxy_id).collect();
        parents.sort_unstable();
        parents.dedup();
        for galaxy_id in parents {
            if self.ctx.db.galaxy().id().find(galaxy_id).is_none() {
                return Err(StoreError::MissingParent(galaxy_id));
            }
            taken.extend(
                self.ctx
                    .db
                    .sector()
                    .galaxy_id()
                    .filter(galaxy_id)
                    .map(|s| (s.galaxy_id, s.x, s.y)),
            );
        }
        check_batch_unique(taken, sectors.iter().map(|s| (s.galaxy_id, s.x, s.y)))?;

        let count = sectors.len();
        for s in sectors {
            self.ctx.db.sector().insert(Sector {
                id: 0,
                galaxy_id: s.galaxy_id,
                x: s.x,
                y: s.y,
            });
        }
        Ok(count)
    }

    fn star_system(&self, id: u64) -> Option<m::StarSystem> {
        self.ctx.db.star_system().id().find(id).and_then(readable_system)
    }

    fn systems_in_sector(&self, sector_id: u64) -> Vec<m::StarSystem> {
        self.ctx
            .db
            .star_system()
            .sector_id()
            .filter(sector_id)
            .filter_map(readable_system)
            .collect()
    }

    fn system_count(&self, sector_id: u64) -> usize {
        self.ctx
            .db
            .star_system()
            .sector_id()
            .filter(sector_id)
            .count()
    }

    fn insert_star_systems(&mut self, systems: Vec<m::NewStarSystem>) -> Result<usize, StoreError> {
        let mut taken = Vec::new();
        let mut parents: Vec<u64> = systems.iter().map(|s| s.sector_id).collect();
        parents.sort_unstable();
        parents.dedup();
        for sector_id in parents {
            if self.ctx.db.sector().id().find(sector_id).is_none() {
                return Err(StoreError::MissingParent(sector_id));
            }
            taken.extend(
                self.ctx
                    .db
                    .star_system()
                    .sector_id()
                    .filter(sector_id)
                    .map(|s| (s.sector_id, s.x, s.y)),
            );
        }
        check_batch_unique(taken, systems.iter().map(|s| (s.sector_id, s.x, s.y)))?;

        let count = systems.len();
        for s in systems {
            self.ctx.db.star_system().insert(StarSystem {
                id: 0,
                sector_id: s.sector_id,
                x: s.x,
                y: s.y,
                star_type: s.star_type as u8,
                star_size: s.star_size,
                star_color: s.star_color,
            });
        }
        Ok(count)
    }

    fn planets_in_system(&self, system_id: u64) -> Vec<m::Planet> {
        self.ctx
            .db
            .planet()
            .system_id()
            .filter(system_id)
            .map(planet_row)
            .collect()
    }

    fn planet_count(&self, system_id: u64) -> usize {
        self.ctx.db.planet().system_id().filter(system_id).count()
    }

    fn insert_planets(&mut self, planets: Vec<m::NewPlanet>) -> Result<usize, StoreError> {
        let mut taken = Vec::new();
        let mut parents: Vec<u64> = planets.iter().map(|p| p.system_id).collect();
        parents.sort_unstable();
        parents.dedup();
        for system_id in parents {
            if self.ctx.db.star_system().id().find(system_id).is_none() {
                return Err(StoreError::MissingParent(system_id));
            }
            taken.extend(
                self.ctx
                    .db
                    .planet()
                    .system_id()
                    .filter(system_id)
                    .map(|p| (p.system_id, p.x, p.y)),
            );
        }
        check_batch_unique(taken, planets.iter().map(|p| (p.system_id, p.x, p.y)))?;

        let count = planets.len();
        for p in planets {
            self.ctx.db.planet().insert(Planet {
                id: 0,
                system_id: p.system_id,
                planet_type_id: p.planet_type_id,
                x: p.x,
                y: p.y,
            });
        }
        Ok(count)
    }

    fn planet_types(&self) -> Vec<m::PlanetType> {
        self.ctx.db.planet_type().iter().map(planet_type_row).collect()
    }

    fn planet_type(&self, id: u64) -> Option<m::PlanetType> {
        self.ctx.db.planet_type().id().find(id).map(planet_type_row)
    }
}
