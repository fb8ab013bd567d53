//! Storage capability used by every generation component.
//!
//! [`GalaxyStore`] is the seam between generation logic and whatever holds
//! the records: SpacetimeDB tables on the server, [`MemoryStore`] in tests
//! and native tools. Batch inserts are all-or-nothing and reject any record
//! whose `(parent, x, y)` is already taken, which is what keeps concurrent
//! populations of the same region from duplicating it.

use std::collections::{BTreeMap, HashSet};
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::*;

pub trait GalaxyStore {
    fn galaxy(&self, id: u64) -> Option<Galaxy>;
    fn galaxies(&self) -> Vec<Galaxy>;
    fn insert_galaxy(&mut self, galaxy: NewGalaxy) -> Result<Galaxy, StoreError>;

    fn sector(&self, id: u64) -> Option<Sector>;
    fn sectors_in_galaxy(&self, galaxy_id: u64) -> Vec<Sector>;
    fn insert_sectors(&mut self, sectors: Vec<NewSector>) -> Result<usize, StoreError>;

    fn star_system(&self, id: u64) -> Option<StarSystem>;
    fn systems_in_sector(&self, sector_id: u64) -> Vec<StarSystem>;
    fn insert_star_systems(&mut self, systems: Vec<NewStarSystem>) -> Result<usize, StoreError>;

    fn planets_in_system(&self, system_id: u64) -> Vec<Planet>;
    fn insert_planets(&mut self, planets: Vec<NewPlanet>) -> Result<usize, StoreError>;

    fn planet_types(&self) -> Vec<PlanetType>;

    fn planet_type(&self, id: u64) -> Option<PlanetType> {
        self.planet_types().into_iter().find(|t| t.id == id)
    }

    fn system_count(&self, sector_id: u64) -> usize {
        self.systems_in_sector(sector_id).len()
    }

    fn planet_count(&self, system_id: u64) -> usize {
        self.planets_in_system(system_id).len()
    }
}

/// Reject a batch if any `(parent, x, y)` is taken or repeated within the batch.
pub fn check_batch_unique(
    taken: impl IntoIterator<Item = (u64, u32, u32)>,
    batch: impl IntoIterator<Item = (u64, u32, u32)>,
) -> Result<(), StoreError> {
    let mut occupied: HashSet<(u64, u32, u32)> = taken.into_iter().collect();
    for (parent, x, y) in batch {
        if !occupied.insert((parent, x, y)) {
            return Err(StoreError::Conflict { parent, x, y });
        }
    }
    Ok(())
}

/// Version number for snapshot format (increment when format changes)
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Tables {
    next_id: u64,
    galaxies: BTreeMap<u64, Galaxy>,
    sectors: BTreeMap<u64, Sector>,
    systems: BTreeMap<u64, StarSystem>,
    planets: BTreeMap<u64, Planet>,
    planet_types: BTreeMap<u64, PlanetType>,
    // parent id -> child ids
    sectors_by_galaxy: BTreeMap<u64, Vec<u64>>,
    systems_by_sector: BTreeMap<u64, Vec<u64>>,
    planets_by_system: BTreeMap<u64, Vec<u64>>,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    tables: Tables,
}

/// In-process store with the same constraints as the server tables.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Tables,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a planet-type catalog. Incoming ids are replaced.
    pub fn with_planet_types(types: Vec<PlanetType>) -> Self {
        let mut store = Self::new();
        store.seed_planet_types(types);
        store
    }

    /// Stand-in for the external catalog seeder.
    pub fn seed_planet_types(&mut self, types: Vec<PlanetType>) {
        for mut planet_type in types {
            planet_type.id = self.alloc_id();
            self.tables.planet_types.insert(planet_type.id, planet_type);
        }
    }

    pub fn total_systems(&self) -> usize {
        self.tables.systems.len()
    }

    pub fn total_planets(&self) -> usize {
        self.tables.planets.len()
    }

    /// Write a versioned bincode snapshot of every table.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            tables: self.tables.clone(),
        };
        bincode::serialize_into(writer, &snapshot).map_err(|e| StoreError::Snapshot(e.to_string()))
    }

    /// Restore a store written by [`MemoryStore::save`].
    pub fn load<R: Read>(reader: R) -> Result<Self, StoreError> {
        let snapshot: Snapshot =
            bincode::deserialize_from(reader).map_err(|e| StoreError::Snapshot(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::Snapshot(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        Ok(Self {
            tables: snapshot.tables,
        })
    }

    fn alloc_id(&mut self) -> u64 {
        self.tables.next_id += 1;
        self.tables.next_id
    }

    fn children<T: Clone>(
        index: &BTreeMap<u64, Vec<u64>>,
        rows: &BTreeMap<u64, T>,
        parent: u64,
    ) -> Vec<T> {
        index
            .get(&parent)
            .map(|ids| ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
            .unwrap_or_default()
    }
}

impl GalaxyStore for MemoryStore {
    fn galaxy(&self, id: u64) -> Option<Galaxy> {
        self.tables.galaxies.get(&id).cloned()
    }

    fn galaxies(&self) -> Vec<Galaxy> {
        self.tables.galaxies.values().cloned().collect()
    }

    fn insert_galaxy(&mut self, galaxy: NewGalaxy) -> Result<Galaxy, StoreError> {
        let row = Galaxy {
            id: self.alloc_id(),
            number: galaxy.number,
            group_id: galaxy.group_id,
        };
        self.tables.galaxies.insert(row.id, row.clone());
        Ok(row)
    }

    fn sector(&self, id: u64) -> Option<Sector> {
        self.tables.sectors.get(&id).copied()
    }

    fn sectors_in_galaxy(&self, galaxy_id: u64) -> Vec<Sector> {
        Self::children(
            &self.tables.sectors_by_galaxy,
            &self.tables.sectors,
            galaxy_id,
        )
    }

    fn insert_sectors(&mut self, sectors: Vec<NewSector>) -> Result<usize, StoreError> {
        for s in &sectors {
            if !self.tables.galaxies.contains_key(&s.galaxy_id) {
                return Err(StoreError::MissingParent(s.galaxy_id));
            }
        }
        let taken: Vec<_> = sectors
            .iter()
            .map(|s| s.galaxy_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .flat_map(|g| self.sectors_in_galaxy(g))
            .map(|s| (s.galaxy_id, s.x, s.y))
            .collect();
        check_batch_unique(taken, sectors.iter().map(|s| (s.galaxy_id, s.x, s.y)))?;

        let count = sectors.len();
        for s in sectors {
            let id = self.alloc_id();
            self.tables.sectors.insert(
                id,
                Sector {
                    id,
                    galaxy_id: s.galaxy_id,
                    x: s.x,
                    y: s.y,
                },
            );
            self.tables
                .sectors_by_galaxy
                .entry(s.galaxy_id)
                .or_default()
                .push(id);
        }
        Ok(count)
    }

    fn star_system(&self, id: u64) -> Option<StarSystem> {
        self.tables.systems.get(&id).cloned()
    }

    fn systems_in_sector(&self, sector_id: u64) -> Vec<StarSystem> {
        Self::children(
            &self.tables.systems_by_sector,
            &self.tables.systems,
            sector_id,
        )
    }

    fn system_count(&self, sector_id: u64) -> usize {
        self.tables
            .systems_by_sector
            .get(&sector_id)
            .map_or(0, Vec::len)
    }

    fn insert_star_systems(&mut self, systems: Vec<NewStarSystem>) -> Result<usize, StoreError> {
        for s in &systems {
            if !self.tables.sectors.contains_key(&s.sector_id) {
                return Err(StoreError::MissingParent(s.sector_id));
            }
        }
        let taken: Vec<_> = systems
            .iter()
            .map(|s| s.sector_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .flat_map(|sector| self.systems_in_sector(sector))
            .map(|s| (s.sector_id, s.x, s.y))
            .collect();
        check_batch_unique(taken, systems.iter().map(|s| (s.sector_id, s.x, s.y)))?;

        let count = systems.len();
        for s in systems {
            let id = self.alloc_id();
            self.tables
                .systems_by_sector
                .entry(s.sector_id)
                .or_default()
                .push(id);
            self.tables.systems.insert(
                id,
                StarSystem {
                    id,
                    sector_id: s.sector_id,
                    x: s.x,
                    y: s.y,
                    star_type: s.star_type,
                    star_size: s.star_size,
                    star_color: s.star_color,
                },
            );
        }
        Ok(count)
    }

    fn planets_in_system(&self, system_id: u64) -> Vec<Planet> {
        Self::children(
            &self.tables.planets_by_system,
            &self.tables.planets,
            system_id,
        )
    }

    fn planet_count(&self, system_id: u64) -> usize {
        self.tables
            .planets_by_system
            .get(&system_id)
            .map_or(0, Vec::len)
    }

    fn insert_planets(&mut self, planets: Vec<NewPlanet>) -> Result<usize, StoreError> {
        for p in &planets {
            if !self.tables.systems.contains_key(&p.system_id) {
                return Err(StoreError::MissingParent(p.system_id));
            }
            if !self.tables.planet_types.contains_key(&p.planet_type_id) {
                return Err(StoreError::MissingParent(p.planet_type_id));
            }
        }
        let taken: Vec<_> = planets
            .iter()
            .map(|p| p.system_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .flat_map(|system| self.planets_in_system(system))
            .map(|p| (p.system_id, p.x, p.y))
            .collect();
        check_batch_unique(taken, planets.iter().map(|p| (p.system_id, p.x, p.y)))?;

        let count = planets.len();
        for p in planets {
            let id = self.alloc_id();
            self.tables
                .planets_by_system
                .entry(p.system_id)
                .or_default()
                .push(id);
            self.tables.planets.insert(
                id,
                Planet {
                    id,
                    system_id: p.system_id,
                    planet_type_id: p.planet_type_id,
                    x: p.x,
                    y: p.y,
                },
            );
        }
        Ok(count)
    }

    fn planet_types(&self) -> Vec<PlanetType> {
        self.tables.planet_types.values().cloned().collect()
    }

    fn planet_type(&self, id: u64) -> Option<PlanetType> {
        self.tables.planet_types.get(&id).cloned()
    }
}
