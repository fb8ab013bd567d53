//! Read views handed to the game and UI layers.

use serde::{Deserialize, Serialize};

use crate::density::DensityField;
use crate::error::GenerationError;
use crate::model::{PlanetWithType, Sector, StarSystem};
use crate::store::GalaxyStore;

/// One cell of a galaxy's density map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorDensity {
    pub sector_id: u64,
    pub x: u32,
    pub y: u32,
    pub density: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalaxyStats {
    pub sectors: usize,
    pub populated_sectors: usize,
    pub systems: usize,
}

/// Sectors of a galaxy in row-major order.
pub fn sectors_of_galaxy(
    store: &impl GalaxyStore,
    galaxy_id: u64,
) -> Result<Vec<Sector>, GenerationError> {
    if store.galaxy(galaxy_id).is_none() {
        return Err(GenerationError::GalaxyNotFound(galaxy_id));
    }
    let mut sectors = store.sectors_in_galaxy(galaxy_id);
    sectors.sort_by_key(|s| (s.y, s.x));
    Ok(sectors)
}

pub fn systems_of_sector(
    store: &impl GalaxyStore,
    sector_id: u64,
) -> Result<Vec<StarSystem>, GenerationError> {
    if store.sector(sector_id).is_none() {
        return Err(GenerationError::SectorNotFound(sector_id));
    }
    Ok(store.systems_in_sector(sector_id))
}

/// Planets of a system joined with their catalog entry.
pub fn planets_of_system(
    store: &impl GalaxyStore,
    system_id: u64,
) -> Result<Vec<PlanetWithType>, GenerationError> {
    if store.star_system(system_id).is_none() {
        return Err(GenerationError::SystemNotFound(system_id));
    }
    Ok(store
        .planets_in_system(system_id)
        .into_iter()
        .map(|planet| PlanetWithType {
            planet_type: store.planet_type(planet.planet_type_id),
            planet,
        })
        .collect())
}

/// Density of every sector, recomputed from the field (never stored).
pub fn galaxy_density_map(
    store: &impl GalaxyStore,
    field: &DensityField,
    galaxy_id: u64,
) -> Result<Vec<SectorDensity>, GenerationError> {
    Ok(sectors_of_galaxy(store, galaxy_id)?
        .into_iter()
        .map(|s| SectorDensity {
            sector_id: s.id,
            x: s.x,
            y: s.y,
            density: field.at(s.x, s.y),
        })
        .collect())
}

pub fn galaxy_stats(store: &impl GalaxyStore, galaxy_id: u64) -> Result<GalaxyStats, GenerationError> {
    let sectors = sectors_of_galaxy(store, galaxy_id)?;
    let mut stats = GalaxyStats {
        sectors: sectors.len(),
        ..GalaxyStats::default()
    };
    for sector in &sectors {
        let count = store.system_count(sector.id);
        if count > 0 {
            stats.populated_sectors += 1;
            stats.systems += count;
        }
    }
    Ok(stats)
}
