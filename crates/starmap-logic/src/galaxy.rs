//! Galaxy creation: one galaxy record plus its full sector grid.

use crate::constants::{GALAXY_SIZE, SECTORS_PER_GALAXY};
use crate::error::GenerationError;
use crate::model::{NewGalaxy, NewSector};
use crate::store::GalaxyStore;

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedGalaxy {
    pub galaxy_id: u64,
    pub number: u32,
    pub sector_count: usize,
}

impl CreatedGalaxy {
    pub fn message(&self) -> String {
        format!(
            "Galaxy #{} created with {} sectors",
            self.number, self.sector_count
        )
    }
}

/// Next galaxy number: one past the highest ever assigned, or 0.
pub fn next_galaxy_number(store: &impl GalaxyStore) -> u32 {
    store
        .galaxies()
        .iter()
        .map(|g| g.number)
        .max()
        .map_or(0, |n| n + 1)
}

/// Create a galaxy and all `GALAXY_SIZE²` of its sectors.
pub fn create_galaxy(
    store: &mut impl GalaxyStore,
    group_id: Option<String>,
) -> Result<CreatedGalaxy, GenerationError> {
    let number = next_galaxy_number(store);
    let galaxy = store.insert_galaxy(NewGalaxy { number, group_id })?;

    let mut sectors = Vec::with_capacity(SECTORS_PER_GALAXY);
    for y in 0..GALAXY_SIZE {
        for x in 0..GALAXY_SIZE {
            sectors.push(NewSector {
                galaxy_id: galaxy.id,
                x,
                y,
            });
        }
    }
    let sector_count = store.insert_sectors(sectors)?;

    log::info!(
        "Galaxy #{} (id {}) created with {} sectors",
        number,
        galaxy.id,
        sector_count
    );

    Ok(CreatedGalaxy {
        galaxy_id: galaxy.id,
        number,
        sector_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::collections::HashSet;

    #[test]
    fn test_numbers_are_sequential() {
        let mut store = MemoryStore::new();
        for expected in 0..4 {
            let created = create_galaxy(&mut store, Some(format!("group-{}", expected % 2))).unwrap();
            assert_eq!(created.number, expected);
        }
    }

    #[test]
    fn test_numbers_ignore_group() {
        let mut store = MemoryStore::new();
        let a = create_galaxy(&mut store, Some("g1".into())).unwrap();
        let b = create_galaxy(&mut store, Some("g1".into())).unwrap();
        let c = create_galaxy(&mut store, None).unwrap();
        assert_eq!((a.number, b.number, c.number), (0, 1, 2));
    }

    #[test]
    fn test_full_sector_grid() {
        let mut store = MemoryStore::new();
        let created = create_galaxy(&mut store, None).unwrap();
        let sectors = store.sectors_in_galaxy(created.galaxy_id);
        assert_eq!(sectors.len(), 100);
        assert_eq!(created.sector_count, 100);

        let cells: HashSet<(u32, u32)> = sectors.iter().map(|s| (s.x, s.y)).collect();
        assert_eq!(cells.len(), 100);
        assert!(cells.iter().all(|(x, y)| *x < GALAXY_SIZE && *y < GALAXY_SIZE));
    }

    #[test]
    fn test_sectors_belong_to_their_galaxy() {
        let mut store = MemoryStore::new();
        let a = create_galaxy(&mut store, None).unwrap();
        let b = create_galaxy(&mut store, None).unwrap();
        assert!(store
            .sectors_in_galaxy(a.galaxy_id)
            .iter()
            .all(|s| s.galaxy_id == a.galaxy_id));
        assert_eq!(store.sectors_in_galaxy(b.galaxy_id).len(), 100);
    }

    #[test]
    fn test_message() {
        let mut store = MemoryStore::new();
        let created = create_galaxy(&mut store, None).unwrap();
        assert_eq!(created.message(), "Galaxy #0 created with 100 sectors");
    }
}
