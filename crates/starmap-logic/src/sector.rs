//! Sector population: star systems scattered by local galaxy density.
//!
//! A sector is populated once. The first call decides a target count from
//! the density field, scatters systems on free cells and writes them as one
//! batch; every later call is a no-op that reports the existing count.

use std::collections::HashSet;

use rand::Rng;

use crate::config::{GenerationConfig, PlacementPolicy};
use crate::constants::{SECTOR_SIZE, STAR_SIZE_MAX, STAR_SIZE_MIN};
use crate::error::GenerationError;
use crate::model::{NewStarSystem, Sector};
use crate::placement::place_unique;
use crate::store::GalaxyStore;
use crate::type_tables::random_star_type;

#[derive(Debug, Clone, PartialEq)]
pub enum SectorGeneration {
    Generated {
        placed: u32,
        target: u32,
        density: f64,
    },
    AlreadyGenerated {
        existing: usize,
    },
}

impl SectorGeneration {
    pub fn placed(&self) -> u32 {
        match self {
            Self::Generated { placed, .. } => *placed,
            Self::AlreadyGenerated { .. } => 0,
        }
    }

    pub fn calculated_density(&self) -> Option<f64> {
        match self {
            Self::Generated { density, .. } => Some(*density),
            Self::AlreadyGenerated { .. } => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Generated {
                target: 0, density, ..
            } => format!(
                "No star systems at density {:.3}; sector stays ungenerated",
                density
            ),
            Self::Generated {
                placed,
                target,
                density,
            } if placed < target => format!(
                "Generated {} of {} star systems (density {:.3}, placement truncated)",
                placed, target, density
            ),
            Self::Generated {
                placed, density, ..
            } => format!("Generated {} star systems (density {:.3})", placed, density),
            Self::AlreadyGenerated { existing } => format!(
                "Systems already generated for this sector ({} systems)",
                existing
            ),
        }
    }
}

/// Reject multipliers that would make the target count meaningless.
pub fn validate_multiplier(multiplier: Option<f64>) -> Result<f64, GenerationError> {
    let m = multiplier.unwrap_or(1.0);
    if m.is_finite() && m >= 0.0 {
        Ok(m)
    } else {
        Err(GenerationError::InvalidDensityMultiplier(m))
    }
}

/// Number of systems a sector of the given density should hold.
pub fn target_system_count(density: f64, max_systems: u32) -> u32 {
    let cells = (SECTOR_SIZE * SECTOR_SIZE) as f64;
    (cells * density).min(max_systems as f64).max(0.0).floor() as u32
}

/// Populate a sector by id. See [`populate_sector`].
pub fn generate_sector_systems(
    store: &mut impl GalaxyStore,
    rng: &mut impl Rng,
    config: &GenerationConfig,
    sector_id: u64,
    density_multiplier: Option<f64>,
) -> Result<SectorGeneration, GenerationError> {
    let multiplier = validate_multiplier(density_multiplier)?;
    let sector = store
        .sector(sector_id)
        .ok_or(GenerationError::SectorNotFound(sector_id))?;
    populate_sector(store, rng, config, &sector, multiplier)
}

/// Scatter star systems over `sector` unless it already has some.
///
/// All systems are inserted in a single batch, so a failure leaves the
/// sector untouched. A sector counts as generated once it holds a system:
/// a zero target writes nothing, and a later call rolls it again.
pub fn populate_sector(
    store: &mut impl GalaxyStore,
    rng: &mut impl Rng,
    config: &GenerationConfig,
    sector: &Sector,
    multiplier: f64,
) -> Result<SectorGeneration, GenerationError> {
    let existing = store.system_count(sector.id);
    if existing > 0 {
        log::debug!(
            "Sector {} ({}, {}) already has {} systems",
            sector.id,
            sector.x,
            sector.y,
            existing
        );
        return Ok(SectorGeneration::AlreadyGenerated { existing });
    }

    let density = config.density.at(sector.x, sector.y) * multiplier;
    let target = target_system_count(density, config.max_systems_per_sector);
    let systems = plan_sector_systems(rng, config, sector.id, target);
    let placed = systems.len() as u32;

    if placed < target {
        if config.placement_policy == PlacementPolicy::Strict {
            return Err(GenerationError::PlacementExhausted { placed, target });
        }
        log::warn!(
            "Sector {}: placed {} of {} systems before running out of attempts",
            sector.id,
            placed,
            target
        );
    }

    store.insert_star_systems(systems)?;
    log::info!(
        "Sector {} ({}, {}): {} systems at density {:.3}",
        sector.id,
        sector.x,
        sector.y,
        placed,
        density
    );

    Ok(SectorGeneration::Generated {
        placed,
        target,
        density,
    })
}

/// Roll up to `target` systems on distinct cells. No store access.
pub fn plan_sector_systems(
    rng: &mut impl Rng,
    config: &GenerationConfig,
    sector_id: u64,
    target: u32,
) -> Vec<NewStarSystem> {
    let mut occupied: HashSet<(u32, u32)> = HashSet::with_capacity(target as usize);
    let mut systems = Vec::with_capacity(target as usize);

    for _ in 0..target {
        let cell = place_unique(&mut occupied, config.sector_placement_attempts, || {
            (rng.gen_range(0..SECTOR_SIZE), rng.gen_range(0..SECTOR_SIZE))
        });
        let Some((x, y)) = cell else {
            continue;
        };

        let star_type = random_star_type(rng);
        systems.push(NewStarSystem {
            sector_id,
            x,
            y,
            star_type,
            star_size: rng.gen_range(STAR_SIZE_MIN..STAR_SIZE_MAX),
            star_color: star_type.color().to_string(),
        });
    }

    systems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::create_galaxy;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (MemoryStore, Vec<Sector>) {
        let mut store = MemoryStore::new();
        let galaxy = create_galaxy(&mut store, None).unwrap();
        let sectors = store.sectors_in_galaxy(galaxy.galaxy_id);
        (store, sectors)
    }

    fn sector_at(sectors: &[Sector], x: u32, y: u32) -> Sector {
        *sectors.iter().find(|s| s.x == x && s.y == y).unwrap()
    }

    #[test]
    fn test_target_count_capped() {
        assert_eq!(target_system_count(0.7, 2000), 2000);
        assert_eq!(target_system_count(0.07, 2000), 700);
        assert_eq!(target_system_count(0.0, 2000), 0);
        assert_eq!(target_system_count(0.12345, 2000), 1234);
    }

    #[test]
    fn test_multiplier_validation() {
        assert_eq!(validate_multiplier(None), Ok(1.0));
        assert_eq!(validate_multiplier(Some(0.0)), Ok(0.0));
        assert!(validate_multiplier(Some(-0.5)).is_err());
        assert!(validate_multiplier(Some(f64::NAN)).is_err());
        assert!(validate_multiplier(Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_generate_center_sector() {
        let (mut store, sectors) = setup();
        let mut rng = StdRng::seed_from_u64(3);
        let sector = sector_at(&sectors, 5, 5);

        let result = generate_sector_systems(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            sector.id,
            Some(0.1),
        )
        .unwrap();

        // density 0.7 * 0.1 → ~700 systems on 10,000 cells: no truncation expected
        let density = result.calculated_density().unwrap();
        assert!((density - 0.07).abs() < 1e-9);
        let target = target_system_count(density, 2000);
        assert!((699..=700).contains(&target));
        assert_eq!(result.placed(), target);
        assert_eq!(store.system_count(sector.id) as u32, target);
    }

    #[test]
    fn test_systems_unique_and_in_bounds() {
        let (mut store, sectors) = setup();
        let mut rng = StdRng::seed_from_u64(11);
        let sector = sector_at(&sectors, 4, 6);
        generate_sector_systems(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            sector.id,
            None,
        )
        .unwrap();

        let systems = store.systems_in_sector(sector.id);
        assert!(!systems.is_empty());
        let cells: HashSet<(u32, u32)> = systems.iter().map(|s| (s.x, s.y)).collect();
        assert_eq!(cells.len(), systems.len());
        for s in &systems {
            assert!(s.x < SECTOR_SIZE && s.y < SECTOR_SIZE);
            assert!(s.star_size >= STAR_SIZE_MIN && s.star_size < STAR_SIZE_MAX);
            assert_eq!(s.star_color, s.star_type.color());
        }
    }

    #[test]
    fn test_second_call_is_noop() {
        let (mut store, sectors) = setup();
        let mut rng = StdRng::seed_from_u64(5);
        let config = GenerationConfig::default();
        let sector = sector_at(&sectors, 0, 0);

        let first = generate_sector_systems(&mut store, &mut rng, &config, sector.id, None).unwrap();
        let count = store.system_count(sector.id);
        assert_eq!(count as u32, first.placed());

        let second =
            generate_sector_systems(&mut store, &mut rng, &config, sector.id, Some(5.0)).unwrap();
        assert_eq!(second, SectorGeneration::AlreadyGenerated { existing: count });
        assert!(second.message().contains("already generated"));
        assert_eq!(store.system_count(sector.id), count);
    }

    #[test]
    fn test_zero_multiplier_places_nothing() {
        let (mut store, sectors) = setup();
        let mut rng = StdRng::seed_from_u64(5);
        let sector = sector_at(&sectors, 5, 5);
        let result = generate_sector_systems(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            sector.id,
            Some(0.0),
        )
        .unwrap();
        assert_eq!(result.placed(), 0);
        assert_eq!(store.system_count(sector.id), 0);
        assert!(result.message().contains("stays ungenerated"));

        // Still empty, so a later call populates it
        let later = generate_sector_systems(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            sector.id,
            Some(0.01),
        )
        .unwrap();
        assert!(later.placed() > 0);
        assert_eq!(store.system_count(sector.id) as u32, later.placed());
    }

    #[test]
    fn test_missing_sector() {
        let (mut store, _) = setup();
        let mut rng = StdRng::seed_from_u64(5);
        let err = generate_sector_systems(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            424242,
            None,
        )
        .unwrap_err();
        assert_eq!(err, GenerationError::SectorNotFound(424242));
    }

    #[test]
    fn test_truncation_under_tight_budget() {
        // One attempt per unit: collisions become likely at 2000 of 10,000 cells
        let config = GenerationConfig {
            sector_placement_attempts: 1,
            ..GenerationConfig::default()
        };
        let (mut store, sectors) = setup();
        let mut rng = StdRng::seed_from_u64(9);
        let sector = sector_at(&sectors, 5, 5);

        let result = generate_sector_systems(&mut store, &mut rng, &config, sector.id, None).unwrap();
        match result {
            SectorGeneration::Generated { placed, target, .. } => {
                assert_eq!(target, 2000);
                assert!(placed < target && placed > 1500, "placed={placed}");
                assert_eq!(store.system_count(sector.id) as u32, placed);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(result.message().contains("truncated"));
    }

    #[test]
    fn test_strict_policy_writes_nothing() {
        let config = GenerationConfig {
            sector_placement_attempts: 1,
            placement_policy: PlacementPolicy::Strict,
            ..GenerationConfig::default()
        };
        let (mut store, sectors) = setup();
        let mut rng = StdRng::seed_from_u64(9);
        let sector = sector_at(&sectors, 5, 5);

        let err = generate_sector_systems(&mut store, &mut rng, &config, sector.id, None).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::PlacementExhausted { target: 2000, .. }
        ));
        assert_eq!(store.system_count(sector.id), 0);
    }
}
