//! Star system population: planets on orbital bands around a fixed star.
//!
//! The star sits on the center cell of the 9×9 system grid and is never a
//! placement candidate. Each planet gets an orbital band (1 inner, 2 mid,
//! 3 outer); the band sets its orbit radius and biases which catalog
//! categories its planet type is drawn from.

use std::collections::HashSet;
use std::f64::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{GenerationConfig, PlacementPolicy};
use crate::constants::{bands, BAND_SPACING, PLANET_CELLS, STAR_CELL, SYSTEM_SIZE};
use crate::error::GenerationError;
use crate::model::{NewPlanet, PlanetType, StarSystem};
use crate::placement::place_unique;
use crate::store::GalaxyStore;
use crate::type_tables::{band_categories, StarType};

#[derive(Debug, Clone, PartialEq)]
pub enum SystemGeneration {
    Generated { placed: u32, target: u32 },
    AlreadyGenerated { existing: usize },
}

impl SystemGeneration {
    pub fn placed(&self) -> u32 {
        match self {
            Self::Generated { placed, .. } => *placed,
            Self::AlreadyGenerated { .. } => 0,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Generated { placed, target } if placed < target => format!(
                "Generated {} of {} planets (placement truncated)",
                placed, target
            ),
            Self::Generated { placed, .. } => format!("Generated {} planets", placed),
            Self::AlreadyGenerated { existing } => format!(
                "Planets already generated for this system ({} planets)",
                existing
            ),
        }
    }
}

/// Roll a planet count from the star type's range.
pub fn roll_planet_count(star_type: StarType, rng: &mut impl Rng) -> u32 {
    let (min, max) = star_type.planet_range();
    rng.gen_range(min..=max)
}

/// Orbital band for planet `index` of `count`.
///
/// The first planet is pulled into the inner band with `inner_chance`;
/// otherwise bands grow with the index.
pub fn orbital_band(index: u32, count: u32, inner_chance: f64, rng: &mut impl Rng) -> u8 {
    if index == 0 && rng.gen_bool(inner_chance.clamp(0.0, 1.0)) {
        return bands::INNER;
    }
    let spread = (index as f64 * 2.5 / count.max(1) as f64) * 3.0;
    (1 + spread.floor() as u32).min(bands::OUTER as u32) as u8
}

/// A free cell on the orbit of `band`, or `None` when the budget runs out.
fn orbit_cell(
    band: u8,
    occupied: &mut HashSet<(u32, u32)>,
    attempts: u32,
    rng: &mut impl Rng,
) -> Option<(u32, u32)> {
    let radius = band as f64 * BAND_SPACING;
    let (cx, cy) = (STAR_CELL.0 as f64, STAR_CELL.1 as f64);
    let max = (SYSTEM_SIZE - 1) as f64;
    place_unique(occupied, attempts, || {
        let theta = rng.gen_range(0.0..TAU);
        let x = (cx + (radius * theta.cos()).round()).clamp(0.0, max);
        let y = (cy + (radius * theta.sin()).round()).clamp(0.0, max);
        (x as u32, y as u32)
    })
}

/// Pick a planet type for `band`, preferring its categories.
fn pick_planet_type<'a>(
    catalog: &'a [PlanetType],
    band: u8,
    rng: &mut impl Rng,
) -> Option<&'a PlanetType> {
    let preferred = band_categories(band);
    let filtered: Vec<&PlanetType> = catalog
        .iter()
        .filter(|t| preferred.contains(&t.category.as_str()))
        .collect();
    if filtered.is_empty() {
        catalog.choose(rng)
    } else {
        filtered.choose(rng).copied()
    }
}

/// Populate a system by id. See [`populate_system`].
pub fn generate_system_planets(
    store: &mut impl GalaxyStore,
    rng: &mut impl Rng,
    config: &GenerationConfig,
    system_id: u64,
    planet_count: Option<u32>,
) -> Result<SystemGeneration, GenerationError> {
    let system = store
        .star_system(system_id)
        .ok_or(GenerationError::SystemNotFound(system_id))?;
    populate_system(store, rng, config, &system, planet_count)
}

/// Place planets around `system` unless it already has some.
pub fn populate_system(
    store: &mut impl GalaxyStore,
    rng: &mut impl Rng,
    config: &GenerationConfig,
    system: &StarSystem,
    planet_count: Option<u32>,
) -> Result<SystemGeneration, GenerationError> {
    let existing = store.planet_count(system.id);
    if existing > 0 {
        log::debug!("System {} already has {} planets", system.id, existing);
        return Ok(SystemGeneration::AlreadyGenerated { existing });
    }

    let catalog = store.planet_types();
    if catalog.is_empty() {
        return Err(GenerationError::EmptyCatalog);
    }

    let target = planet_count
        .unwrap_or_else(|| roll_planet_count(system.star_type, rng))
        .min(PLANET_CELLS);

    let planets = plan_system_planets(rng, config, system.id, target, &catalog);
    let placed = planets.len() as u32;

    if placed < target {
        if config.placement_policy == PlacementPolicy::Strict {
            return Err(GenerationError::PlacementExhausted { placed, target });
        }
        log::warn!(
            "System {}: placed {} of {} planets before running out of attempts",
            system.id,
            placed,
            target
        );
    }

    store.insert_planets(planets)?;
    log::info!(
        "System {} ({}): {} planets",
        system.id,
        system.star_type.name(),
        placed
    );

    Ok(SystemGeneration::Generated { placed, target })
}

/// Roll up to `target` planets on distinct cells. No store access.
pub fn plan_system_planets(
    rng: &mut impl Rng,
    config: &GenerationConfig,
    system_id: u64,
    target: u32,
    catalog: &[PlanetType],
) -> Vec<NewPlanet> {
    let mut occupied: HashSet<(u32, u32)> = HashSet::from([STAR_CELL]);
    let mut planets = Vec::with_capacity(target as usize);

    for i in 0..target {
        let band = orbital_band(i, target, config.inner_planet_chance, rng);
        let Some((x, y)) = orbit_cell(band, &mut occupied, config.system_placement_attempts, rng)
        else {
            continue;
        };
        let Some(planet_type) = pick_planet_type(catalog, band, rng) else {
            continue;
        };
        planets.push(NewPlanet {
            system_id,
            planet_type_id: planet_type.id,
            x,
            y,
        });
    }

    planets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_planet_types;
    use crate::constants::categories;
    use crate::galaxy::create_galaxy;
    use crate::model::NewStarSystem;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store_with_system(star_type: StarType) -> (MemoryStore, u64) {
        let mut store = MemoryStore::with_planet_types(default_planet_types());
        let galaxy = create_galaxy(&mut store, None).unwrap();
        let sector = store.sectors_in_galaxy(galaxy.galaxy_id)[0];
        store
            .insert_star_systems(vec![NewStarSystem {
                sector_id: sector.id,
                x: 10,
                y: 20,
                star_type,
                star_size: 1.0,
                star_color: star_type.color().to_string(),
            }])
            .unwrap();
        let system = store.systems_in_sector(sector.id)[0].clone();
        (store, system.id)
    }

    #[test]
    fn test_band_formula() {
        let mut rng = StdRng::seed_from_u64(1);
        // inner_chance 0 disables the hot-planet roll
        let bands: Vec<u8> = (0..5).map(|i| orbital_band(i, 5, 0.0, &mut rng)).collect();
        assert_eq!(bands, vec![1, 2, 3, 3, 3]);
        let bands: Vec<u8> = (0..8).map(|i| orbital_band(i, 8, 0.0, &mut rng)).collect();
        assert_eq!(bands, vec![1, 1, 2, 3, 3, 3, 3, 3]);
    }

    #[test]
    fn test_first_planet_forced_inner() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(orbital_band(0, 3, 1.0, &mut rng), bands::INNER);
        }
        // Only index 0 gets the roll
        assert_eq!(orbital_band(2, 3, 1.0, &mut rng), bands::OUTER);
    }

    #[test]
    fn test_planet_count_ranges() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..500 {
            let n = roll_planet_count(StarType::NeutronStar, &mut rng);
            assert!((1..=3).contains(&n));
            let n = roll_planet_count(StarType::BlueGiant, &mut rng);
            assert!((3..=8).contains(&n));
            let n = roll_planet_count(StarType::RedDwarf, &mut rng);
            assert!((2..=6).contains(&n));
        }
    }

    #[test]
    fn test_never_on_star_cell() {
        let mut rng = StdRng::seed_from_u64(23);
        let catalog: Vec<PlanetType> = MemoryStore::with_planet_types(default_planet_types())
            .planet_types();
        let config = GenerationConfig::default();
        for system_id in 0..200 {
            for p in plan_system_planets(&mut rng, &config, system_id, 8, &catalog) {
                assert_ne!((p.x, p.y), STAR_CELL);
                assert!(p.x < SYSTEM_SIZE && p.y < SYSTEM_SIZE);
            }
        }
    }

    #[test]
    fn test_generate_explicit_count() {
        let (mut store, system_id) = store_with_system(StarType::YellowDwarf);
        let mut rng = StdRng::seed_from_u64(31);
        let result = generate_system_planets(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            system_id,
            Some(5),
        )
        .unwrap();

        let planets = store.planets_in_system(system_id);
        assert!((1..=5).contains(&result.placed()));
        assert_eq!(planets.len() as u32, result.placed());
        let cells: HashSet<(u32, u32)> = planets.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(cells.len(), planets.len());
        assert!(!cells.contains(&STAR_CELL));
    }

    #[test]
    fn test_rolled_count_respects_star_type() {
        for seed in 0..30 {
            let (mut store, system_id) = store_with_system(StarType::NeutronStar);
            let mut rng = StdRng::seed_from_u64(seed);
            let result = generate_system_planets(
                &mut store,
                &mut rng,
                &GenerationConfig::default(),
                system_id,
                None,
            )
            .unwrap();
            match result {
                SystemGeneration::Generated { placed, target } => {
                    assert!((1..=3).contains(&target));
                    assert!(placed <= target);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let (mut store, system_id) = store_with_system(StarType::RedGiant);
        let mut rng = StdRng::seed_from_u64(2);
        let config = GenerationConfig::default();
        generate_system_planets(&mut store, &mut rng, &config, system_id, None).unwrap();
        let before = store.planets_in_system(system_id);

        let second = generate_system_planets(&mut store, &mut rng, &config, system_id, Some(8)).unwrap();
        assert_eq!(
            second,
            SystemGeneration::AlreadyGenerated {
                existing: before.len()
            }
        );
        assert_eq!(store.planets_in_system(system_id), before);
    }

    #[test]
    fn test_empty_catalog_writes_nothing() {
        let mut store = MemoryStore::new();
        let galaxy = create_galaxy(&mut store, None).unwrap();
        let sector = store.sectors_in_galaxy(galaxy.galaxy_id)[0];
        store
            .insert_star_systems(vec![NewStarSystem {
                sector_id: sector.id,
                x: 1,
                y: 1,
                star_type: StarType::RedDwarf,
                star_size: 0.8,
                star_color: StarType::RedDwarf.color().to_string(),
            }])
            .unwrap();
        let system_id = store.systems_in_sector(sector.id)[0].id;
        let mut rng = StdRng::seed_from_u64(2);

        let err = generate_system_planets(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            system_id,
            Some(3),
        )
        .unwrap_err();
        assert_eq!(err, GenerationError::EmptyCatalog);
        assert_eq!(store.planet_count(system_id), 0);
    }

    #[test]
    fn test_missing_system() {
        let (mut store, _) = store_with_system(StarType::RedDwarf);
        let mut rng = StdRng::seed_from_u64(2);
        let err = generate_system_planets(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            777_777,
            None,
        )
        .unwrap_err();
        assert_eq!(err, GenerationError::SystemNotFound(777_777));
    }

    #[test]
    fn test_inner_band_prefers_inner_categories() {
        let catalog = MemoryStore::with_planet_types(default_planet_types()).planet_types();
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let t = pick_planet_type(&catalog, bands::INNER, &mut rng).unwrap();
            assert!(
                t.category == categories::INNER_SYSTEM || t.category == categories::EXOTIC,
                "{}",
                t.category
            );
        }
    }

    #[test]
    fn test_unmatched_band_falls_back_to_full_catalog() {
        let only_habitable: Vec<PlanetType> = default_planet_types()
            .into_iter()
            .filter(|t| t.category == categories::HABITABLE_ZONE)
            .collect();
        let mut rng = StdRng::seed_from_u64(8);
        let t = pick_planet_type(&only_habitable, bands::OUTER, &mut rng).unwrap();
        assert_eq!(t.category, categories::HABITABLE_ZONE);
    }

    #[test]
    fn test_strict_policy_writes_no_planets() {
        let (mut store, system_id) = store_with_system(StarType::BlueGiant);
        let mut rng = StdRng::seed_from_u64(4);
        let config = GenerationConfig {
            placement_policy: PlacementPolicy::Strict,
            ..GenerationConfig::default()
        };
        // 80 planets cannot all fit on three orbits
        let err = generate_system_planets(&mut store, &mut rng, &config, system_id, Some(80))
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::PlacementExhausted { target: 80, placed } if placed < 80
        ));
        assert_eq!(store.planet_count(system_id), 0);

        // Nothing was written, so a truncating retry still generates
        let retry = generate_system_planets(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            system_id,
            Some(3),
        )
        .unwrap();
        assert!(matches!(retry, SystemGeneration::Generated { .. }));
    }

    #[test]
    fn test_oversized_count_capped_and_truncated() {
        let (mut store, system_id) = store_with_system(StarType::BlueGiant);
        let mut rng = StdRng::seed_from_u64(4);
        let result = generate_system_planets(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            system_id,
            Some(500),
        )
        .unwrap();
        match result {
            SystemGeneration::Generated { placed, target } => {
                assert_eq!(target, PLANET_CELLS);
                // Orbits only reach a ring of cells, never the full grid
                assert!(placed < target);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
