//! Whole-galaxy sector population.
//!
//! Walks every sector of a galaxy and populates the empty ones. Each sector
//! is committed as its own batch, so a failure part way through keeps the
//! sectors already done; calling again picks up the rest. Planets are never
//! generated here.
//!
//! Hosts that run one sector per transaction use [`plan_bulk_queue`] to
//! pick the sectors and [`BulkProgress`] to total the finished jobs.

use rand::Rng;

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::model::Sector;
use crate::sector::{populate_sector, validate_multiplier, SectorGeneration};
use crate::store::GalaxyStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkGeneration {
    /// Sectors populated by this call.
    pub sectors_processed: u32,
    /// Sectors that already had systems.
    pub sectors_skipped: u32,
    /// Systems created by this call.
    pub systems_created: u64,
}

impl BulkGeneration {
    pub fn message(&self) -> String {
        format!(
            "Generated {} star systems across {} sectors ({} already generated)",
            self.systems_created, self.sectors_processed, self.sectors_skipped
        )
    }
}

pub fn generate_all_galaxy_systems(
    store: &mut impl GalaxyStore,
    rng: &mut impl Rng,
    config: &GenerationConfig,
    galaxy_id: u64,
    density_multiplier: Option<f64>,
) -> Result<BulkGeneration, GenerationError> {
    let multiplier = validate_multiplier(density_multiplier)?;
    if store.galaxy(galaxy_id).is_none() {
        return Err(GenerationError::GalaxyNotFound(galaxy_id));
    }

    let mut summary = BulkGeneration::default();
    for sector in store.sectors_in_galaxy(galaxy_id) {
        match populate_sector(store, rng, config, &sector, multiplier) {
            Ok(SectorGeneration::Generated { placed, .. }) => {
                summary.sectors_processed += 1;
                summary.systems_created += placed as u64;
            }
            Ok(SectorGeneration::AlreadyGenerated { .. }) => summary.sectors_skipped += 1,
            Err(e) => {
                log::warn!(
                    "Galaxy {}: stopped at sector {} after {} sectors: {}",
                    galaxy_id,
                    sector.id,
                    summary.sectors_processed,
                    e
                );
                return Err(e);
            }
        }
    }

    log::info!("Galaxy {}: {}", galaxy_id, summary.message());
    Ok(summary)
}

/// Sectors a deferred bulk run should hand out as separate jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkQueue {
    /// Empty sectors with no job pending.
    pub sectors: Vec<Sector>,
    /// Sectors that already hold systems.
    pub already_generated: u32,
    /// Empty sectors that a previous run already queued.
    pub already_queued: u32,
}

/// Split a galaxy's sectors into jobs to queue and sectors to leave alone.
///
/// `is_queued` reports whether a sector already has a pending job, so a
/// repeated request never queues the same sector twice.
pub fn plan_bulk_queue(
    store: &impl GalaxyStore,
    galaxy_id: u64,
    is_queued: impl Fn(u64) -> bool,
) -> Result<BulkQueue, GenerationError> {
    if store.galaxy(galaxy_id).is_none() {
        return Err(GenerationError::GalaxyNotFound(galaxy_id));
    }
    let mut queue = BulkQueue::default();
    for sector in store.sectors_in_galaxy(galaxy_id) {
        if store.system_count(sector.id) > 0 {
            queue.already_generated += 1;
        } else if is_queued(sector.id) {
            queue.already_queued += 1;
        } else {
            queue.sectors.push(sector);
        }
    }
    Ok(queue)
}

/// Running totals of a deferred bulk run, one job per sector.
///
/// Every finished job moves exactly one sector out of `jobs_pending`, into
/// `sectors_done`, `sectors_skipped` or `sectors_failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkProgress {
    pub sectors_queued: u32,
    pub sectors_done: u32,
    pub sectors_skipped: u32,
    pub sectors_failed: u32,
    pub jobs_pending: u32,
    pub systems_created: u64,
}

impl BulkProgress {
    /// Progress after queueing `queue` on top of `previous`.
    ///
    /// A run still in flight keeps its counts and absorbs the new jobs.
    /// A finished run is replaced by a fresh one.
    pub fn start(previous: Option<BulkProgress>, queue: &BulkQueue) -> Self {
        let queued = queue.sectors.len() as u32;
        match previous {
            Some(p) if p.in_flight() => Self {
                sectors_queued: p.sectors_queued + queued,
                jobs_pending: p.jobs_pending + queued,
                ..p
            },
            _ => Self {
                sectors_queued: queued,
                sectors_skipped: queue.already_generated,
                jobs_pending: queued,
                ..Self::default()
            },
        }
    }

    pub fn in_flight(&self) -> bool {
        self.jobs_pending > 0
    }

    /// Account for one finished job.
    pub fn record(&mut self, outcome: &Result<SectorGeneration, GenerationError>) {
        self.jobs_pending = self.jobs_pending.saturating_sub(1);
        match outcome {
            Ok(SectorGeneration::Generated { placed, .. }) => {
                self.sectors_done += 1;
                self.systems_created += *placed as u64;
            }
            Ok(SectorGeneration::AlreadyGenerated { .. }) => self.sectors_skipped += 1,
            Err(_) => self.sectors_failed += 1,
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Generated {} star systems across {} sectors ({} already generated, {} failed, {} pending)",
            self.systems_created,
            self.sectors_done,
            self.sectors_skipped,
            self.sectors_failed,
            self.jobs_pending
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlacementPolicy;
    use crate::constants::SECTORS_PER_GALAXY;
    use crate::galaxy::create_galaxy;
    use crate::sector::generate_sector_systems;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_populates_every_sector() {
        let mut store = MemoryStore::new();
        let galaxy = create_galaxy(&mut store, None).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let summary = generate_all_galaxy_systems(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            galaxy.galaxy_id,
            Some(0.05),
        )
        .unwrap();

        assert_eq!(summary.sectors_processed as usize, SECTORS_PER_GALAXY);
        assert_eq!(summary.sectors_skipped, 0);
        assert_eq!(summary.systems_created as usize, store.total_systems());
        // No planets from bulk generation
        assert_eq!(store.total_planets(), 0);
    }

    #[test]
    fn test_skips_populated_sectors() {
        let mut store = MemoryStore::new();
        let galaxy = create_galaxy(&mut store, None).unwrap();
        let config = GenerationConfig::default();
        let mut rng = StdRng::seed_from_u64(2);

        let first = store.sectors_in_galaxy(galaxy.galaxy_id)[0];
        generate_sector_systems(&mut store, &mut rng, &config, first.id, Some(0.05)).unwrap();
        let before = store.system_count(first.id);

        let summary =
            generate_all_galaxy_systems(&mut store, &mut rng, &config, galaxy.galaxy_id, Some(0.05))
                .unwrap();
        assert_eq!(summary.sectors_skipped, 1);
        assert_eq!(summary.sectors_processed as usize, SECTORS_PER_GALAXY - 1);
        assert_eq!(store.system_count(first.id), before);

        let again =
            generate_all_galaxy_systems(&mut store, &mut rng, &config, galaxy.galaxy_id, None)
                .unwrap();
        assert_eq!(again.sectors_processed, 0);
        assert_eq!(again.systems_created, 0);
        assert_eq!(again.sectors_skipped as usize, SECTORS_PER_GALAXY);
    }

    #[test]
    fn test_failure_keeps_committed_sectors_and_resumes() {
        let mut store = MemoryStore::new();
        let galaxy = create_galaxy(&mut store, None).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        // Strict + one attempt fails as soon as a dense sector collides
        let strict = GenerationConfig {
            sector_placement_attempts: 1,
            placement_policy: PlacementPolicy::Strict,
            ..GenerationConfig::default()
        };
        let err = generate_all_galaxy_systems(&mut store, &mut rng, &strict, galaxy.galaxy_id, None)
            .unwrap_err();
        assert!(matches!(err, GenerationError::PlacementExhausted { .. }));
        let partial = store.total_systems();

        let resumed = generate_all_galaxy_systems(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            galaxy.galaxy_id,
            None,
        )
        .unwrap();
        assert_eq!(
            resumed.sectors_processed + resumed.sectors_skipped,
            SECTORS_PER_GALAXY as u32
        );
        assert_eq!(
            store.total_systems(),
            partial + resumed.systems_created as usize
        );
        assert!(store
            .sectors_in_galaxy(galaxy.galaxy_id)
            .iter()
            .all(|s| store.system_count(s.id) > 0));
    }

    fn generated(placed: u32) -> Result<SectorGeneration, GenerationError> {
        Ok(SectorGeneration::Generated {
            placed,
            target: placed,
            density: 0.1,
        })
    }

    #[test]
    fn test_queue_skips_populated_and_pending() {
        let mut store = MemoryStore::new();
        let galaxy = create_galaxy(&mut store, None).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let sectors = store.sectors_in_galaxy(galaxy.galaxy_id);
        generate_sector_systems(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            sectors[0].id,
            Some(0.05),
        )
        .unwrap();

        let pending = [sectors[1].id, sectors[2].id];
        let queue = plan_bulk_queue(&store, galaxy.galaxy_id, |id| pending.contains(&id)).unwrap();
        assert_eq!(queue.already_generated, 1);
        assert_eq!(queue.already_queued, 2);
        assert_eq!(queue.sectors.len(), SECTORS_PER_GALAXY - 3);
        assert!(queue.sectors.iter().all(|s| !pending.contains(&s.id)));

        assert_eq!(
            plan_bulk_queue(&store, 12345, |_| false).unwrap_err(),
            GenerationError::GalaxyNotFound(12345)
        );
    }

    #[test]
    fn test_repeated_request_while_in_flight() {
        let mut store = MemoryStore::new();
        let galaxy = create_galaxy(&mut store, None).unwrap();

        // First request queues every sector
        let first = plan_bulk_queue(&store, galaxy.galaxy_id, |_| false).unwrap();
        let mut progress = BulkProgress::start(None, &first);
        assert_eq!(progress.sectors_queued, 100);
        assert_eq!(progress.jobs_pending, 100);

        // Second request before any job ran: everything is already queued
        let queued: Vec<u64> = first.sectors.iter().map(|s| s.id).collect();
        let second = plan_bulk_queue(&store, galaxy.galaxy_id, |id| queued.contains(&id)).unwrap();
        assert!(second.sectors.is_empty());
        assert_eq!(second.already_queued, 100);
        progress = BulkProgress::start(Some(progress), &second);
        assert_eq!(progress.sectors_queued, 100);
        assert_eq!(progress.jobs_pending, 100);

        for _ in 0..99 {
            progress.record(&generated(10));
            assert!(progress.in_flight());
        }
        progress.record(&Ok(SectorGeneration::AlreadyGenerated { existing: 4 }));
        assert!(!progress.in_flight());
        assert_eq!(progress.sectors_done, 99);
        assert_eq!(progress.sectors_skipped, 1);
        assert_eq!(progress.systems_created, 990);
        assert!(progress.sectors_done + progress.sectors_skipped <= progress.sectors_queued);
    }

    #[test]
    fn test_failed_job_still_finishes_run() {
        let queue = BulkQueue {
            sectors: vec![
                Sector {
                    id: 1,
                    galaxy_id: 1,
                    x: 0,
                    y: 0,
                };
                2
            ],
            already_generated: 3,
            already_queued: 0,
        };
        let mut progress = BulkProgress::start(None, &queue);
        assert_eq!(progress.sectors_skipped, 3);

        progress.record(&Err(GenerationError::PlacementExhausted {
            placed: 1,
            target: 5,
        }));
        progress.record(&generated(7));
        assert!(!progress.in_flight());
        assert_eq!(progress.sectors_failed, 1);
        assert_eq!(progress.sectors_done, 1);
        assert!(progress.message().contains("1 failed"));

        // A finished run is replaced, not extended
        let rerun = BulkQueue {
            sectors: queue.sectors[..1].to_vec(),
            already_generated: 4,
            already_queued: 0,
        };
        let fresh = BulkProgress::start(Some(progress), &rerun);
        assert_eq!(
            fresh,
            BulkProgress {
                sectors_queued: 1,
                sectors_skipped: 4,
                jobs_pending: 1,
                ..BulkProgress::default()
            }
        );
    }

    #[test]
    fn test_missing_galaxy() {
        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(3);
        let err = generate_all_galaxy_systems(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            99,
            None,
        )
        .unwrap_err();
        assert_eq!(err, GenerationError::GalaxyNotFound(99));
    }
}
