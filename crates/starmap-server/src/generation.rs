//! Galaxy, sector, and system generation reducers.
//!
//! Generation pipeline:
//!   1. create_galaxy               -- Galaxy + its 100 Sector rows
//!   2. generate_sector_systems     -- StarSystem rows for one sector (lazy)
//!   3. generate_system_planets     -- Planet rows for one system (lazy)
//!   4. generate_all_galaxy_systems -- queues one SectorGenerationJob per empty sector
//!
//! The algorithms live in starmap-logic; reducers only adapt the database
//! through `DbStore` and seed a fresh RNG per call.

use crate::store::DbStore;
use crate::tables::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use spacetimedb::{reducer, ReducerContext, ScheduleAt, Table};
use starmap_logic::bulk::{plan_bulk_queue, BulkProgress};
use starmap_logic::config::GenerationConfig;
use starmap_logic::error::GenerationError;
use starmap_logic::sector::{populate_sector, validate_multiplier};
use starmap_logic::store::GalaxyStore;
use starmap_logic::type_tables::StarType;

/// Per-call RNG. Unseeded in spirit: runs are not meant to be reproducible.
fn reducer_rng(ctx: &ReducerContext, salt: u64) -> StdRng {
    let micros = ctx.timestamp.to_micros_since_unix_epoch() as u64;
    StdRng::seed_from_u64(micros ^ salt.rotate_left(32))
}

/// Create a new galaxy with its full sector grid
#[reducer]
pub fn create_galaxy(ctx: &ReducerContext, group_id: Option<String>) -> Result<(), String> {
    let mut store = DbStore::new(ctx);
    let created = starmap_logic::galaxy::create_galaxy(&mut store, group_id)
        .map_err(|e| e.to_string())?;
    log::info!("{} (galaxy id {})", created.message(), created.galaxy_id);
    Ok(())
}

/// Populate one sector with star systems if it has none yet
#[reducer]
pub fn generate_sector_systems(
    ctx: &ReducerContext,
    sector_id: u64,
    density_multiplier: Option<f64>,
) -> Result<(), String> {
    let mut store = DbStore::new(ctx);
    let mut rng = reducer_rng(ctx, sector_id);
    let result = starmap_logic::sector::generate_sector_systems(
        &mut store,
        &mut rng,
        &GenerationConfig::default(),
        sector_id,
        density_multiplier,
    )
    .map_err(|e| e.to_string())?;
    log::info!("Sector {}: {}", sector_id, result.message());
    Ok(())
}

/// Populate one star system with planets if it has none yet
#[reducer]
pub fn generate_system_planets(
    ctx: &ReducerContext,
    system_id: u64,
    planet_count: Option<u32>,
) -> Result<(), String> {
    if let Some(row) = ctx.db.star_system().id().find(system_id) {
        StarType::try_from(row.star_type).map_err(|e| format!("star system {}: {}", system_id, e))?;
    }

    let mut store = DbStore::new(ctx);
    let mut rng = reducer_rng(ctx, system_id);
    let result = starmap_logic::system::generate_system_planets(
        &mut store,
        &mut rng,
        &GenerationConfig::default(),
        system_id,
        planet_count,
    )
    .map_err(|e| e.to_string())?;
    log::info!("System {}: {}", system_id, result.message());
    Ok(())
}

fn progress_of(row: &GalaxyGeneration) -> BulkProgress {
    BulkProgress {
        sectors_queued: row.sectors_queued,
        sectors_done: row.sectors_done,
        sectors_skipped: row.sectors_skipped,
        sectors_failed: row.sectors_failed,
        jobs_pending: row.jobs_pending,
        systems_created: row.systems_created,
    }
}

fn progress_row(galaxy_id: u64, density_multiplier: f64, p: BulkProgress) -> GalaxyGeneration {
    GalaxyGeneration {
        galaxy_id,
        density_multiplier,
        sectors_queued: p.sectors_queued,
        sectors_done: p.sectors_done,
        sectors_skipped: p.sectors_skipped,
        sectors_failed: p.sectors_failed,
        jobs_pending: p.jobs_pending,
        systems_created: p.systems_created,
    }
}

/// Queue population of every empty sector in a galaxy.
///
/// A reducer is a single transaction, so instead of populating up to 100
/// sectors here, each empty sector becomes a scheduled job that commits on
/// its own. Progress accumulates in the `galaxy_generation` row. Sectors
/// with a pending job are not queued again, and a run still in flight keeps
/// its totals.
#[reducer]
pub fn generate_all_galaxy_systems(
    ctx: &ReducerContext,
    galaxy_id: u64,
    density_multiplier: Option<f64>,
) -> Result<(), String> {
    let multiplier = validate_multiplier(density_multiplier).map_err(|e| e.to_string())?;
    let store = DbStore::new(ctx);
    let queue = plan_bulk_queue(&store, galaxy_id, |sector_id| {
        ctx.db
            .sector_generation_job()
            .sector_id()
            .filter(sector_id)
            .next()
            .is_some()
    })
    .map_err(|e| e.to_string())?;

    for s in &queue.sectors {
        ctx.db.sector_generation_job().insert(SectorGenerationJob {
            scheduled_id: 0,
            scheduled_at: ScheduleAt::Time(ctx.timestamp),
            galaxy_id,
            sector_id: s.id,
            density_multiplier: multiplier,
        });
    }

    let previous = ctx.db.galaxy_generation().galaxy_id().find(galaxy_id);
    let progress = BulkProgress::start(previous.as_ref().map(progress_of), &queue);
    // An in-flight run keeps the multiplier its first jobs were queued with
    let run_multiplier = match &previous {
        Some(row) if row.jobs_pending > 0 => row.density_multiplier,
        _ => multiplier,
    };
    let row = progress_row(galaxy_id, run_multiplier, progress);
    if previous.is_some() {
        ctx.db.galaxy_generation().galaxy_id().update(row);
    } else {
        ctx.db.galaxy_generation().insert(row);
    }

    log::info!(
        "Galaxy {}: queued {} sectors for generation ({} already generated, {} already queued)",
        galaxy_id,
        queue.sectors.len(),
        queue.already_generated,
        queue.already_queued
    );
    Ok(())
}

/// Scheduled: populate one sector queued by `generate_all_galaxy_systems`.
///
/// A failed population is recorded in the progress row rather than
/// returned, so the row update commits and the run still finishes. The
/// sector stays empty and a later bulk request queues it again.
#[reducer]
pub fn run_sector_generation_job(
    ctx: &ReducerContext,
    job: SectorGenerationJob,
) -> Result<(), String> {
    if ctx.sender != ctx.identity() {
        return Err("sector generation jobs are internal".to_string());
    }

    let mut store = DbStore::new(ctx);
    let mut rng = reducer_rng(ctx, job.sector_id);
    let outcome = match store.sector(job.sector_id) {
        Some(target) => populate_sector(
            &mut store,
            &mut rng,
            &GenerationConfig::default(),
            &target,
            job.density_multiplier,
        ),
        None => Err(GenerationError::SectorNotFound(job.sector_id)),
    };
    if let Err(e) = &outcome {
        log::warn!("Galaxy {}: sector {} failed: {}", job.galaxy_id, job.sector_id, e);
    }

    if let Some(row) = ctx.db.galaxy_generation().galaxy_id().find(job.galaxy_id) {
        let mut progress = progress_of(&row);
        progress.record(&outcome);
        if !progress.in_flight() {
            log::info!("Galaxy {}: {}", job.galaxy_id, progress.message());
        }
        ctx.db
            .galaxy_generation()
            .galaxy_id()
            .update(progress_row(job.galaxy_id, row.density_multiplier, progress));
    }
    Ok(())
}
