//! Starmap Headless Generation Harness
//!
//! Validates galaxy generation against an in-memory store.
//! Runs entirely in-process against `MemoryStore`; no database needed.
//!
//! Usage:
//!   cargo run -p starmap-simtest
//!   cargo run -p starmap-simtest -- --verbose --seed 42
//!   cargo run -p starmap-simtest -- --config tuning.json --save galaxy.bin
//!
//! Set `RUST_LOG=debug` to see per-sector generation logs.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::SeedableRng;

use starmap_logic::bulk::generate_all_galaxy_systems;
use starmap_logic::catalog::default_planet_types;
use starmap_logic::config::GenerationConfig;
use starmap_logic::constants::{GALAXY_SIZE, SECTOR_SIZE, STAR_CELL, SYSTEM_SIZE};
use starmap_logic::galaxy::create_galaxy;
use starmap_logic::queries::{galaxy_density_map, galaxy_stats, sectors_of_galaxy};
use starmap_logic::sector::{generate_sector_systems, SectorGeneration};
use starmap_logic::store::{GalaxyStore, MemoryStore};
use starmap_logic::system::{generate_system_planets, SystemGeneration};
use starmap_logic::type_tables::StarType;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    seed: u64,
    config: GenerationConfig,
    save: Option<String>,
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options {
        verbose: false,
        seed: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0),
        config: GenerationConfig::default(),
        save: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => opts.verbose = true,
            "--seed" => {
                let v = args.next().ok_or("--seed needs a value")?;
                opts.seed = v.parse().map_err(|e| format!("bad seed {v}: {e}"))?;
            }
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                let json = std::fs::read_to_string(&path)
                    .map_err(|e| format!("cannot read {path}: {e}"))?;
                opts.config = GenerationConfig::from_json(&json)
                    .map_err(|e| format!("bad config {path}: {e}"))?;
            }
            "--save" => opts.save = Some(args.next().ok_or("--save needs a path")?),
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(opts)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opts = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };
    println!("=== Starmap Generation Harness (seed {}) ===\n", opts.seed);
    log::debug!("generation config: {:?}", opts.config);

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let mut store = MemoryStore::with_planet_types(default_planet_types());
    let mut results = Vec::new();

    // 1. Galaxy creation and numbering
    results.extend(validate_galaxies(&mut store, opts.verbose));

    // 2. Density field
    results.extend(validate_density(&store, &opts.config, opts.verbose));

    // 3. Single sector generation
    results.extend(validate_sector(&mut store, &mut rng, &opts.config, opts.verbose));

    // 4. Planet generation
    results.extend(validate_planets(&mut store, &mut rng, &opts.config, opts.verbose));

    // 5. Whole-galaxy generation
    results.extend(validate_bulk(&mut store, &mut rng, &opts.config, opts.verbose));

    if let Some(path) = &opts.save {
        results.push(save_snapshot(&store, path));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn first_galaxy(store: &MemoryStore) -> u64 {
    store
        .galaxies()
        .iter()
        .min_by_key(|g| g.number)
        .map(|g| g.id)
        .unwrap_or(0)
}

// ── 1. Galaxies ─────────────────────────────────────────────────────────

fn validate_galaxies(store: &mut MemoryStore, verbose: bool) -> Vec<TestResult> {
    println!("--- Galaxies ---");
    let mut results = Vec::new();

    let a = create_galaxy(store, Some("g1".into()));
    let b = create_galaxy(store, Some("g2".into()));
    let (a, b) = match (a, b) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => {
            results.push(TestResult {
                name: "galaxy_create".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    if verbose {
        println!("  {}", a.message());
        println!("  {}", b.message());
    }

    results.push(TestResult {
        name: "galaxy_numbers_sequential".into(),
        passed: a.number == 0 && b.number == 1,
        detail: format!("A=#{} B=#{}", a.number, b.number),
    });

    for created in [&a, &b] {
        let sectors = store.sectors_in_galaxy(created.galaxy_id);
        let cells: HashSet<(u32, u32)> = sectors.iter().map(|s| (s.x, s.y)).collect();
        let in_bounds = cells
            .iter()
            .all(|(x, y)| *x < GALAXY_SIZE && *y < GALAXY_SIZE);
        results.push(TestResult {
            name: format!("galaxy_{}_full_grid", created.number),
            passed: sectors.len() == 100 && cells.len() == 100 && in_bounds,
            detail: format!("{} sectors, {} distinct cells", sectors.len(), cells.len()),
        });
    }

    results
}

// ── 2. Density ──────────────────────────────────────────────────────────

fn validate_density(
    store: &MemoryStore,
    config: &GenerationConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Density Field ---");
    let mut results = Vec::new();
    let field = &config.density;

    results.push(TestResult {
        name: "density_center_over_corner".into(),
        passed: field.at(5, 5) > field.at(0, 0),
        detail: format!("(5,5)={:.3} (0,0)={:.3}", field.at(5, 5), field.at(0, 0)),
    });

    let map = match galaxy_density_map(store, field, first_galaxy(store)) {
        Ok(m) => m,
        Err(e) => {
            results.push(TestResult {
                name: "density_map".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    let out_of_range = map
        .iter()
        .filter(|c| c.density < field.edge_density || c.density > field.center_density)
        .count();
    results.push(TestResult {
        name: "density_within_bounds".into(),
        passed: out_of_range == 0,
        detail: format!("{} of {} cells out of range", out_of_range, map.len()),
    });

    if verbose {
        println!("  Density map (×100):");
        for y in 0..GALAXY_SIZE {
            let row: Vec<String> = map
                .iter()
                .filter(|c| c.y == y)
                .map(|c| format!("{:3.0}", c.density * 100.0))
                .collect();
            println!("    {}", row.join(" "));
        }
    }

    results
}

// ── 3. Sector ───────────────────────────────────────────────────────────

fn validate_sector(
    store: &mut MemoryStore,
    rng: &mut StdRng,
    config: &GenerationConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Sector Generation ---");
    let mut results = Vec::new();
    let galaxy_id = first_galaxy(store);

    let Some(center) = sectors_of_galaxy(store, galaxy_id)
        .unwrap_or_default()
        .into_iter()
        .find(|s| s.x == 5 && s.y == 5)
    else {
        results.push(TestResult {
            name: "sector_lookup".into(),
            passed: false,
            detail: "sector (5,5) missing".into(),
        });
        return results;
    };

    match generate_sector_systems(store, rng, config, center.id, Some(0.1)) {
        Ok(result) => {
            if verbose {
                println!("  {}", result.message());
            }
            results.push(TestResult {
                name: "sector_placed_some".into(),
                passed: result.placed() > 0,
                detail: result.message(),
            });
        }
        Err(e) => results.push(TestResult {
            name: "sector_placed_some".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    let systems = store.systems_in_sector(center.id);
    let cells: HashSet<(u32, u32)> = systems.iter().map(|s| (s.x, s.y)).collect();
    results.push(TestResult {
        name: "sector_unique_positions".into(),
        passed: cells.len() == systems.len()
            && cells.iter().all(|(x, y)| *x < SECTOR_SIZE && *y < SECTOR_SIZE),
        detail: format!("{} systems, {} distinct cells", systems.len(), cells.len()),
    });

    let again = generate_sector_systems(store, rng, config, center.id, None);
    results.push(TestResult {
        name: "sector_idempotent".into(),
        passed: matches!(again, Ok(SectorGeneration::AlreadyGenerated { .. }))
            && store.system_count(center.id) == systems.len(),
        detail: match again {
            Ok(r) => r.message(),
            Err(e) => e.to_string(),
        },
    });

    if verbose {
        println!("  Star types:");
        for t in StarType::ALL {
            let n = systems.iter().filter(|s| s.star_type == t).count();
            println!("    {:14}: {}", t.name(), n);
        }
    }

    results
}

// ── 4. Planets ──────────────────────────────────────────────────────────

fn validate_planets(
    store: &mut MemoryStore,
    rng: &mut StdRng,
    config: &GenerationConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Planet Generation ---");
    let mut results = Vec::new();

    let populated: Vec<_> = sectors_of_galaxy(store, first_galaxy(store))
        .unwrap_or_default()
        .into_iter()
        .filter(|s| store.system_count(s.id) > 0)
        .collect();
    let Some(system) = populated
        .first()
        .and_then(|s| store.systems_in_sector(s.id).into_iter().next())
    else {
        results.push(TestResult {
            name: "planet_system_lookup".into(),
            passed: false,
            detail: "no populated system available".into(),
        });
        return results;
    };

    match generate_system_planets(store, rng, config, system.id, Some(5)) {
        Ok(result) => results.push(TestResult {
            name: "planet_explicit_count".into(),
            passed: (1..=5).contains(&result.placed()),
            detail: result.message(),
        }),
        Err(e) => results.push(TestResult {
            name: "planet_explicit_count".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    // Roll planets for every system in the sector and check the star cell
    let mut total = 0;
    let mut on_star = 0;
    let mut out_of_range = 0;
    for s in store.systems_in_sector(system.sector_id) {
        if let Ok(SystemGeneration::Generated { placed, .. }) =
            generate_system_planets(store, rng, config, s.id, None)
        {
            let (_, max) = s.star_type.planet_range();
            if placed > max {
                out_of_range += 1;
            }
        }
        for p in store.planets_in_system(s.id) {
            total += 1;
            if (p.x, p.y) == STAR_CELL || p.x >= SYSTEM_SIZE || p.y >= SYSTEM_SIZE {
                on_star += 1;
            }
        }
    }
    results.push(TestResult {
        name: "planet_never_on_star".into(),
        passed: on_star == 0 && total > 0,
        detail: format!("{} planets, {} on the star cell or off-grid", total, on_star),
    });
    results.push(TestResult {
        name: "planet_count_in_range".into(),
        passed: out_of_range == 0,
        detail: format!("{} systems over their star-type range", out_of_range),
    });

    let again = generate_system_planets(store, rng, config, system.id, None);
    results.push(TestResult {
        name: "planet_idempotent".into(),
        passed: matches!(again, Ok(SystemGeneration::AlreadyGenerated { .. })),
        detail: match again {
            Ok(r) => r.message(),
            Err(e) => e.to_string(),
        },
    });

    if verbose {
        println!("  {} planets across the sector", total);
    }

    results
}

// ── 5. Bulk ─────────────────────────────────────────────────────────────

fn validate_bulk(
    store: &mut MemoryStore,
    rng: &mut StdRng,
    config: &GenerationConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Whole-Galaxy Generation ---");
    let mut results = Vec::new();
    let galaxy_id = first_galaxy(store);
    let planets_before = store.total_planets();

    match generate_all_galaxy_systems(store, rng, config, galaxy_id, Some(0.05)) {
        Ok(summary) => {
            if verbose {
                println!("  {}", summary.message());
            }
            results.push(TestResult {
                name: "bulk_skips_populated".into(),
                passed: summary.sectors_skipped == 1 && summary.sectors_processed == 99,
                detail: summary.message(),
            });
        }
        Err(e) => results.push(TestResult {
            name: "bulk_skips_populated".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    match galaxy_stats(store, galaxy_id) {
        Ok(stats) => results.push(TestResult {
            name: "bulk_all_populated".into(),
            passed: stats.populated_sectors == stats.sectors,
            detail: format!(
                "{}/{} sectors populated, {} systems",
                stats.populated_sectors, stats.sectors, stats.systems
            ),
        }),
        Err(e) => results.push(TestResult {
            name: "bulk_all_populated".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results.push(TestResult {
        name: "bulk_no_planets".into(),
        passed: store.total_planets() == planets_before,
        detail: format!("{} planets before and after", store.total_planets()),
    });

    results
}

fn save_snapshot(store: &MemoryStore, path: &str) -> TestResult {
    let saved = File::create(path)
        .map_err(|e| e.to_string())
        .and_then(|f| store.save(BufWriter::new(f)).map_err(|e| e.to_string()));
    TestResult {
        name: "snapshot_saved".into(),
        passed: saved.is_ok(),
        detail: match saved {
            Ok(()) => format!("wrote {}", path),
            Err(e) => e,
        },
    }
}
