//! Default planet-type catalog.
//!
//! The catalog is owned by an outside seeding step; generation only reads
//! it. This is the data that seeder writes on a fresh database, and what
//! tests and the simtest load into a [`MemoryStore`](crate::store::MemoryStore).

use crate::constants::categories;
use crate::model::PlanetType;

struct Entry {
    name: &'static str,
    category: &'static str,
    habitable: bool,
    // mineral, energy, food, research
    yields: [f32; 4],
    description: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        name: "Molten",
        category: categories::INNER_SYSTEM,
        habitable: false,
        yields: [1.5, 1.3, 0.0, 0.8],
        description: "Surface of flowing magma under a thin, toxic sky.",
    },
    Entry {
        name: "Barren",
        category: categories::INNER_SYSTEM,
        habitable: false,
        yields: [1.2, 0.8, 0.0, 0.5],
        description: "Airless rock scorched by its star.",
    },
    Entry {
        name: "Desert",
        category: categories::INNER_SYSTEM,
        habitable: true,
        yields: [1.1, 1.2, 0.6, 0.8],
        description: "Dry, hot world with scattered oases.",
    },
    Entry {
        name: "Terran",
        category: categories::HABITABLE_ZONE,
        habitable: true,
        yields: [1.0, 1.0, 1.5, 1.0],
        description: "Temperate world with liquid water and breathable air.",
    },
    Entry {
        name: "Ocean",
        category: categories::HABITABLE_ZONE,
        habitable: true,
        yields: [0.6, 1.0, 1.3, 1.2],
        description: "Planet-spanning ocean dotted with island chains.",
    },
    Entry {
        name: "Jungle",
        category: categories::HABITABLE_ZONE,
        habitable: true,
        yields: [0.8, 0.9, 1.4, 1.3],
        description: "Humid world overgrown with dense vegetation.",
    },
    Entry {
        name: "Gas Giant",
        category: categories::OUTER_SYSTEM,
        habitable: false,
        yields: [0.2, 1.8, 0.0, 1.1],
        description: "Massive hydrogen envelope with deep storm bands.",
    },
    Entry {
        name: "Ice Giant",
        category: categories::OUTER_SYSTEM,
        habitable: false,
        yields: [0.4, 1.4, 0.0, 1.0],
        description: "Cold giant of water, ammonia and methane ices.",
    },
    Entry {
        name: "Frozen",
        category: categories::OUTER_SYSTEM,
        habitable: false,
        yields: [1.0, 0.5, 0.1, 0.9],
        description: "Rocky world locked under kilometres of ice.",
    },
    Entry {
        name: "Asteroid Belt",
        category: categories::DWARF_OR_BELT,
        habitable: false,
        yields: [2.0, 0.3, 0.0, 0.6],
        description: "Ring of rubble rich in metals.",
    },
    Entry {
        name: "Dwarf Planet",
        category: categories::DWARF_OR_BELT,
        habitable: false,
        yields: [1.3, 0.3, 0.0, 0.7],
        description: "Small icy body on a distant orbit.",
    },
    Entry {
        name: "Crystalline",
        category: categories::EXOTIC,
        habitable: false,
        yields: [1.6, 1.6, 0.0, 2.0],
        description: "Lattice-covered world that refracts starlight.",
    },
    Entry {
        name: "Tomb World",
        category: categories::EXOTIC,
        habitable: false,
        yields: [1.2, 0.8, 0.2, 2.5],
        description: "Ruins of a vanished civilisation under a dead sky.",
    },
];

/// The default catalog. Ids are left at 0 for the store to assign.
pub fn default_planet_types() -> Vec<PlanetType> {
    ENTRIES
        .iter()
        .map(|e| PlanetType {
            id: 0,
            name: e.name.to_string(),
            category: e.category.to_string(),
            habitable: e.habitable,
            mineral_yield: e.yields[0],
            energy_yield: e.yields[1],
            food_yield: e.yields[2],
            research_yield: e.yields[3],
            description: e.description.to_string(),
        })
        .collect()
}
