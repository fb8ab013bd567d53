//! Grid sizes, generation caps, and stable `u8` ids.
//!
//! These are plain constants with no database dependency.
//! Both the SpacetimeDB server and the native simtest use these.

/// Sectors per galaxy side. A galaxy is a `GALAXY_SIZE × GALAXY_SIZE` grid.
pub const GALAXY_SIZE: u32 = 10;

/// Coordinate cells per sector side.
pub const SECTOR_SIZE: u32 = 100;

/// Coordinate cells per star system side.
pub const SYSTEM_SIZE: u32 = 9;

/// The star always sits on the center cell of its system.
pub const STAR_CELL: (u32, u32) = (SYSTEM_SIZE / 2, SYSTEM_SIZE / 2);

/// Sectors created with every galaxy.
pub const SECTORS_PER_GALAXY: usize = (GALAXY_SIZE * GALAXY_SIZE) as usize;

/// Cells a planet may occupy (everything except the star cell).
pub const PLANET_CELLS: u32 = SYSTEM_SIZE * SYSTEM_SIZE - 1;

/// Hard cap on star systems in one sector, whatever the density.
pub const MAX_SYSTEMS_PER_SECTOR: u32 = 2000;

/// Placement attempts per star system before the unit is skipped.
pub const SECTOR_PLACEMENT_ATTEMPTS: u32 = 100;

/// Placement attempts per planet before the unit is skipped.
pub const SYSTEM_PLACEMENT_ATTEMPTS: u32 = 20;

/// Chance that the first planet of a system lands in the inner band.
pub const INNER_PLANET_CHANCE: f64 = 0.2;

/// Orbit radius in cells per orbital band.
pub const BAND_SPACING: f64 = 1.3;

/// Star size range (solar radii, arbitrary game units).
pub const STAR_SIZE_MIN: f64 = 0.5;
pub const STAR_SIZE_MAX: f64 = 3.0;

pub mod star_types {
    pub const YELLOW_DWARF: u8 = 0;
    pub const RED_DWARF: u8 = 1;
    pub const BLUE_GIANT: u8 = 2;
    pub const WHITE_DWARF: u8 = 3;
    pub const NEUTRON_STAR: u8 = 4;
    pub const RED_GIANT: u8 = 5;
    pub const BINARY_SYSTEM: u8 = 6;
}

pub mod bands {
    pub const INNER: u8 = 1;
    pub const MIDDLE: u8 = 2;
    pub const OUTER: u8 = 3;
}

/// Planet-type category labels used by the external catalog.
pub mod categories {
    pub const INNER_SYSTEM: &str = "Inner System";
    pub const HABITABLE_ZONE: &str = "Habitable Zone";
    pub const OUTER_SYSTEM: &str = "Outer System";
    pub const EXOTIC: &str = "Exotic";
    pub const DWARF_OR_BELT: &str = "Dwarf Planet/Asteroid Belt";
}
