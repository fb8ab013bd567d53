//! Static weighted type tables: star types and orbital-band preferences.
//!
//! Tables are immutable `(variant, weight)` lists. Selection goes through
//! [`weighted_choice`], a cumulative-weight scan over any `rand::Rng`, so
//! tests can drive it with a seeded generator.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{bands, categories, star_types};
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StarType {
    YellowDwarf = star_types::YELLOW_DWARF,
    RedDwarf = star_types::RED_DWARF,
    BlueGiant = star_types::BLUE_GIANT,
    WhiteDwarf = star_types::WHITE_DWARF,
    NeutronStar = star_types::NEUTRON_STAR,
    RedGiant = star_types::RED_GIANT,
    BinarySystem = star_types::BINARY_SYSTEM,
}

impl TryFrom<u8> for StarType {
    type Error = StoreError;

    /// Decode a stored star type id, flagging ids no variant uses.
    fn try_from(val: u8) -> Result<Self, Self::Error> {
        Self::from_u8(val).ok_or_else(|| StoreError::Corrupt(format!("unknown star type id {val}")))
    }
}

/// Relative frequency of each star type in a freshly generated sector.
pub const STAR_TYPE_WEIGHTS: &[(StarType, u32)] = &[
    (StarType::YellowDwarf, 40),
    (StarType::RedDwarf, 30),
    (StarType::BlueGiant, 5),
    (StarType::WhiteDwarf, 10),
    (StarType::NeutronStar, 2),
    (StarType::RedGiant, 8),
    (StarType::BinarySystem, 5),
];

impl StarType {
    pub const ALL: [StarType; 7] = [
        Self::YellowDwarf,
        Self::RedDwarf,
        Self::BlueGiant,
        Self::WhiteDwarf,
        Self::NeutronStar,
        Self::RedGiant,
        Self::BinarySystem,
    ];

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            star_types::YELLOW_DWARF => Some(Self::YellowDwarf),
            star_types::RED_DWARF => Some(Self::RedDwarf),
            star_types::BLUE_GIANT => Some(Self::BlueGiant),
            star_types::WHITE_DWARF => Some(Self::WhiteDwarf),
            star_types::NEUTRON_STAR => Some(Self::NeutronStar),
            star_types::RED_GIANT => Some(Self::RedGiant),
            star_types::BINARY_SYSTEM => Some(Self::BinarySystem),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::YellowDwarf => "Yellow Dwarf",
            Self::RedDwarf => "Red Dwarf",
            Self::BlueGiant => "Blue Giant",
            Self::WhiteDwarf => "White Dwarf",
            Self::NeutronStar => "Neutron Star",
            Self::RedGiant => "Red Giant",
            Self::BinarySystem => "Binary System",
        }
    }

    /// Display color as `#RRGGBB`.
    pub fn color(&self) -> &'static str {
        match self {
            Self::YellowDwarf => "#FFD700",
            Self::RedDwarf => "#FF4500",
            Self::BlueGiant => "#1E90FF",
            Self::WhiteDwarf => "#F8F8FF",
            Self::NeutronStar => "#E0FFFF",
            Self::RedGiant => "#DC143C",
            Self::BinarySystem => "#FFA500",
        }
    }

    /// Inclusive planet-count range for a system around this star.
    pub fn planet_range(&self) -> (u32, u32) {
        match self {
            Self::BlueGiant | Self::RedGiant => (3, 8),
            Self::NeutronStar => (1, 3),
            _ => (2, 6),
        }
    }
}

/// Pick an entry from a `(variant, weight)` table.
///
/// Draws uniformly in `[0, total)` and scans cumulative weights. Zero-weight
/// entries are never picked. Returns `None` for an empty or all-zero table.
pub fn weighted_choice<T: Copy>(table: &[(T, u32)], rng: &mut impl Rng) -> Option<T> {
    let total: u32 = table.iter().map(|(_, w)| *w).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.gen_range(0..total);
    for &(item, weight) in table {
        if roll < weight {
            return Some(item);
        }
        roll -= weight;
    }
    None
}

/// Draw a star type from [`STAR_TYPE_WEIGHTS`].
pub fn random_star_type(rng: &mut impl Rng) -> StarType {
    weighted_choice(STAR_TYPE_WEIGHTS, rng).unwrap_or(StarType::YellowDwarf)
}

/// Planet-type categories preferred in an orbital band.
///
/// An empty slice means "no preference": draw from the whole catalog.
pub fn band_categories(band: u8) -> &'static [&'static str] {
    match band {
        bands::INNER => &[categories::INNER_SYSTEM, categories::EXOTIC],
        bands::OUTER => &[
            categories::OUTER_SYSTEM,
            categories::EXOTIC,
            categories::DWARF_OR_BELT,
        ],
        _ => &[],
    }
}
