//! Plain records for the spatial hierarchy: galaxy → sector → system → planet.
//!
//! `New*` records are insert requests; the store assigns ids.

use serde::{Deserialize, Serialize};

use crate::type_tables::StarType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Galaxy {
    pub id: u64,
    /// Sequential from 0, never reused.
    pub number: u32,
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGalaxy {
    pub number: u32,
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: u64,
    pub galaxy_id: u64,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSector {
    pub galaxy_id: u64,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: u64,
    pub sector_id: u64,
    pub x: u32,
    pub y: u32,
    pub star_type: StarType,
    pub star_size: f64,
    pub star_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStarSystem {
    pub sector_id: u64,
    pub x: u32,
    pub y: u32,
    pub star_type: StarType,
    pub star_size: f64,
    pub star_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    pub id: u64,
    pub system_id: u64,
    pub planet_type_id: u64,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlanet {
    pub system_id: u64,
    pub planet_type_id: u64,
    pub x: u32,
    pub y: u32,
}

/// Catalog entry owned by an external collaborator. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetType {
    pub id: u64,
    pub name: String,
    /// Category label, e.g. "Inner System". Drives band preference.
    pub category: String,
    pub habitable: bool,
    pub mineral_yield: f32,
    pub energy_yield: f32,
    pub food_yield: f32,
    pub research_yield: f32,
    pub description: String,
}

/// A planet joined with its catalog entry, for read views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetWithType {
    pub planet: Planet,
    pub planet_type: Option<PlanetType>,
}
